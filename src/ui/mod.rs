pub mod progress;


pub use progress::{format_bytes, pass_label};
