pub mod hash;
pub mod secure_rng;


pub use hash::sha256_file;
pub use secure_rng::{random_scrub_name, secure_random_bytes};
