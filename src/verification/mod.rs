// Post-wipe statistical verification
//
// - entropy.rs: Shannon entropy and the sampled EntropyVerifier

pub mod entropy;

pub use entropy::{shannon_entropy, EntropyVerifier, VerificationReport};
