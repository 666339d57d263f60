use lazy_static::lazy_static;
use rand::Rng;
use ring::rand::{SecureRandom, SystemRandom};
use std::io;

lazy_static! {
    // OS CSPRNG (getrandom / BCryptGenRandom / SecRandomCopyBytes)
    static ref GLOBAL_RNG: SystemRandom = SystemRandom::new();
}

/// Fill `dest` with cryptographically secure random bytes from the OS
pub fn secure_random_bytes(dest: &mut [u8]) -> io::Result<()> {
    GLOBAL_RNG
        .fill(dest)
        .map_err(|_| io::Error::other("OS random source unavailable"))
}

const SCRUB_NAME_CHARSET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Random lowercase-alphanumeric file name of `len` characters, each symbol
/// equally likely
pub fn random_scrub_name(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| SCRUB_NAME_CHARSET[rng.gen_range(0..SCRUB_NAME_CHARSET.len())] as char)
        .collect()
}
