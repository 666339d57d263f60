use crate::config::EngineConfig;
use crate::PassKind;
use rand::Rng;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, warn};

/// Slack below the expected entropy of a short random sample
const SMALL_SAMPLE_MARGIN: f64 = 0.5;

/// Expected Shannon entropy (bits/byte) of `len` uniformly random bytes.
///
/// Short samples cannot reach 8 bits: `len` bytes hold at most `len` distinct
/// values and collisions pull the estimate further down. Byte counts are
/// modelled as Poisson with mean `len / 256`.
pub fn expected_random_entropy(len: usize) -> f64 {
    if len <= 1 {
        return 0.0;
    }

    let n = len as f64;
    let lambda = n / 256.0;

    if lambda >= 16.0 {
        // Miller-Madow bias with every byte value present
        return 8.0 - 255.0 / (2.0 * n * std::f64::consts::LN_2);
    }

    let mut pmf = (-lambda).exp();
    let mut weighted = 0.0;
    for k in 1..=128u32 {
        pmf *= lambda / k as f64;
        let k = k as f64;
        weighted += pmf * k * k.log2();
    }

    n.log2() - 256.0 * weighted / n
}

/// Shannon entropy of `data` in bits per byte (0.0 to 8.0)
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut frequency = [0u64; 256];
    for &byte in data {
        frequency[byte as usize] += 1;
    }

    let len = data.len() as f64;
    let mut entropy = 0.0;

    for &count in &frequency {
        if count > 0 {
            let probability = count as f64 / len;
            entropy -= probability * probability.log2();
        }
    }

    entropy
}

/// Outcome of sampling a file
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationReport {
    pub average_entropy: f64,
    pub samples: usize,
    pub passed: bool,
}

/// Samples blocks at random offsets and checks their average entropy against
/// what the final pass should have left behind.
#[derive(Debug, Clone)]
pub struct EntropyVerifier {
    samples: usize,
    block_size: usize,
    random_threshold: f64,
    constant_threshold: f64,
}

impl Default for EntropyVerifier {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl EntropyVerifier {
    pub fn new(samples: usize, block_size: usize, random_threshold: f64, constant_threshold: f64) -> Self {
        Self {
            samples: samples.max(1),
            block_size: block_size.max(1),
            random_threshold,
            constant_threshold,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.verify_samples,
            config.verify_block_size,
            config.random_entropy_threshold,
            config.constant_entropy_threshold,
        )
    }

    /// Lowest average entropy accepted for random data sampled in blocks of
    /// `sample_len` bytes. Capped below what such a block can reach.
    pub fn random_floor(&self, sample_len: usize) -> f64 {
        self.random_threshold
            .min(expected_random_entropy(sample_len) - SMALL_SAMPLE_MARGIN)
    }

    /// Random data must sit above the random floor for its sample length;
    /// constant fills below the constant threshold
    pub fn accepts(&self, expected: PassKind, average_entropy: f64, sample_len: usize) -> bool {
        match expected {
            PassKind::Random => average_entropy > self.random_floor(sample_len),
            PassKind::Zeros | PassKind::Ones => average_entropy < self.constant_threshold,
        }
    }

    /// Sample `path` and report the average entropy. An empty file passes
    /// trivially with zero samples.
    pub fn inspect(&self, path: &Path, expected: PassKind) -> io::Result<VerificationReport> {
        let mut file = File::open(path)?;
        let size = file.metadata()?.len();

        if size == 0 {
            return Ok(VerificationReport {
                average_entropy: 0.0,
                samples: 0,
                passed: true,
            });
        }

        let block_len = (self.block_size as u64).min(size) as usize;
        let max_offset = size - block_len as u64;
        let mut rng = rand::thread_rng();
        let mut block = vec![0u8; block_len];
        let mut total = 0.0;

        for _ in 0..self.samples {
            let offset = if max_offset == 0 {
                0
            } else {
                rng.gen_range(0..=max_offset)
            };
            file.seek(SeekFrom::Start(offset))?;
            file.read_exact(&mut block)?;
            total += shannon_entropy(&block);
        }

        let average_entropy = total / self.samples as f64;
        let passed = self.accepts(expected, average_entropy, block_len);

        debug!(
            path = %path.display(),
            expected = %expected,
            average_entropy,
            samples = self.samples,
            passed,
            "Entropy verification"
        );

        Ok(VerificationReport {
            average_entropy,
            samples: self.samples,
            passed,
        })
    }

    /// Fail-closed check: a read error yields a failed report with a NaN average
    pub fn verify(&self, path: &Path, expected: PassKind) -> VerificationReport {
        match self.inspect(path, expected) {
            Ok(report) => report,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Verification read failed");
                VerificationReport {
                    average_entropy: f64::NAN,
                    samples: 0,
                    passed: false,
                }
            }
        }
    }
}
