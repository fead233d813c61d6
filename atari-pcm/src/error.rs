use std::fmt;
use thiserror::Error;

/// The result type for the `atari-pcm` pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for the `atari-pcm` pipeline.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("decoded audio is shorter than one sample per bank")]
    AudioTooShort,

    #[error("a single compressed unit does not fit in a 16 KB bank")]
    BankOverflow,

    #[error("input requires more than {max_banks} banks (strict mode)")]
    MaxBanksExceeded { max_banks: u32 },

    #[error("final XEX size {size} exceeds the configured ceiling of {ceiling} bytes")]
    XexTooLarge { size: usize, ceiling: usize },

    #[error(transparent)]
    Assembler(Box<atari_pcm_asm::Error>),
}

impl From<atari_pcm_asm::Error> for Error {
    fn from(err: atari_pcm_asm::Error) -> Self {
        Self::Assembler(Box::new(err))
    }
}

/// A non-fatal condition reported alongside a successful pipeline result.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Warning {
    /// The input was truncated because it required more banks than `max_banks` allows.
    MaxBanksExceeded { max_banks: u32, dropped_samples: usize },
    /// Per-bank k-means did not converge within the iteration budget.
    KMeansNotConverged { bank: usize, iterations: u32 },
    /// The LZ matcher fell back to literals for part of a bank because no profitable match was
    /// found.
    LzNoMatch { bank: usize, literal_bytes: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxBanksExceeded { max_banks, dropped_samples } => write!(
                f,
                "input truncated at {max_banks} banks; {dropped_samples} trailing samples dropped"
            ),
            Self::KMeansNotConverged { bank, iterations } => {
                write!(f, "bank {bank}: k-means did not converge after {iterations} iterations")
            }
            Self::LzNoMatch { bank, literal_bytes } => {
                write!(f, "bank {bank}: {literal_bytes} bytes emitted as literals (no match found)")
            }
        }
    }
}
