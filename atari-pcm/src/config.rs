use crate::error::{Error, Result};

/// Which bank codec to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// No compression; level indices are packed into banks verbatim.
    Off,
    /// Delta transform + LZ77.
    Lz,
    /// Per-bank vector-quantized codebook.
    #[default]
    Vq,
}

/// Bank-time budgeting model for the LZ codec; does not change the byte format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LzMode {
    /// One POKEY write per IRQ; the stream is decoded one byte per interrupt.
    #[default]
    Scalar,
    /// Single-channel-per-sample: a different CPU cost model for feasibility pre-checks.
    OneCps,
}

/// Encoder configuration. Construction and validation is the caller's responsibility; this type
/// does not implement `serde` traits (parsing a config from text is out of scope).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub compression: Compression,
    /// VQ vector dimension; only meaningful when `compression == Vq`.
    pub vec_size: u8,
    /// Number of POKEY channels, `1..=4`.
    pub channels: u8,
    /// Requested sample rate in Hz; snapped to the nearest achievable `PAL_CLOCK / (d+1)`.
    pub rate: u32,
    /// Enable the pre-emphasis FIR.
    pub enhance: bool,
    /// Hard cap on the number of banks, `1..=64`.
    pub max_banks: u32,
    /// Enable 1st-order noise-shaped quantization (forced off when `compression == Vq`).
    pub noise_shaping: bool,
    /// VQ silence-vector threshold, `0..=100`.
    pub noise_gate: u8,
    /// LZ bank-time budgeting model.
    pub mode: LzMode,
    /// If set, exceeding `max_banks` is a hard error instead of a truncation warning.
    pub strict: bool,
    /// If set, the quantizer and VQ codec additionally compute an RMSE/SNR verification report.
    pub verbose: bool,
    /// Optional ceiling on the final XEX file size; `None` disables the check.
    pub xex_size_ceiling: Option<usize>,
    /// Splash screen title, rendered via the built-in 6-bit screen-code font.
    pub title: &'static str,
    /// Error-screen message, rendered the same way as `title`.
    pub error_message: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compression: Compression::Vq,
            vec_size: 4,
            channels: 1,
            rate: 15_700,
            enhance: false,
            max_banks: 64,
            // Forced off by default: the authoritative default compression is VQ, which forbids
            // noise shaping. RAW/LZ callers should set this explicitly.
            noise_shaping: false,
            noise_gate: 0,
            mode: LzMode::Scalar,
            strict: false,
            verbose: false,
            xex_size_ceiling: None,
            title: "",
            error_message: "",
        }
    }
}

impl Config {
    /// Validates this configuration, returning a descriptive error for the first violation found.
    pub fn validate(&self) -> Result<()> {
        if !(1..=4).contains(&self.channels) {
            return Err(Error::InvalidConfig("channels must be in 1..=4"));
        }
        if !(1..=atari_pcm_data::hw::MAX_BANKS_CEILING).contains(&self.max_banks) {
            return Err(Error::InvalidConfig("max_banks must be in 1..=64"));
        }
        if self.noise_gate > 100 {
            return Err(Error::InvalidConfig("noise_gate must be in 0..=100"));
        }
        match self.compression {
            Compression::Vq => {
                if !matches!(self.vec_size, 2 | 4 | 8 | 16) {
                    return Err(Error::InvalidConfig("vec_size must be one of 2, 4, 8, 16"));
                }
                if self.noise_shaping {
                    return Err(Error::InvalidConfig(
                        "noise_shaping is incompatible with compression=vq",
                    ));
                }
            }
            Compression::Off | Compression::Lz => {
                if self.noise_gate != 0 {
                    return Err(Error::InvalidConfig(
                        "noise_gate only applies to compression=vq",
                    ));
                }
            }
        }
        if self.rate == 0 {
            return Err(Error::InvalidConfig("rate must be nonzero"));
        }
        Ok(())
    }

    /// Returns the level count `L = 15*channels + 1` for this configuration.
    pub fn level_count(&self) -> usize {
        15 * self.channels as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_bad_channels() {
        let config = Config { channels: 5, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_vq_with_noise_shaping() {
        let config =
            Config { compression: Compression::Vq, noise_shaping: true, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_vec_size() {
        let config = Config {
            compression: Compression::Vq,
            vec_size: 3,
            noise_shaping: false,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_level_count() {
        let config = Config { channels: 3, ..Config::default() };
        assert_eq!(config.level_count(), 46);
    }
}
