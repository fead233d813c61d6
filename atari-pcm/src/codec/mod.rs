//! The three bank codecs (components F, G) share a common interface, selected by a tagged
//! [`Codec`] enum rather than a trait object, so the per-sample inner loops monomorphize (see
//! polymorphism over codecs).

pub mod deltalz;
pub mod raw;
pub mod vq;

use crate::config::Config;
use crate::error::{Result, Warning};

/// Fixed bank size in bytes (`0x4000..0x7FFF` on target).
pub const BANK_SIZE: usize = atari_pcm_data::hw::BANK_SIZE;

/// One encoded, full-size (`BANK_SIZE`-byte) bank payload plus how many input level indices it
/// actually consumed.
pub struct EncodedBank {
    /// Exactly `BANK_SIZE` bytes: codec payload followed by codec-specific padding.
    pub bytes: Vec<u8>,
    /// Number of level indices from the input slice this bank consumed.
    pub consumed: usize,
}

/// Shared interface implemented by each bank codec.
pub trait BankCodec {
    /// Encodes as much of `levels` as fits into one `BANK_SIZE`-byte bank, returning the bank
    /// bytes and how much of the input it consumed. Never consumes more than `levels.len()`.
    fn encode_bank(&self, levels: &[u8], bank_index: usize, warnings: &mut Vec<Warning>) -> Result<EncodedBank>;
}

/// Dispatches to one of the three codecs without virtual calls.
pub enum Codec {
    Raw(raw::RawCodec),
    Lz(deltalz::DeltaLzCodec),
    Vq(vq::VqCodec),
}

impl Codec {
    pub fn from_config(config: &Config, level_count: usize) -> Self {
        match config.compression {
            crate::config::Compression::Off => Codec::Raw(raw::RawCodec),
            crate::config::Compression::Lz => Codec::Lz(deltalz::DeltaLzCodec::new(config.mode)),
            crate::config::Compression::Vq => {
                Codec::Vq(vq::VqCodec::new(config.vec_size as usize, config.noise_gate, level_count))
            }
        }
    }
}

impl BankCodec for Codec {
    fn encode_bank(&self, levels: &[u8], bank_index: usize, warnings: &mut Vec<Warning>) -> Result<EncodedBank> {
        match self {
            Codec::Raw(c) => c.encode_bank(levels, bank_index, warnings),
            Codec::Lz(c) => c.encode_bank(levels, bank_index, warnings),
            Codec::Vq(c) => c.encode_bank(levels, bank_index, warnings),
        }
    }
}
