//! Raw passthrough codec: one byte per level index, no compression.

use super::{BankCodec, EncodedBank, BANK_SIZE};
use crate::error::{Result, Warning};

#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

impl BankCodec for RawCodec {
    fn encode_bank(&self, levels: &[u8], _bank_index: usize, _warnings: &mut Vec<Warning>) -> Result<EncodedBank> {
        let consumed = levels.len().min(BANK_SIZE);
        let mut bytes = vec![0u8; BANK_SIZE];
        bytes[..consumed].copy_from_slice(&levels[..consumed]);
        Ok(EncodedBank { bytes, consumed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiny_raw_bank() {
        let levels: Vec<u8> = (0..16).collect();
        let mut warnings = Vec::new();
        let bank = RawCodec.encode_bank(&levels, 0, &mut warnings).unwrap();
        assert_eq!(bank.consumed, 16);
        assert_eq!(&bank.bytes[..16], &levels[..]);
        assert!(bank.bytes[16..].iter().all(|&b| b == 0));
        assert_eq!(bank.bytes.len(), BANK_SIZE);
    }

    #[test]
    fn test_full_bank() {
        let levels = vec![5u8; BANK_SIZE + 100];
        let mut warnings = Vec::new();
        let bank = RawCodec.encode_bank(&levels, 0, &mut warnings).unwrap();
        assert_eq!(bank.consumed, BANK_SIZE);
    }
}
