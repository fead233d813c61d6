//! The bank packer.

use crate::codec::{BankCodec, Codec, EncodedBank};
use crate::error::{Error, Result, Warning};
use tracing::instrument;

/// The output of packing a quantized level stream into banks.
pub struct PackedBanks {
    /// One fully-encoded, `BANK_SIZE`-byte payload per bank, in playback order.
    pub banks: Vec<EncodedBank>,
}

/// Slices `levels` into banks using `codec`, stopping at stream exhaustion or `max_banks`.
/// Leftover samples beyond `max_banks` are discarded and reported as a [`Warning::MaxBanksExceeded`]
/// unless `strict` is set, in which case they are a hard [`Error::MaxBanksExceeded`].
#[instrument(level = "debug", skip(levels, codec))]
pub fn pack_banks(
    levels: &[u8],
    codec: &Codec,
    max_banks: u32,
    strict: bool,
    warnings: &mut Vec<Warning>,
) -> Result<PackedBanks> {
    if levels.is_empty() {
        return Err(Error::AudioTooShort);
    }
    let mut banks = Vec::new();
    let mut offset = 0usize;
    while offset < levels.len() && (banks.len() as u32) < max_banks {
        let bank = codec.encode_bank(&levels[offset..], banks.len(), warnings)?;
        if bank.consumed == 0 {
            return Err(Error::BankOverflow);
        }
        offset += bank.consumed;
        banks.push(bank);
        tracing::trace!(bank = banks.len(), offset, total = levels.len(), "packed bank");
    }
    if offset < levels.len() {
        let dropped = levels.len() - offset;
        if strict {
            return Err(Error::MaxBanksExceeded { max_banks });
        }
        warnings.push(Warning::MaxBanksExceeded { max_banks, dropped_samples: dropped });
    }
    Ok(PackedBanks { banks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::raw::RawCodec;

    #[test]
    fn test_tiny_raw_one_bank() {
        let levels: Vec<u8> = (0..16u8).collect();
        let codec = Codec::Raw(RawCodec);
        let mut warnings = Vec::new();
        let packed = pack_banks(&levels, &codec, 1, false, &mut warnings).unwrap();
        assert_eq!(packed.banks.len(), 1);
        assert_eq!(packed.banks[0].consumed, 16);
    }

    #[test]
    fn test_max_banks_truncates_with_warning() {
        let levels = vec![1u8; crate::codec::BANK_SIZE * 3];
        let codec = Codec::Raw(RawCodec);
        let mut warnings = Vec::new();
        let packed = pack_banks(&levels, &codec, 2, false, &mut warnings).unwrap();
        assert_eq!(packed.banks.len(), 2);
        assert!(warnings.iter().any(|w| matches!(w, Warning::MaxBanksExceeded { .. })));
    }

    #[test]
    fn test_max_banks_strict_is_error() {
        let levels = vec![1u8; crate::codec::BANK_SIZE * 3];
        let codec = Codec::Raw(RawCodec);
        let mut warnings = Vec::new();
        let result = pack_banks(&levels, &codec, 2, true, &mut warnings);
        assert!(matches!(result, Err(Error::MaxBanksExceeded { .. })));
    }

    #[test]
    fn test_empty_input_is_error() {
        let codec = Codec::Raw(RawCodec);
        let mut warnings = Vec::new();
        assert!(matches!(pack_banks(&[], &codec, 1, false, &mut warnings), Err(Error::AudioTooShort)));
    }
}
