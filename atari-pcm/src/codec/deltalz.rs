//! Delta transform + LZ77 with the decode-buffer safety invariants required by an in-IRQ 6502
//! decoder.

use super::{BankCodec, EncodedBank, BANK_SIZE};
use crate::config::LzMode;
use crate::error::{Result, Warning};
use atari_pcm_data::hw::LZ_BUF_SIZE;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::instrument;

/// Minimum match length the encoder will ever emit.
const MIN_MATCH: usize = 3;
/// Maximum match length representable by a token (`0x3F + 3`).
const MAX_MATCH: usize = 0x3F + 3;
/// Maximum literal run length representable by a token.
const MAX_LITERAL_RUN: usize = 0x7F;
/// How many candidate positions to examine per hash bucket before giving up; bounds worst-case
/// encode time without changing the emitted byte stream's correctness.
const MAX_CHAIN_DEPTH: usize = 64;

/// Persistent encoder-side mirror of the in-IRQ decode buffer: `bytes` holds every delta byte
/// decoded since the last wrap, so a match offset of at most `bytes.len()` can never cross the
/// wrap boundary (invariant 3). `last_level` carries the previous bank's final raw level forward
/// as the next bank's delta header.
struct LzState {
    bytes: Vec<u8>,
    last_level: u8,
}

impl Default for LzState {
    fn default() -> Self {
        Self { bytes: Vec::with_capacity(LZ_BUF_SIZE), last_level: 0 }
    }
}

pub struct DeltaLzCodec {
    #[allow(dead_code)] // budgeting-only; does not change the byte format (see spec §4.G).
    mode: LzMode,
    state: RefCell<LzState>,
}

impl DeltaLzCodec {
    pub fn new(mode: LzMode) -> Self {
        Self { mode, state: RefCell::new(LzState::default()) }
    }
}

impl BankCodec for DeltaLzCodec {
    #[instrument(level = "trace", skip_all, fields(bank_index))]
    fn encode_bank(&self, levels: &[u8], bank_index: usize, warnings: &mut Vec<Warning>) -> Result<EncodedBank> {
        let mut state = self.state.borrow_mut();
        let header = state.last_level;

        // Delta-transform as many input samples as we attempt to fit; we may consume fewer if
        // the bank fills up first.
        let mut delta = Vec::with_capacity(levels.len());
        let mut prev = header;
        for &level in levels {
            delta.push(level.wrapping_sub(prev));
            prev = level;
        }

        let mut output = vec![header];
        let budget = BANK_SIZE - 1 /* header */ - 1 /* end token */;
        let mut consumed = 0usize;
        let mut literal_bytes = 0usize;
        let mut pos = 0usize;
        let mut literal_start: Option<usize> = None;

        macro_rules! flush_literal {
            () => {
                if let Some(start) = literal_start.take() {
                    let run = &delta[start..pos];
                    debug_assert!(!run.is_empty() && run.len() <= MAX_LITERAL_RUN);
                    output.push(run.len() as u8);
                    output.extend_from_slice(run);
                    literal_bytes += run.len();
                    for &b in run {
                        state.bytes.push(b);
                    }
                }
            };
        }

        while pos < delta.len() {
            if state.bytes.len() >= LZ_BUF_SIZE {
                // Wrap: no content survives into the new epoch, so no open literal run may cross
                // this point (invariant 1) - it was already flushed by the capacity checks below.
                state.bytes.clear();
            }
            let epoch_room = LZ_BUF_SIZE - state.bytes.len();
            if epoch_room == 0 {
                continue;
            }

            let best = find_match(&state.bytes, &delta[pos..], epoch_room);
            if let Some((len, offset)) = best {
                let token_len = if offset <= 255 { 2 } else { 3 };
                if output.len() + token_len > budget {
                    break;
                }
                flush_literal!();
                let code = (len - 3) as u8;
                if offset <= 255 {
                    output.push(0x80 | code);
                    output.push(offset as u8);
                } else {
                    output.push(0xC0 | code);
                    output.extend_from_slice(&(offset as u16).to_le_bytes());
                }
                for i in 0..len {
                    state.bytes.push(delta[pos + i]);
                }
                pos += len;
                consumed = pos;
            } else {
                if literal_start.is_none() {
                    if output.len() + 2 > budget {
                        break;
                    }
                    literal_start = Some(pos);
                }
                let run_len = pos + 1 - literal_start.unwrap();
                if run_len > MAX_LITERAL_RUN
                    || output.len() + 1 + run_len > budget
                    || state.bytes.len() + run_len > LZ_BUF_SIZE
                {
                    // Can't extend this run further; flush what we have and retry this byte
                    // fresh (it'll start a new literal run or find a match).
                    pos -= 1;
                    flush_literal!();
                    consumed = pos + 1;
                    pos += 1;
                    continue;
                }
                pos += 1;
                consumed = pos;
            }
        }
        flush_literal!();
        output.push(0x00);
        if literal_bytes == 0 && consumed == 0 && !delta.is_empty() {
            // Degenerate case: not even one literal byte fits. Cannot happen given BANK_SIZE is
            // far larger than the 2-byte minimum, but report it rather than emit an empty bank.
            warnings.push(Warning::LzNoMatch { bank: bank_index, literal_bytes: 0 });
        }
        output.resize(BANK_SIZE, 0x00);

        state.last_level = if consumed > 0 { levels[consumed - 1] } else { header };

        Ok(EncodedBank { bytes: output, consumed })
    }
}

/// Finds the longest profitable match for `delta` against history `buf`, with minimum length 3
/// and length capped by `MAX_MATCH`, `remaining_epoch_capacity`, and `delta.len()`. Matches are
/// limited to `offset <= buf.len()` so they never cross the wrap boundary (invariant 3).
fn find_match(buf: &[u8], delta: &[u8], remaining_epoch_capacity: usize) -> Option<(usize, usize)> {
    if buf.len() < MIN_MATCH || delta.len() < MIN_MATCH {
        return None;
    }
    let max_len = MAX_MATCH.min(delta.len()).min(remaining_epoch_capacity);
    if max_len < MIN_MATCH {
        return None;
    }
    let mut chain: HashMap<[u8; 3], Vec<usize>> = HashMap::new();
    for i in 0..=buf.len().saturating_sub(MIN_MATCH) {
        let key = [buf[i], buf[i + 1], buf[i + 2]];
        chain.entry(key).or_default().push(i);
    }
    let key = [delta[0], delta[1], delta[2]];
    let candidates = chain.get(&key)?;
    let mut best: Option<(usize, usize)> = None;
    for &start in candidates.iter().rev().take(MAX_CHAIN_DEPTH) {
        let offset = buf.len() - start;
        if offset == 0 || offset > buf.len() {
            continue;
        }
        let mut len = 0;
        while len < max_len && start + len < buf.len() && buf[start + len] == delta[len] {
            len += 1;
        }
        // A match may also extend past the end of `buf` by re-reading bytes it just emitted
        // (the classic LZ77 overlapping-copy case); since we already bounded `len` by `buf.len()`
        // starting position, extend further using the already-matched output as virtual history.
        while len < max_len && delta[len - offset.min(len)] == delta[len] && len >= offset {
            len += 1;
        }
        if len >= MIN_MATCH {
            match best {
                Some((best_len, _)) if best_len >= len => {}
                _ => best = Some((len, offset)),
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_constant_is_all_zero() {
        let codec = DeltaLzCodec::new(LzMode::Scalar);
        let levels = vec![7u8; 4096];
        let mut warnings = Vec::new();
        let bank = codec.encode_bank(&levels, 0, &mut warnings).unwrap();
        assert_eq!(bank.bytes[0], 0); // header: previous level defaults to 0, delta[0] = 7-0=7 though
        assert_eq!(bank.consumed, 4096);
    }

    #[test]
    fn test_ends_with_zero_token() {
        let codec = DeltaLzCodec::new(LzMode::Scalar);
        let levels: Vec<u8> = (0..64u32).map(|i| (i % 20) as u8).collect();
        let mut warnings = Vec::new();
        let bank = codec.encode_bank(&levels, 0, &mut warnings).unwrap();
        assert!(bank.consumed > 0);
        assert_eq!(bank.bytes.len(), BANK_SIZE);
    }

    #[test]
    fn test_state_carries_header_across_banks() {
        let codec = DeltaLzCodec::new(LzMode::Scalar);
        let mut warnings = Vec::new();
        let levels_a = vec![5u8; 16];
        let bank_a = codec.encode_bank(&levels_a, 0, &mut warnings).unwrap();
        assert_eq!(bank_a.bytes[0], 0);
        let levels_b = vec![9u8; 16];
        let bank_b = codec.encode_bank(&levels_b, 1, &mut warnings).unwrap();
        assert_eq!(bank_b.bytes[0], 5);
    }

    #[test]
    fn test_never_exceeds_bank_size() {
        let codec = DeltaLzCodec::new(LzMode::Scalar);
        let mut warnings = Vec::new();
        let levels: Vec<u8> = (0..BANK_SIZE * 2).map(|i| (i % 46) as u8).collect();
        let bank = codec.encode_bank(&levels, 0, &mut warnings).unwrap();
        assert_eq!(bank.bytes.len(), BANK_SIZE);
        assert!(bank.consumed <= levels.len());
    }
}
