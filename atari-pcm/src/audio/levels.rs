//! The POKEY single-step level allocator and AUDC lookup tables.

use arrayvec::ArrayVec;
use atari_pcm_data::voltage::modeled_voltage;
use tracing::instrument;

/// Maximum number of POKEY channels a level table can span.
pub const MAX_CHANNELS: u8 = 4;

type Levels = ArrayVec<u8, { MAX_CHANNELS as usize }>;

/// The ordered level table `V` for a fixed channel count, plus its derived AUDC tables.
///
/// `V[s]` is a tuple of per-channel volume nibbles (`0..=15`). Consecutive entries differ in
/// exactly one channel by exactly one step (the single-step invariant, P1); the modeled analog
/// sum is non-decreasing in `s` (P2).
#[derive(Debug, Clone)]
pub struct LevelTable {
    channels: u8,
    levels: Vec<Levels>,
}

impl LevelTable {
    /// Builds the level table for `channels` POKEY channels (`1..=4`) using the single-step
    /// round-robin allocation rule: at each step, increment whichever channel currently has the
    /// smallest volume, breaking ties by lowest channel index.
    #[instrument(level = "trace", skip_all, fields(channels))]
    pub fn build(channels: u8) -> Self {
        assert!((1..=MAX_CHANNELS).contains(&channels), "channels must be in 1..=4");
        let len = 15 * channels as usize + 1;
        let mut levels = Vec::with_capacity(len);
        let mut current: Levels = (0..channels).map(|_| 0u8).collect();
        levels.push(current.clone());
        for _ in 1..len {
            let (min_idx, _) = current
                .iter()
                .enumerate()
                .min_by_key(|&(i, &v)| (v, i))
                .expect("channels is nonzero");
            current[min_idx] += 1;
            levels.push(current.clone());
        }
        tracing::trace!(len, "built level table");
        Self { channels, levels }
    }

    /// The number of POKEY channels this table was built for.
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// The number of levels, `L = 15*channels + 1`.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The per-channel volume nibbles for level `s`.
    pub fn get(&self, s: usize) -> &[u8] {
        &self.levels[s]
    }

    /// The modeled analog sum `sum_i f(V[s][i])` used for the monotonicity invariant and for
    /// noise-shaping error computation.
    pub fn modeled_sum(&self, s: usize) -> f32 {
        self.levels[s].iter().map(|&v| modeled_voltage(v)).sum()
    }

    /// Builds the 256-entry AUDC lookup table for channel `channel` (`0`-based, `< channels()`).
    /// Entries `[0, len())` encode `0x10 | V[s][channel]`; entries `[len(), 256)` are don't-care
    /// but deterministically `0x10` (silence, volume-only mode).
    pub fn audc_table(&self, channel: u8) -> [u8; 256] {
        assert!(channel < self.channels, "channel out of range");
        let mut table = [atari_pcm_data::hw::SILENCE; 256];
        for (s, levels) in self.levels.iter().enumerate() {
            table[s] = atari_pcm_data::hw::SILENCE | levels[channel as usize];
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hamming_one_step(a: &[u8], b: &[u8]) -> bool {
        let mut diffs = 0;
        for (&x, &y) in a.iter().zip(b) {
            if x != y {
                diffs += 1;
                if (i16::from(x) - i16::from(y)).abs() != 1 {
                    return false;
                }
            }
        }
        diffs == 1
    }

    #[test]
    fn test_single_step_all_channel_counts() {
        for c in 1..=4u8 {
            let table = LevelTable::build(c);
            assert_eq!(table.len(), 15 * c as usize + 1);
            for s in 0..table.len() - 1 {
                assert!(hamming_one_step(table.get(s), table.get(s + 1)), "c={c} s={s}");
            }
        }
    }

    #[test]
    fn test_monotone_modeled_sum() {
        for c in 1..=4u8 {
            let table = LevelTable::build(c);
            let mut prev = table.modeled_sum(0);
            for s in 1..table.len() {
                let cur = table.modeled_sum(s);
                assert!(cur >= prev - f32::EPSILON, "c={c} s={s} {cur} < {prev}");
                prev = cur;
            }
        }
    }

    #[test]
    fn test_audc_round_trip() {
        for c in 1..=4u8 {
            let table = LevelTable::build(c);
            for channel in 0..c {
                let audc = table.audc_table(channel);
                for s in 0..table.len() {
                    assert_eq!(audc[s] & 0x0F, table.get(s)[channel as usize]);
                    assert_ne!(audc[s] & 0x10, 0);
                }
            }
        }
    }

    #[test]
    fn test_c3_fixed_points() {
        let table = LevelTable::build(3);
        assert_eq!(table.len(), 46);
        assert_eq!(table.get(15), &[15, 0, 0]);
        assert_eq!(table.get(30), &[15, 15, 0]);
        assert_eq!(table.get(45), &[15, 15, 15]);
    }
}
