//! The quantizer, mapping float samples to POKEY level indices.

use super::levels::LevelTable;
use tracing::instrument;

/// Quantizer operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantizeMode {
    /// Pick the nearest level for each sample independently.
    Nearest,
    /// 1st-order error-diffusion noise shaping. Forbidden for VQ (see [`crate::config::Config`]).
    NoiseShaped,
}

/// Maps a float PCM stream to a stream of level indices against a fixed [`LevelTable`].
pub struct Quantizer {
    mode: QuantizeMode,
    gain: f32,
}

impl Quantizer {
    /// Creates a quantizer for `table`, with the peak-normalization gain chosen so that full
    /// scale (`1.0`) maps to `s = table.len() - 1`.
    pub fn new(mode: QuantizeMode, table: &LevelTable) -> Self {
        let gain = table.modeled_sum(table.len() - 1);
        Self { mode, gain }
    }

    /// The peak-normalization gain this quantizer was built with, for passing to [`verify`].
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Quantizes `samples` against `table`, returning one level index per sample.
    #[instrument(level = "trace", skip_all, fields(len = samples.len(), mode = ?self.mode))]
    pub fn quantize(&self, samples: &[f32], table: &LevelTable) -> Vec<u8> {
        let max_s = table.len() - 1;
        let mut out = Vec::with_capacity(samples.len());
        let mut error = 0.0f32;
        for &x in samples {
            let target = match self.mode {
                QuantizeMode::Nearest => x * self.gain,
                QuantizeMode::NoiseShaped => x * self.gain + error,
            };
            let s = nearest_level(table, target).min(max_s);
            if self.mode == QuantizeMode::NoiseShaped {
                error = target - table.modeled_sum(s);
            }
            out.push(s as u8);
        }
        tracing::trace!(count = out.len(), "quantized stream");
        out
    }
}

/// Finds the level index whose modeled voltage sum is closest to `target`. `table`'s modeled sums
/// are non-decreasing in `s`, so a partition point gives the crossover in one pass.
fn nearest_level(table: &LevelTable, target: f32) -> usize {
    let len = table.len();
    if target <= table.modeled_sum(0) {
        return 0;
    }
    if target >= table.modeled_sum(len - 1) {
        return len - 1;
    }
    let mut lo = 0usize;
    let mut hi = len - 1;
    while lo + 1 < hi {
        let mid = (lo + hi) / 2;
        if table.modeled_sum(mid) <= target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let (lo_v, hi_v) = (table.modeled_sum(lo), table.modeled_sum(hi));
    if (target - lo_v).abs() <= (hi_v - target).abs() {
        lo
    } else {
        hi
    }
}

/// RMSE/SNR verification report, attached to the pipeline output when [`crate::config::Config::verbose`]
/// is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizeReport {
    pub rmse: f32,
    pub snr_db: f32,
}

/// Computes an RMSE/SNR report comparing `samples` (pre-quantization, gained into modeled-voltage
/// space) against the reconstructed `levels` stream.
pub fn verify(samples: &[f32], levels: &[u8], table: &LevelTable, gain: f32) -> QuantizeReport {
    let n = samples.len().min(levels.len()) as f32;
    if n == 0.0 {
        return QuantizeReport { rmse: 0.0, snr_db: f32::INFINITY };
    }
    let mut signal_energy = 0.0f64;
    let mut error_energy = 0.0f64;
    for (&x, &s) in samples.iter().zip(levels) {
        let target = (x * gain) as f64;
        let actual = f64::from(table.modeled_sum(s as usize));
        signal_energy += target * target;
        error_energy += (target - actual).powi(2);
    }
    let rmse = (error_energy / f64::from(n)).sqrt() as f32;
    let snr_db = if error_energy <= f64::EPSILON {
        f32::INFINITY
    } else {
        (10.0 * (signal_energy / error_energy).log10()) as f32
    };
    QuantizeReport { rmse, snr_db }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_monotone_ramp() {
        let table = LevelTable::build(1);
        let q = Quantizer::new(QuantizeMode::Nearest, &table);
        // Full-scale should land exactly on the top level.
        let levels = q.quantize(&[1.0], &table);
        assert_eq!(levels[0] as usize, table.len() - 1);
        // Silence should land on level 0.
        let levels = q.quantize(&[0.0], &table);
        assert_eq!(levels[0], 0);
    }

    #[test]
    fn test_noise_shaped_tracks_dc() {
        let table = LevelTable::build(1);
        let q = Quantizer::new(QuantizeMode::NoiseShaped, &table);
        let samples = vec![0.3f32; 256];
        let levels = q.quantize(&samples, &table);
        // The long-run average modeled voltage should track the target closely; noise shaping
        // distributes the quantization error rather than letting it accumulate unboundedly.
        let gain = table.modeled_sum(table.len() - 1);
        let target_sum: f32 = samples.iter().map(|&x| x * gain).sum();
        let actual_sum: f32 = levels.iter().map(|&s| table.modeled_sum(s as usize)).sum();
        let avg_err = (target_sum - actual_sum).abs() / samples.len() as f32;
        assert!(avg_err < 1.0, "avg_err={avg_err}");
    }
}
