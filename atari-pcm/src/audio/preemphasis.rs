//! The fixed 15-tap pre-emphasis FIR.

use super::SampleFilter;
use crate::error::Result;
use atari_pcm_data::fir::{PREEMPHASIS_CENTER, PREEMPHASIS_LEN, PREEMPHASIS_TAPS};
use tracing::instrument;

/// Applies the fixed pre-emphasis FIR in place. History at the start of the buffer is treated as
/// silence (zero-padded), matching how the target player has no prior samples to look back at.
#[derive(Debug, Default, Clone, Copy)]
pub struct Preemphasis;

impl SampleFilter for Preemphasis {
    #[instrument(level = "trace", skip_all, fields(len = samples.len()))]
    fn apply(&mut self, samples: &mut [f32]) -> Result<()> {
        let n = samples.len();
        let mut out = vec![0.0f32; n];
        for (i, out_sample) in out.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (k, &tap) in PREEMPHASIS_TAPS.iter().enumerate() {
                let offset = k as isize - PREEMPHASIS_CENTER as isize;
                let j = i as isize + offset;
                if j >= 0 && (j as usize) < n {
                    acc += tap * samples[j as usize];
                }
            }
            *out_sample = acc;
        }
        samples.copy_from_slice(&out);
        tracing::trace!(taps = PREEMPHASIS_LEN, "applied pre-emphasis");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_silence_stays_silent() {
        let mut samples = vec![0.0f32; 32];
        Preemphasis.apply(&mut samples).unwrap();
        for s in samples {
            assert_approx_eq!(f32, s, 0.0);
        }
    }

    #[test]
    fn test_preserves_length() {
        let mut samples = vec![0.1f32; 17];
        let len = samples.len();
        Preemphasis.apply(&mut samples).unwrap();
        assert_eq!(samples.len(), len);
    }

    #[test]
    fn test_dc_roughly_preserved() {
        // A constant input should come out close to the same constant, since the taps sum to
        // roughly unity gain (away from the edges, where zero-padding attenuates it).
        let mut samples = vec![1.0f32; 64];
        Preemphasis.apply(&mut samples).unwrap();
        let mid = samples[32];
        assert!((mid - 1.0).abs() < 0.05, "mid={mid}");
    }
}
