//! Signal preparation: resampling, DC blocking, normalization, pre-emphasis, and multi-channel
//! voltage-level quantization.

pub mod levels;
pub mod preemphasis;
pub mod quantize;
pub mod resample;

pub use levels::LevelTable;
pub use quantize::{QuantizeMode, QuantizeReport, Quantizer};
pub use resample::resample_to_divisor;

use crate::error::Result;

/// A composable, in-place processing stage over a mono float PCM buffer.
///
/// Stages that preserve sample count (pre-emphasis) implement this directly; stages that change
/// sample count (resampling) are modeled as free functions returning a new buffer instead, since
/// there is no "in place" for them.
pub trait SampleFilter {
    fn apply(&mut self, samples: &mut [f32]) -> Result<()>;
}
