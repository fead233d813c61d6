//! Resampling to an achievable POKEY timer rate, DC blocking, and normalization.

use crate::error::{Error, Result};
use atari_pcm_data::hw::PAL_CLOCK;
use libsamplerate_sys::{
    src_delete, src_new, src_process, src_strerror, SRC_DATA, SRC_STATE, SRC_SINC_MEDIUM_QUALITY,
};
use std::ffi::CStr;
use std::os::raw::c_int;
use std::ptr::NonNull;
use tracing::instrument;

/// Headroom left below full scale after normalization, so saturating quantization stays rare.
const NORMALIZE_HEADROOM: f32 = 0.02;

/// DC-blocking high-pass corner frequency in Hz.
const DC_BLOCK_HZ: f32 = 20.0;

/// Chooses the timer divisor `d in 0..=255` whose rate `PAL_CLOCK / (d+1)` is closest to
/// `requested_rate`, and returns `(divisor, achieved_rate)`.
pub fn choose_divisor(requested_rate: u32) -> (u8, u32) {
    let mut best = (0u8, PAL_CLOCK, u32::MAX);
    for d in 0..=255u32 {
        let fs = PAL_CLOCK / (d + 1);
        let diff = fs.abs_diff(requested_rate);
        if diff < best.2 {
            best = (d as u8, fs, diff);
        }
    }
    (best.0, best.1)
}

/// Resamples `samples` from `in_rate` to `out_rate` Hz, blocks DC below 20 Hz, and peak-normalizes
/// to `[-1, 1]` with a small headroom.
#[instrument(level = "trace", skip(samples))]
pub fn resample_to_divisor(samples: &[f32], in_rate: u32, requested_rate: u32) -> Result<(Vec<f32>, u8, u32)> {
    let (divisor, out_rate) = choose_divisor(requested_rate);
    tracing::debug!(in_rate, requested_rate, out_rate, divisor, "resampling");
    let mut resampled = if in_rate == out_rate {
        samples.to_vec()
    } else {
        Resampler::new(in_rate as f64 / out_rate as f64)?.process(samples)?
    };
    dc_block(&mut resampled, out_rate as f32);
    normalize(&mut resampled);
    Ok((resampled, divisor, out_rate))
}

/// A single-use mono resampler wrapping `libsamplerate`.
struct Resampler {
    state: NonNull<SRC_STATE>,
    ratio: f64,
}

fn make_error(code: c_int) -> Error {
    // SAFETY: src_strerror returns a pointer to a static, NUL-terminated string table entry.
    let msg = unsafe { CStr::from_ptr(src_strerror(code)) };
    Error::InvalidConfig(Box::leak(msg.to_string_lossy().into_owned().into_boxed_str()))
}

impl Resampler {
    fn new(ratio: f64) -> Result<Self> {
        let mut err: c_int = 0;
        // SAFETY: src_new is a pure C allocation function; the returned pointer is checked below.
        let state = unsafe { src_new(SRC_SINC_MEDIUM_QUALITY as c_int, 1, &mut err) };
        let state = NonNull::new(state).ok_or_else(|| make_error(err))?;
        Ok(Self { state, ratio })
    }

    fn process(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        let out_len = ((input.len() as f64) / self.ratio).ceil() as usize + 16;
        let mut output = vec![0.0f32; out_len];
        let mut data = SRC_DATA {
            data_in: input.as_ptr(),
            data_out: output.as_mut_ptr(),
            input_frames: input.len() as i64,
            output_frames: out_len as i64,
            input_frames_used: 0,
            output_frames_gen: 0,
            end_of_input: 1,
            src_ratio: 1.0 / self.ratio,
        };
        // SAFETY: `state` is a valid handle from `src_new`; `data` describes buffers that outlive
        // this call.
        let code = unsafe { src_process(self.state.as_ptr(), &mut data) };
        if code != 0 {
            return Err(make_error(code));
        }
        output.truncate(data.output_frames_gen as usize);
        Ok(output)
    }
}

impl Drop for Resampler {
    fn drop(&mut self) {
        // SAFETY: `state` was created by `src_new` in `Resampler::new` and is only freed once.
        unsafe {
            src_delete(self.state.as_ptr());
        }
    }
}

/// A simple one-pole DC-blocking high-pass filter, applied in place.
fn dc_block(samples: &mut [f32], sample_rate: f32) {
    let r = 1.0 - (2.0 * std::f32::consts::PI * DC_BLOCK_HZ / sample_rate);
    let mut prev_in = 0.0f32;
    let mut prev_out = 0.0f32;
    for s in samples.iter_mut() {
        let x = *s;
        let y = x - prev_in + r * prev_out;
        prev_in = x;
        prev_out = y;
        *s = y;
    }
}

/// Peak-normalizes `samples` to `[-1, 1]` with a small headroom, in place.
fn normalize(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    if peak <= f32::EPSILON {
        return;
    }
    let gain = (1.0 - NORMALIZE_HEADROOM) / peak;
    for s in samples.iter_mut() {
        *s *= gain;
    }
}
