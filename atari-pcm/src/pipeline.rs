//! Top-level orchestration wiring the whole pipeline together.

use crate::audio::{quantize, LevelTable, QuantizeMode, QuantizeReport, Quantizer, SampleFilter};
use crate::audio::preemphasis::Preemphasis;
use crate::audio::resample::resample_to_divisor;
use crate::bank::pack_banks;
use crate::codec::Codec;
use crate::config::Config;
use crate::error::{Error, Result, Warning};
use crate::project::generate_fragments;
use std::collections::HashMap;

/// The name the player's top-level source is registered under when handed to the assembler; the
/// generated fragments are `icl`-included by their own fixed names regardless of this one.
const PLAYER_SOURCE_NAME: &str = "player.asm";

/// Everything `encode` produces besides the final XEX bytes: the non-fatal conditions collected
/// along the way, and (when `Config::verbose` is set) the quantization-fidelity report.
#[derive(Debug, Clone, Default)]
pub struct EncodeReport {
    pub warnings: Vec<Warning>,
    pub quantize_report: Option<QuantizeReport>,
}

/// Resamples/conditions the signal, quantizes it, picks a bank codec, packs banks, and renders
/// the assembly fragments the player `icl`-includes. Returns the fragments keyed by file name
/// plus an [`EncodeReport`].
///
/// This is the "fragment-only output mode": callers who link against their own static player
/// (rather than asking this crate to assemble one) can stop here.
pub fn generate(samples: &[f32], in_rate: u32, config: &Config) -> Result<(HashMap<String, String>, EncodeReport)> {
    config.validate()?;

    let (mut resampled, divisor, _achieved_rate) = resample_to_divisor(samples, in_rate, config.rate)?;
    if config.enhance {
        Preemphasis.apply(&mut resampled)?;
    }

    let level_table = LevelTable::build(config.channels);
    let mode = if config.noise_shaping { QuantizeMode::NoiseShaped } else { QuantizeMode::Nearest };
    let quantizer = Quantizer::new(mode, &level_table);
    let levels = quantizer.quantize(&resampled, &level_table);

    let quantize_report = config
        .verbose
        .then(|| quantize::verify(&resampled, &levels, &level_table, quantizer.gain()));

    let codec = Codec::from_config(config, level_table.len());
    let mut warnings = Vec::new();
    let packed = pack_banks(&levels, &codec, config.max_banks, config.strict, &mut warnings)?;

    // Nothing in this pipeline asks for the 9-bit/16-bit channel-join modes or the 1.79 MHz
    // direct clock, since every channel is driven by its own divisor through the generated AUDC
    // tables.
    let audctl_val = atari_pcm_data::hw::AudCtl::empty().bits();
    let fragments = generate_fragments(config, &level_table, &packed, divisor, audctl_val);

    Ok((fragments, EncodeReport { warnings, quantize_report }))
}

/// Runs the full pipeline: everything [`generate`] does, plus assembling the caller-supplied
/// static player together with the generated fragments into a bootable XEX.
///
/// `player_source` is the static player's top-level assembly text; it is an opaque fixture from
/// this crate's point of view whose only contract with the generated fragments is the symbol and
/// `icl` names they share.
pub fn encode(samples: &[f32], in_rate: u32, config: &Config, player_source: &str) -> Result<(Vec<u8>, EncodeReport)> {
    let (fragments, report) = generate(samples, in_rate, config)?;

    let mut sources: HashMap<&str, &str> = fragments.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    sources.insert(PLAYER_SOURCE_NAME, player_source);

    let xex = atari_pcm_asm::assemble_xex(PLAYER_SOURCE_NAME, &sources)?;

    if let Some(ceiling) = config.xex_size_ceiling {
        if xex.len() > ceiling {
            return Err(Error::XexTooLarge { size: xex.len(), ceiling });
        }
    }

    Ok((xex, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_fragments_for_silence() {
        let config = Config { max_banks: 1, ..Config::default() };
        let samples = vec![0.0f32; 4096];
        let (fragments, report) = generate(&samples, 15_700, &config).unwrap();
        assert!(fragments.contains_key("bank_00.asm"));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_generate_reports_quantize_when_verbose() {
        let config = Config { verbose: true, max_banks: 1, ..Config::default() };
        let samples = vec![0.3f32; 2048];
        let (_fragments, report) = generate(&samples, 15_700, &config).unwrap();
        assert!(report.quantize_report.is_some());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = Config { channels: 9, ..Config::default() };
        let samples = vec![0.0f32; 16];
        assert!(matches!(generate(&samples, 15_700, &config), Err(Error::InvalidConfig(_))));
    }
}
