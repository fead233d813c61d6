//! The project generator. Emits the plain-text assembly fragments the static player `icl`-includes
//! by fixed, well-known names.

use crate::audio::LevelTable;
use crate::bank::PackedBanks;
use crate::codec::BANK_SIZE;
use crate::config::{Compression, Config};
use std::collections::HashMap;
use std::fmt::Write as _;

const BYTES_PER_LINE: usize = 16;

/// Generates every assembly fragment the static player needs, keyed by file name.
pub fn generate_fragments(
    config: &Config,
    level_table: &LevelTable,
    packed: &PackedBanks,
    divisor: u8,
    audctl_val: u8,
) -> HashMap<String, String> {
    let mut files = HashMap::new();
    files.insert("config.asm".to_owned(), config_asm(config, packed, divisor, audctl_val));
    files.insert("audc_tables.asm".to_owned(), audc_tables_asm(config, level_table));
    if config.compression == Compression::Vq {
        files.insert("vq_tables.asm".to_owned(), vq_tables_asm(config, packed.banks.len()));
    }
    files.insert("portb_table.asm".to_owned(), portb_table_asm(packed.banks.len()));
    files.insert("splash_data.asm".to_owned(), splash_data_asm(config));
    for (i, bank) in packed.banks.iter().enumerate() {
        files.insert(format!("bank_{i:02}.asm"), bank_asm(i, &bank.bytes));
    }
    files.insert("banks.asm".to_owned(), banks_asm(packed.banks.len()));
    files
}

fn compress_mode_code(compression: Compression) -> u8 {
    match compression {
        Compression::Off => 0,
        Compression::Lz => 1,
        Compression::Vq => 2,
    }
}

fn config_asm(config: &Config, packed: &PackedBanks, divisor: u8, audctl_val: u8) -> String {
    use atari_pcm_data::hw::{
        BANK_BASE, CODE_BASE, IRQ_MASK, LZ_BUF_BASE, LZ_BUF_END, PORTB_MAIN, SILENCE, STUB_ADDR,
    };
    let mut out = String::new();
    let _ = writeln!(out, "; Generated configuration constants.");
    let _ = writeln!(out, "N_BANKS = {}", packed.banks.len());
    let _ = writeln!(out, "VEC_SIZE = {}", config.vec_size);
    let _ = writeln!(out, "POKEY_CHANNELS = {}", config.channels);
    let _ = writeln!(out, "COMPRESS_MODE = {}", compress_mode_code(config.compression));
    let _ = writeln!(out, "POKEY_DIVISOR = {divisor}");
    let _ = writeln!(out, "AUDCTL_VAL = ${audctl_val:02X}");
    let _ = writeln!(out, "IRQ_MASK = ${:02X}", IRQ_MASK);
    let _ = writeln!(out, "SILENCE = ${:02X}", SILENCE);
    let _ = writeln!(out, "PORTB_MAIN = ${:02X}", PORTB_MAIN);
    let _ = writeln!(out, "CODE_BASE = ${:04X}", CODE_BASE);
    let _ = writeln!(out, "BANK_BASE = ${:04X}", BANK_BASE);
    let _ = writeln!(out, "LZ_BUF_BASE = ${:04X}", LZ_BUF_BASE);
    let _ = writeln!(out, "LZ_BUF_END = ${:04X}", LZ_BUF_END);
    let _ = writeln!(out, "STUB_ADDR = ${:04X}", STUB_ADDR);
    out
}

fn byte_table(name: &str, bytes: &[u8]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{name}");
    for chunk in bytes.chunks(BYTES_PER_LINE) {
        let line: Vec<String> = chunk.iter().map(|b| format!("${b:02X}")).collect();
        let _ = writeln!(out, "\t.byte {}", line.join(","));
    }
    out
}

fn audc_tables_asm(config: &Config, level_table: &LevelTable) -> String {
    let mut out = String::new();
    for channel in 1..=4u8 {
        let table = if channel <= config.channels {
            level_table.audc_table(channel - 1)
        } else {
            [atari_pcm_data::hw::SILENCE; 256]
        };
        out.push_str(&byte_table(&format!("audc{channel}_tab"), &table));
    }
    out
}

fn vq_tables_asm(config: &Config, bank_count: usize) -> String {
    let mut lo = [0u8; 256];
    let mut hi = [0u8; 256];
    let base = atari_pcm_data::hw::BANK_BASE;
    for i in 0..256usize {
        // Addresses repeat per-bank; only meaningful for indices within the bank's actual
        // codebook size, but the table is fixed at 256 entries regardless of bank_count.
        let _ = bank_count;
        let addr = base.wrapping_add((i * config.vec_size as usize) as u16);
        lo[i] = (addr & 0xFF) as u8;
        hi[i] = (addr >> 8) as u8;
    }
    let mut out = byte_table("vq_lo_tab", &lo);
    out.push_str(&byte_table("vq_hi_tab", &hi));
    out
}

fn portb_table_asm(bank_count: usize) -> String {
    byte_table("portb_table", &vec![0u8; bank_count])
}

/// Converts a subset of ASCII to Atari "internal" (ANTIC mode 2) screen codes: `@`=0, `A-Z`=1..26,
/// digits `0-9`=16..25, space=0 (blank glyph), everything else falls back to space.
fn screen_code(ch: char) -> u8 {
    match ch.to_ascii_uppercase() {
        '@' => 0,
        c @ 'A'..='Z' => 1 + (c as u8 - b'A'),
        c @ '0'..='9' => 16 + (c as u8 - b'0'),
        _ => 0,
    }
}

fn screen_line(text: &str) -> [u8; 40] {
    let mut line = [0u8; 40];
    for (dst, ch) in line.iter_mut().zip(text.chars()) {
        *dst = screen_code(ch);
    }
    line
}

fn splash_data_asm(config: &Config) -> String {
    let mut out = String::new();
    out.push_str(&byte_table("splash_line1", &screen_line(config.title)));
    out.push_str(&byte_table("splash_line2", &screen_line("")));
    out.push_str(&byte_table("error_title", &screen_line("ERROR")));
    out.push_str(&byte_table("error_message", &screen_line(config.error_message)));
    out
}

fn bank_asm(index: usize, bytes: &[u8]) -> String {
    debug_assert_eq!(bytes.len(), BANK_SIZE);
    byte_table(&format!("bank_{index:02}_data"), bytes)
}

fn banks_asm(bank_count: usize) -> String {
    let mut out = String::new();
    for i in 0..bank_count {
        let _ = writeln!(out, "bank_{i:02}_init");
        let _ = writeln!(out, "\tlda #{i}");
        let _ = writeln!(out, "\tjsr switch_bank");
        let _ = writeln!(out, "\tjsr load_bank_{i:02}");
        let _ = writeln!(out, "\trts");
        let _ = writeln!(out, "\tini bank_{i:02}_init");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::pack_banks;
    use crate::codec::{raw::RawCodec, Codec};

    #[test]
    fn test_fragment_names() {
        let config = Config::default();
        let level_table = LevelTable::build(config.channels);
        let levels: Vec<u8> = (0..16u8).collect();
        let codec = Codec::Raw(RawCodec);
        let mut warnings = Vec::new();
        let packed = pack_banks(&levels, &codec, 1, false, &mut warnings).unwrap();
        let fragments = generate_fragments(&config, &level_table, &packed, 111, 0);
        assert!(fragments.contains_key("config.asm"));
        assert!(fragments.contains_key("audc_tables.asm"));
        assert!(fragments.contains_key("portb_table.asm"));
        assert!(fragments.contains_key("splash_data.asm"));
        assert!(fragments.contains_key("bank_00.asm"));
        assert!(fragments.contains_key("banks.asm"));
    }

    #[test]
    fn test_screen_codes() {
        assert_eq!(screen_code('A'), 1);
        assert_eq!(screen_code('Z'), 26);
        assert_eq!(screen_code('0'), 16);
        assert_eq!(screen_code(' '), 0);
    }
}
