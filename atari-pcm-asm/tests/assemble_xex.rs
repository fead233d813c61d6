use atari_pcm_asm::diagnostics::Diagnostic;
use atari_pcm_asm::{assemble_xex, build_source_map};
use std::collections::HashMap;

#[test]
fn test_assemble_xex_multi_segment_with_init_and_include() {
    let player = "\
org $2000
icl \"tables.asm\"
start:
\tlda table
\tsta $d200
\tjmp start
org $2E80
init:
\trts
ini init
";
    let tables = "table: .byte $01,$02,$03,$04\n";

    let mut sources: HashMap<&str, &str> = HashMap::new();
    sources.insert("player.asm", player);
    sources.insert("tables.asm", tables);

    let xex = assemble_xex("player.asm", &sources).unwrap();

    assert_eq!(&xex[0..2], &[0xFF, 0xFF]);

    let first_segment_origin = u16::from_le_bytes([xex[2], xex[3]]);
    assert_eq!(first_segment_origin, 0x2000);

    let len = xex.len();
    let init_header_offset = len - 6 - 6;
    let init_origin = u16::from_le_bytes([xex[init_header_offset], xex[init_header_offset + 1]]);
    assert_eq!(init_origin, 0x02E2);

    let run_header_offset = len - 6;
    let run_origin = u16::from_le_bytes([xex[run_header_offset], xex[run_header_offset + 1]]);
    assert_eq!(run_origin, 0x02E0);

    // start: sits 4 bytes into the first segment, past the spliced-in table.
    let run_lo = xex[run_header_offset + 4];
    let run_hi = xex[run_header_offset + 5];
    assert_eq!(u16::from_le_bytes([run_lo, run_hi]), 0x2004);
}

#[test]
fn test_assemble_xex_reports_missing_source() {
    let player = "icl \"missing.asm\"\norg $2000\nstart:\n\trts\n";
    let mut sources: HashMap<&str, &str> = HashMap::new();
    sources.insert("player.asm", player);

    let err = assemble_xex("player.asm", &sources).unwrap_err();
    assert!(matches!(err, atari_pcm_asm::Error::SourceNotFound { .. }));
}

#[test]
fn test_error_inside_included_file_resolves_to_its_own_name_and_line() {
    let player = "org $2000\nicl \"tables.asm\"\nstart:\n\trts\n";
    let tables = "table:\n\t.byte $01\n\t.byte missing_symbol\n";

    let mut sources: HashMap<&str, &str> = HashMap::new();
    sources.insert("player.asm", player);
    sources.insert("tables.asm", tables);

    let err = assemble_xex("player.asm", &sources).unwrap_err();
    assert!(matches!(err, atari_pcm_asm::Error::UndefinedSymbol { .. }));

    let source_map = build_source_map("player.asm", &sources).unwrap();
    let diagnostic = Diagnostic::from(&err);
    let rendered = diagnostic.render(&source_map);
    assert!(rendered.starts_with("tables.asm:3:"), "rendered diagnostic: {rendered}");
}
