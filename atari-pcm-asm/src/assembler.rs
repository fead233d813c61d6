//! The two-pass assembler and the `icl` preprocessor that feeds it.
//!
//! Pass 1 walks the statement list maintaining the location counter and active segment, assigning
//! tentative (in fact final, since nothing here ever revisits an earlier decision) addresses to
//! every label and picking each instruction's addressing mode. Pass 2 re-walks the same statements
//! — skipping exactly the ones pass 1 marked inactive inside a conditional — and emits bytes against
//! the now-complete symbol table. Keeping pass 1's active/inactive decision and mode choices as a
//! frozen snapshot, rather than letting pass 2 recompute them, is what keeps the two passes from
//! disagreeing about where `*` is.

use crate::ast::{Directive, Expr, Line, Node, Operand, Statement};
use crate::label::{qualify_local, LabelMap};
use crate::lexer::Token;
use crate::parser::program_parser;
use crate::program::{Program, Segment, SegmentKind};
use crate::source_map::SourceMap;
use crate::span::Span;
use crate::{Error, Result};
use atari_pcm_data::opcodes::{AddressingMode, Mnemonic};
use chumsky::{Parser, Stream};
use logos::Logos;
use smol_str::SmolStr;
use std::collections::HashMap;
use tracing::instrument;

/// The symbol named by convention as the program's entry point.
const ENTRY_SYMBOL: &str = "start";
const RUN_VECTOR: u16 = 0x02E0;
const INIT_VECTOR: u16 = 0x02E2;

/// Assembles `entry` (and everything it `icl`-includes, transitively, from `sources`) into a
/// linked [`Program`].
#[instrument(level = "debug", skip(sources), fields(entry))]
pub fn assemble(entry: &str, sources: &HashMap<&str, &str>) -> Result<Program> {
    let (flattened, _map) = splice(entry, sources)?;
    let tokens = lex(&flattened)?;
    let lines = parse(&flattened, tokens)?;
    tracing::trace!(lines = lines.len(), "parsed source");

    let layout = layout(&lines)?;
    let program = emit(&lines, layout)?;
    tracing::debug!(segments = program.segments.len(), "assembled program");
    Ok(program)
}

/// Assembles and links `entry` into a bootable XEX byte stream.
#[instrument(level = "debug", skip(sources), fields(entry))]
pub fn assemble_xex(entry: &str, sources: &HashMap<&str, &str>) -> Result<Vec<u8>> {
    let program = assemble(entry, sources)?;
    let xex = crate::writer::link(&program);
    tracing::debug!(bytes = xex.len(), "linked xex");
    Ok(xex)
}

/// Builds the [`SourceMap`] that resolves `entry`'s spans back to real file names and lines, for
/// rendering a [`crate::diagnostics::Diagnostic`] from an [`Error`] that [`assemble`] or
/// [`assemble_xex`] returned. Splicing (which this also performs) is the only stage that can fail
/// before a map exists — an unresolvable or cyclic `icl` — and it fails identically here and in
/// [`assemble`], so a caller can always build this map for any error the other two return.
pub fn source_map(entry: &str, sources: &HashMap<&str, &str>) -> Result<SourceMap> {
    let (_flattened, map) = splice(entry, sources)?;
    Ok(map)
}

/// Flattens `entry` and everything it `icl`-includes into one source text, alongside the
/// [`SourceMap`] that maps each byte offset in that text back to the original file name and line
/// it was copied from. `icl` is recognized textually, before lexing, rather than as a parsed
/// directive — a source line whose first whitespace-separated word is `icl` (case-insensitive) is
/// replaced by the named source's text. This runs unconditionally: an `icl` inside a `.if` block
/// that pass 1 later decides is inactive has already been spliced in by this point, the same way
/// MADS's own preprocessor behaves.
fn splice(name: &str, sources: &HashMap<&str, &str>) -> Result<(String, SourceMap)> {
    let mut out = String::new();
    let mut stack = Vec::new();
    let mut names = Vec::new();
    let mut name_ids = HashMap::new();
    let mut line_owners = Vec::new();
    splice_into(name, sources, &mut stack, &mut out, &mut names, &mut name_ids, &mut line_owners)?;
    let map = SourceMap::new(out.clone(), names, line_owners);
    Ok((out, map))
}

#[allow(clippy::too_many_arguments)]
fn splice_into(
    name: &str,
    sources: &HashMap<&str, &str>,
    stack: &mut Vec<String>,
    out: &mut String,
    names: &mut Vec<String>,
    name_ids: &mut HashMap<String, u32>,
    line_owners: &mut Vec<(u32, u32)>,
) -> Result<()> {
    if stack.iter().any(|s| s == name) {
        return Err(Error::IncludeCycle { name: name.to_owned() });
    }
    let text = sources.get(name).copied().ok_or_else(|| Error::SourceNotFound { name: name.to_owned() })?;
    let file_id = *name_ids.entry(name.to_owned()).or_insert_with(|| {
        names.push(name.to_owned());
        (names.len() - 1) as u32
    });
    stack.push(name.to_owned());
    for (local_line, line) in text.lines().enumerate() {
        let trimmed = line.trim_start();
        let mut words = trimmed.split_whitespace();
        if let Some(first) = words.next() {
            if first.eq_ignore_ascii_case("icl") {
                let rest = trimmed[first.len()..].trim();
                let included = rest.trim_matches('"');
                splice_into(included, sources, stack, out, names, name_ids, line_owners)?;
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
        line_owners.push((file_id, (local_line + 1) as u32));
    }
    stack.pop();
    Ok(())
}

fn lex(src: &str) -> Result<Vec<(Token, std::ops::Range<usize>)>> {
    let mut lexer = Token::lexer(src);
    let mut tokens = Vec::new();
    while let Some(tok) = lexer.next() {
        if tok == Token::Error {
            return Err(Error::Lex { span: to_span(lexer.span()) });
        }
        tokens.push((tok, lexer.span()));
    }
    Ok(tokens)
}

fn parse(src: &str, tokens: Vec<(Token, std::ops::Range<usize>)>) -> Result<Vec<Line>> {
    let eoi = src.len()..src.len();
    let stream = Stream::from_iter(eoi, tokens.into_iter());
    program_parser().parse(stream).map_err(|errors| {
        let first = errors.into_iter().next().expect("chumsky reported failure with no errors");
        Error::Parse { message: first.to_string(), span: to_span(first.span()) }
    })
}

fn to_span(range: std::ops::Range<usize>) -> Span {
    Span::try_from(range).expect("source file larger than 4 GiB")
}

/// One conditional-assembly nesting level.
struct CondFrame {
    /// Whether everything enclosing this `.if`/`.elseif`/`.else` chain is itself active.
    parent_active: bool,
    /// Whether any branch of this chain has been taken yet (controls `.elseif`/`.else`).
    any_taken: bool,
    /// Whether lines directly under the current branch of this chain should be assembled.
    active: bool,
}

/// Pass 1's frozen output: each line's assigned addressing mode (for instructions) and whether
/// conditional assembly kept it active, plus the final, complete symbol table.
struct Layout {
    modes: Vec<Option<AddressingMode>>,
    active: Vec<bool>,
    symbols: HashMap<String, u32>,
}

fn current_active(stack: &[CondFrame]) -> bool {
    stack.last().map_or(true, |f| f.active)
}

#[allow(clippy::too_many_lines)]
#[instrument(level = "trace", skip_all)]
fn layout(lines: &[Line]) -> Result<Layout> {
    let mut pc: u32 = 0;
    let mut symbols: HashMap<String, u32> = HashMap::new();
    let mut labels = LabelMap::new();
    let mut scope: Option<SmolStr> = None;
    let mut cond_stack: Vec<CondFrame> = Vec::new();
    let mut modes = Vec::with_capacity(lines.len());
    let mut active = Vec::with_capacity(lines.len());

    for line in lines {
        let is_active = current_active(&cond_stack);
        active.push(is_active);
        let mut mode = None;

        match &line.statement {
            Statement::Label(name) => {
                if is_active {
                    let id = labels.insert_new(name.to_string(), line.span)?;
                    labels.set_value(id, pc);
                    symbols.insert(name.to_string(), pc);
                    scope = Some(name.clone());
                }
            }
            Statement::LocalLabel(name) => {
                if is_active {
                    let qualified = qualify_local(name, scope.as_deref());
                    let id = labels.insert_new(qualified.clone(), line.span)?;
                    labels.set_value(id, pc);
                    symbols.insert(qualified, pc);
                }
            }
            Statement::Directive(Directive::If(expr)) => {
                let parent_active = current_active(&cond_stack);
                let (frame_active, any_taken) = if parent_active {
                    let v = eval(&expr.data, pc, &symbols, scope.as_deref(), expr.span)? != 0;
                    (v, v)
                } else {
                    (false, true)
                };
                cond_stack.push(CondFrame { parent_active, any_taken, active: frame_active });
            }
            Statement::Directive(Directive::Elseif(expr)) => {
                let span = expr.span;
                let frame = cond_stack.last_mut().ok_or(Error::UnexpectedConditional { span })?;
                if frame.parent_active && !frame.any_taken {
                    let v = eval(&expr.data, pc, &symbols, scope.as_deref(), span)? != 0;
                    frame.active = v;
                    if v {
                        frame.any_taken = true;
                    }
                } else {
                    frame.active = false;
                }
            }
            Statement::Directive(Directive::Else) => {
                let frame = cond_stack.last_mut().ok_or(Error::UnexpectedConditional { span: line.span })?;
                frame.active = frame.parent_active && !frame.any_taken;
                frame.any_taken = true;
            }
            Statement::Directive(Directive::Endif) => {
                cond_stack.pop().ok_or(Error::UnexpectedConditional { span: line.span })?;
            }
            Statement::Directive(Directive::Error(message)) => {
                if is_active {
                    return Err(Error::Directive { message: message.to_string(), span: line.span });
                }
            }
            Statement::Directive(Directive::Byte(values)) => {
                if is_active {
                    pc += values.len() as u32;
                }
            }
            Statement::Directive(Directive::Word(values)) => {
                if is_active {
                    pc += 2 * values.len() as u32;
                }
            }
            Statement::Directive(Directive::Org(expr)) => {
                if is_active {
                    pc = eval(&expr.data, pc, &symbols, scope.as_deref(), expr.span)? as u32;
                }
            }
            Statement::Directive(Directive::Ini(_)) => {}
            Statement::Directive(Directive::Equ(name, expr)) => {
                if is_active {
                    let value = eval(&expr.data, pc, &symbols, scope.as_deref(), expr.span)? as u32;
                    let id = labels.insert_new(name.to_string(), line.span)?;
                    labels.set_value(id, value);
                    symbols.insert(name.to_string(), value);
                }
            }
            Statement::Instruction { mnemonic, operand } => {
                if is_active {
                    let m = pick_mode(mnemonic, operand, pc, &symbols, scope.as_deref(), line.span)?;
                    pc += 1 + m.operand_len() as u32;
                    mode = Some(m);
                }
            }
        }
        modes.push(mode);
    }

    if !cond_stack.is_empty() {
        return Err(Error::UnexpectedConditional { span: lines.last().map_or(Span::EMPTY, |l| l.span) });
    }

    Ok(Layout { modes, active, symbols })
}

fn mnemonic_of(name: &str, span: Span) -> Result<Mnemonic> {
    Mnemonic::get(&name.to_uppercase()).ok_or_else(|| Error::UnknownMnemonic { name: name.to_owned(), span })
}

fn pick_mode(
    mnemonic_name: &str,
    operand: &Option<Operand>,
    pc: u32,
    symbols: &HashMap<String, u32>,
    scope: Option<&str>,
    span: Span,
) -> Result<AddressingMode> {
    let mnemonic = mnemonic_of(mnemonic_name, span)?;
    let resolvable_u8 = |node: &Node<Expr>| -> Result<bool> {
        Ok(try_eval(&node.data, pc, symbols, scope, node.span)?.is_some_and(|v| (0..=0xFF).contains(&v)))
    };
    let want = match operand {
        None => return has_mode(mnemonic, AddressingMode::Implied, mnemonic_name, span),
        Some(Operand::Accumulator) => {
            return has_mode(mnemonic, AddressingMode::Accumulator, mnemonic_name, span)
        }
        Some(Operand::Immediate(_)) => {
            return has_mode(mnemonic, AddressingMode::Immediate, mnemonic_name, span)
        }
        Some(Operand::IndirectX(_)) => {
            return has_mode(mnemonic, AddressingMode::IndirectX, mnemonic_name, span)
        }
        Some(Operand::IndirectY(_)) => {
            return has_mode(mnemonic, AddressingMode::IndirectY, mnemonic_name, span)
        }
        Some(Operand::Indirect(_)) => {
            return has_mode(mnemonic, AddressingMode::Indirect, mnemonic_name, span)
        }
        Some(Operand::IndexedX(node)) => (node, AddressingMode::ZeroPageX, AddressingMode::AbsoluteX),
        Some(Operand::IndexedY(node)) => (node, AddressingMode::ZeroPageY, AddressingMode::AbsoluteY),
        Some(Operand::Direct(node)) => {
            if mnemonic.opcode(AddressingMode::Relative).is_some() {
                return Ok(AddressingMode::Relative);
            }
            (node, AddressingMode::ZeroPage, AddressingMode::Absolute)
        }
    };
    let (node, small, large) = want;
    let small_ok = mnemonic.opcode(small).is_some() && resolvable_u8(node)?;
    if small_ok {
        Ok(small)
    } else if mnemonic.opcode(large).is_some() {
        Ok(large)
    } else if mnemonic.opcode(small).is_some() {
        Ok(small)
    } else {
        Err(Error::BadAddressingMode { mnemonic: mnemonic_name.to_owned(), span })
    }
}

fn has_mode(mnemonic: Mnemonic, mode: AddressingMode, name: &str, span: Span) -> Result<AddressingMode> {
    if mnemonic.opcode(mode).is_some() {
        Ok(mode)
    } else {
        Err(Error::BadAddressingMode { mnemonic: name.to_owned(), span })
    }
}

/// Evaluates `expr`, tolerating an undefined symbol by returning `None` instead of failing — used
/// in pass 1 where a forward reference just means "not resolvable yet", not an error.
fn try_eval(
    expr: &Expr,
    pc: u32,
    symbols: &HashMap<String, u32>,
    scope: Option<&str>,
    span: Span,
) -> Result<Option<i64>> {
    match eval(expr, pc, symbols, scope, span) {
        Ok(v) => Ok(Some(v)),
        Err(Error::UndefinedSymbol { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

fn eval(
    expr: &Expr,
    pc: u32,
    symbols: &HashMap<String, u32>,
    scope: Option<&str>,
    span: Span,
) -> Result<i64> {
    let recur = |e: &Expr| eval(e, pc, symbols, scope, span);
    Ok(match expr {
        Expr::Number(n) => i64::from(*n),
        Expr::Pc => i64::from(pc),
        Expr::Ident(name) => i64::from(
            *symbols
                .get(name.as_str())
                .ok_or_else(|| Error::UndefinedSymbol { name: name.to_string(), span })?,
        ),
        Expr::Local(name) => {
            let qualified = qualify_local(name, scope);
            i64::from(
                *symbols
                    .get(&qualified)
                    .ok_or_else(|| Error::UndefinedSymbol { name: qualified, span })?,
            )
        }
        Expr::Neg(e) => -recur(e)?,
        Expr::Not(e) => !recur(e)?,
        Expr::Lo(e) => recur(e)? & 0xFF,
        Expr::Hi(e) => (recur(e)? >> 8) & 0xFF,
        Expr::Add(a, b) => recur(a)? + recur(b)?,
        Expr::Sub(a, b) => recur(a)? - recur(b)?,
        Expr::Mul(a, b) => recur(a)? * recur(b)?,
        Expr::Div(a, b) => {
            let divisor = recur(b)?;
            if divisor == 0 {
                return Err(Error::DivisionByZero { span });
            }
            recur(a)? / divisor
        }
        Expr::And(a, b) => recur(a)? & recur(b)?,
        Expr::Or(a, b) => recur(a)? | recur(b)?,
        Expr::Xor(a, b) => recur(a)? ^ recur(b)?,
    })
}

#[instrument(level = "trace", skip_all)]
fn emit(lines: &[Line], layout: Layout) -> Result<Program> {
    let Layout { modes, active, symbols } = layout;
    let mut segments: Vec<Segment> = Vec::new();
    let mut scope: Option<SmolStr> = None;
    let mut pc: u32 = 0;

    for ((line, is_active), mode) in lines.iter().zip(active.iter()).zip(modes.iter()) {
        if !*is_active {
            continue;
        }
        match &line.statement {
            Statement::Label(name) => scope = Some(name.clone()),
            Statement::LocalLabel(_) => {}
            Statement::Directive(Directive::Org(expr)) => {
                pc = eval(&expr.data, pc, &symbols, scope.as_deref(), expr.span)? as u32;
                segments.push(Segment { origin: pc as u16, bytes: Vec::new(), kind: SegmentKind::Main });
            }
            Statement::Directive(Directive::Ini(expr)) => {
                let value = eval(&expr.data, pc, &symbols, scope.as_deref(), expr.span)? as u32;
                segments.push(Segment {
                    origin: INIT_VECTOR,
                    bytes: vec![(value & 0xFF) as u8, ((value >> 8) & 0xFF) as u8],
                    kind: SegmentKind::Init,
                });
            }
            Statement::Directive(Directive::Byte(values)) => {
                let segment = segments.last_mut().ok_or(Error::NoActiveSegment { span: line.span })?;
                for node in values {
                    let v = eval(&node.data, pc, &symbols, scope.as_deref(), node.span)?;
                    if !(-0x80..=0xFF).contains(&v) {
                        return Err(Error::ValueOutOfRange { span: node.span });
                    }
                    segment.bytes.push((v & 0xFF) as u8);
                    pc += 1;
                }
            }
            Statement::Directive(Directive::Word(values)) => {
                let segment = segments.last_mut().ok_or(Error::NoActiveSegment { span: line.span })?;
                for node in values {
                    let v = eval(&node.data, pc, &symbols, scope.as_deref(), node.span)?;
                    if !(-0x8000..=0xFFFF).contains(&v) {
                        return Err(Error::ValueOutOfRange { span: node.span });
                    }
                    segment.bytes.push((v & 0xFF) as u8);
                    segment.bytes.push(((v >> 8) & 0xFF) as u8);
                    pc += 2;
                }
            }
            Statement::Directive(_) => {}
            Statement::Instruction { mnemonic, operand } => {
                let mode = mode.expect("pass 1 assigned a mode to every active instruction");
                let opcode = mnemonic_of(mnemonic, line.span)?
                    .opcode(mode)
                    .expect("pass 1 only picks modes the mnemonic supports");
                let segment = segments.last_mut().ok_or(Error::NoActiveSegment { span: line.span })?;
                segment.bytes.push(opcode);
                pc += 1;
                if mode == AddressingMode::Relative {
                    let node = operand_node(operand);
                    let target = eval(&node.data, pc, &symbols, scope.as_deref(), node.span)?;
                    let offset = target - i64::from(pc) - 1;
                    if !(-128..=127).contains(&offset) {
                        return Err(Error::BranchOutOfRange { offset, span: node.span });
                    }
                    segment.bytes.push(offset as i8 as u8);
                    pc += 1;
                } else if mode != AddressingMode::Implied && mode != AddressingMode::Accumulator {
                    let node = operand_node(operand);
                    let v = eval(&node.data, pc, &symbols, scope.as_deref(), node.span)?;
                    match mode.operand_len() {
                        1 => {
                            if !(-0x80..=0xFF).contains(&v) {
                                return Err(Error::ValueOutOfRange { span: node.span });
                            }
                            segment.bytes.push((v & 0xFF) as u8);
                        }
                        2 => {
                            if !(-0x8000..=0xFFFF).contains(&v) {
                                return Err(Error::ValueOutOfRange { span: node.span });
                            }
                            segment.bytes.push((v & 0xFF) as u8);
                            segment.bytes.push(((v >> 8) & 0xFF) as u8);
                        }
                        _ => unreachable!("only 1- and 2-byte operands exist in this instruction set"),
                    }
                    pc += mode.operand_len() as u32;
                }
            }
        }
    }

    // A bare `org` with nothing emitted before the next `org` (or end of input) leaves an empty
    // segment behind; `Segment::end()` can't be computed for one, so it never reaches the linker.
    segments.retain(|s| !s.bytes.is_empty());

    let start = *symbols.get(ENTRY_SYMBOL).ok_or(Error::MissingEntryPoint)?;
    segments.push(Segment {
        origin: RUN_VECTOR,
        bytes: vec![(start & 0xFF) as u8, ((start >> 8) & 0xFF) as u8],
        kind: SegmentKind::Main,
    });

    Ok(Program { segments })
}

fn operand_node(operand: &Option<Operand>) -> &Node<Expr> {
    match operand.as_ref().expect("pass 1 required an operand for this addressing mode") {
        Operand::Immediate(n)
        | Operand::IndirectX(n)
        | Operand::IndirectY(n)
        | Operand::Indirect(n)
        | Operand::IndexedX(n)
        | Operand::IndexedY(n)
        | Operand::Direct(n) => n,
        Operand::Accumulator => unreachable!("accumulator mode has no operand expression"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(player: &str) -> HashMap<&str, &str> {
        let mut map = HashMap::new();
        map.insert("player.asm", player);
        map
    }

    #[test]
    fn test_minimal_program() {
        let src = "org $2000\nstart:\n\tlda #$01\n\tsta $d200\n\trts\n";
        let program = assemble("player.asm", &sources(src)).unwrap();
        assert!(program.segments.iter().any(|s| s.origin == RUN_VECTOR));
    }

    #[test]
    fn test_branch_range_ok_at_127() {
        let mut body = String::from("org $2000\nstart:\n\tbne skip\n");
        for _ in 0..127 {
            body.push_str("\t.byte $00\n");
        }
        body.push_str("skip:\n\trts\n");
        let program = assemble("player.asm", &sources(&body)).unwrap();
        assert!(!program.segments.is_empty());
    }

    #[test]
    fn test_branch_range_fails_at_128() {
        let mut body = String::from("org $2000\nstart:\n\tbne skip\n");
        for _ in 0..128 {
            body.push_str("\t.byte $00\n");
        }
        body.push_str("skip:\n\trts\n");
        let err = assemble("player.asm", &sources(&body)).unwrap_err();
        assert!(matches!(err, Error::BranchOutOfRange { .. }));
    }

    #[test]
    fn test_consecutive_org_with_no_bytes_between_drops_empty_segment() {
        let src = "start:\norg $2000\norg $2010\n.byte $AA\n\trts\n";
        let xex = assemble_xex("player.asm", &sources(src)).unwrap();
        // Only the $2010 segment (the $2000 one never got any bytes) plus the run vector.
        assert_eq!(&xex[0..2], &[0xFF, 0xFF]);
        let origin = u16::from_le_bytes([xex[2], xex[3]]);
        assert_eq!(origin, 0x2010);
    }

    #[test]
    fn test_xex_multi_segment_scenario() {
        let src = "start:\norg $2000\n.byte $AA,$BB\norg $3000\n.byte $CC\n";
        let xex = assemble_xex("player.asm", &sources(src)).unwrap();
        assert_eq!(&xex[..13], &[0xFF, 0xFF, 0x00, 0x20, 0x01, 0x20, 0xAA, 0xBB, 0x00, 0x30, 0x00, 0x30, 0xCC]);
    }

    #[test]
    fn test_conditional_assembly() {
        let src = "FLAG = 0\norg $2000\nstart:\n.if FLAG\n\tlda #1\n.else\n\tlda #2\n.endif\n\trts\n";
        let program = assemble("player.asm", &sources(src)).unwrap();
        let main: Vec<u8> =
            program.segments.iter().find(|s| s.origin != RUN_VECTOR).map(|s| s.bytes.clone()).unwrap();
        assert_eq!(main, vec![0xA9, 0x02, 0x60]);
    }

    #[test]
    fn test_icl_splicing() {
        let mut map = sources("org $2000\nstart:\n\ticl \"macros.asm\"\n\trts\n");
        map.insert("macros.asm", "\tnop\n");
        let program = assemble("player.asm", &map).unwrap();
        let main = program.segments.iter().find(|s| s.origin != RUN_VECTOR).unwrap();
        assert_eq!(main.bytes, vec![0xEA, 0x60]);
    }

    #[test]
    fn test_duplicate_label_error() {
        let src = "start:\nstart:\n\trts\n";
        let err = assemble("player.asm", &sources(src)).unwrap_err();
        assert!(matches!(err, Error::DuplicateLabel { .. }));
    }

    #[test]
    fn test_missing_entry_point() {
        let src = "org $2000\n\trts\n";
        let err = assemble("player.asm", &sources(src)).unwrap_err();
        assert!(matches!(err, Error::MissingEntryPoint));
    }
}
