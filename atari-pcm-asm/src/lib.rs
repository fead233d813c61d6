//! A restricted-dialect 6502 assembler and XEX linker for the player's boot code and DSP
//! routines: a MADS-like subset (labels, `equ`, conditional assembly, `.byte`/`.word`, `icl`
//! inclusion) compiled in two passes into one or more loadable segments, then packed into a
//! bootable Atari executable.

#![warn(missing_docs, rust_2018_idioms)]

pub mod assembler;
pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod label;
pub mod lexer;
pub mod parser;
pub mod program;
pub mod source_map;
pub mod span;
pub mod writer;

pub use assembler::{assemble, assemble_xex, source_map as build_source_map};
pub use error::{Error, Result};
pub use source_map::SourceMap;
