//! Immutable shared tables for the `atari-pcm` and `atari-pcm-asm` crates: the measured POKEY
//! voltage curve, the pre-emphasis FIR taps, hardware constants, and the 6502 opcode table.
//!
//! Everything here is pure data, initialized once and read-only for the lifetime of the process.

pub mod fir;
pub mod hw;
pub mod opcodes;
pub mod voltage;
