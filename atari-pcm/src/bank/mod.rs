//! Slicing the quantized level stream into fixed-size banks.

pub mod packer;

pub use packer::{pack_banks, PackedBanks};
