//! Turns decoded mono PCM into a POKEY playback bank set and a bootable Atari XEX, or into the
//! raw assembly fragments a caller-supplied player assembles itself.
//!
//! The pipeline is ten components in a straight line: resample to an achievable POKEY timer rate
//! (D), optionally pre-emphasize (C), build the channel-volume level table (A), quantize against
//! it (B), pick a bank codec (F/G/raw) and pack the level stream into fixed-size banks (E),
//! generate the assembly fragments the player expects (H), and finally assemble and link
//! everything into an XEX (I/J). [`pipeline::encode`] runs the whole thing; the individual
//! modules are public for callers who want to drive stages themselves.

#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::too_many_arguments)]

pub mod audio;
pub mod bank;
pub mod codec;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod project;

pub use config::Config;
pub use error::{Error, Result, Warning};
pub use pipeline::encode;
