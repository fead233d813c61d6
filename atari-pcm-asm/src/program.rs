//! The linker's segment list: an ordered set of `(origin, bytes, kind)` records.

/// Distinguishes a normal code/data segment from one the Atari loader treats as an init routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Main,
    Init,
}

/// A contiguous, already-assembled chunk of memory with the address it loads at.
#[derive(Debug, Clone)]
pub struct Segment {
    pub origin: u16,
    pub bytes: Vec<u8>,
    pub kind: SegmentKind,
}

impl Segment {
    /// The address of the last byte in this segment. ***Panics*** if the segment is empty.
    pub fn end(&self) -> u16 {
        self.origin.wrapping_add(self.bytes.len() as u16 - 1)
    }
}

/// Everything pass 2 produces: the ordered segment list the linker packs into an XEX.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub segments: Vec<Segment>,
}
