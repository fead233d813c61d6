//! Maps an `icl`-spliced source blob's byte offsets back to the original file name and line they
//! came from, so a [`crate::diagnostics::Diagnostic`] can point at the file the programmer
//! actually wrote rather than an offset into the flattened blob the assembler works over.

/// Resolves byte offsets in a spliced blob back to `(file name, 1-based local line)`.
#[derive(Debug, Clone)]
pub struct SourceMap {
    flattened: String,
    names: Vec<String>,
    /// `line_owners[i]` is the `(names index, 1-based local line)` that flattened line `i` (the
    /// line starting right after the `i`-th `\n`, with line 0 being the start of the blob) was
    /// copied from.
    line_owners: Vec<(u32, u32)>,
}

impl SourceMap {
    pub(crate) fn new(flattened: String, names: Vec<String>, line_owners: Vec<(u32, u32)>) -> Self {
        Self { flattened, names, line_owners }
    }

    /// A map for a single, un-spliced source with no `icl` includes of its own.
    pub fn single(name: impl Into<String>, source: impl Into<String>) -> Self {
        let flattened = source.into();
        let line_owners = (1..=flattened.lines().count() as u32).map(|i| (0u32, i)).collect();
        Self { flattened, names: vec![name.into()], line_owners }
    }

    /// Resolves `offset`, a byte offset into the spliced blob, to the original file name and the
    /// 1-based line number within that file.
    #[must_use]
    pub fn resolve(&self, offset: u32) -> (&str, u32) {
        let flat_line = self.flattened[..offset as usize].matches('\n').count();
        let (file, local_line) = self.line_owners.get(flat_line).copied().unwrap_or((0, 1));
        let name = self.names.get(file as usize).map_or("<unknown>", String::as_str);
        (name, local_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_resolves_own_lines() {
        let map = SourceMap::single("player.asm", "org $2000\nstart:\n\tbogus\n");
        assert_eq!(map.resolve(0), ("player.asm", 1));
        assert_eq!(map.resolve(19), ("player.asm", 3));
    }

    #[test]
    fn test_spliced_resolves_back_to_included_file() {
        let mut names = Vec::new();
        let mut line_owners = Vec::new();
        // player.asm: "org $2000\nicl \"tables.asm\"\nstart:\n\trts\n" with "icl" replaced in place.
        names.push("player.asm".to_owned());
        names.push("tables.asm".to_owned());
        let mut flattened = String::new();
        flattened.push_str("org $2000\n");
        line_owners.push((0u32, 1u32));
        flattened.push_str("table: .byte $01,$02,$03\n");
        line_owners.push((1u32, 1u32));
        flattened.push_str("bogus\n");
        line_owners.push((1u32, 2u32));
        flattened.push_str("start:\n");
        line_owners.push((0u32, 3u32));
        flattened.push_str("\trts\n");
        line_owners.push((0u32, 4u32));

        let map = SourceMap::new(flattened.clone(), names, line_owners);
        let bogus_offset = flattened.find("bogus").unwrap() as u32;
        assert_eq!(map.resolve(bogus_offset), ("tables.asm", 2));

        let start_offset = flattened.find("start:").unwrap() as u32;
        assert_eq!(map.resolve(start_offset), ("player.asm", 3));
    }
}
