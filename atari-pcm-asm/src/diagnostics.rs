//! A small source-located diagnostic type for presenting [`crate::Error`] values to a human.

use crate::source_map::SourceMap;
use crate::span::Span;
use std::fmt::{self, Display, Formatter};

/// A diagnostic code, message, optional note, and the span it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: &'static str,
    pub message: String,
    pub note: Option<String>,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(code: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self { code, message: message.into(), note: None, span }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Renders this diagnostic as `file:line: message`, resolving the span's byte offset back to
    /// its original file and local line through `source_map` — the span itself is only an offset
    /// into the (possibly `icl`-spliced) blob the assembler actually parsed.
    pub fn render(&self, source_map: &SourceMap) -> String {
        let (file_name, line) = source_map.resolve(self.span.start);
        let mut out = format!("{file_name}:{line}: {} [{}]", self.message, self.code);
        if let Some(note) = &self.note {
            out.push_str(&format!(" ({note})"));
        }
        out
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;
        if let Some(note) = &self.note {
            write!(f, " ({note})")?;
        }
        Ok(())
    }
}

/// Converts an [`crate::Error`] into a [`Diagnostic`] for display, assigning each variant a
/// short, stable code.
impl From<&crate::Error> for Diagnostic {
    fn from(err: &crate::Error) -> Self {
        use crate::Error;
        match err {
            Error::SourceNotFound { name } => {
                Diagnostic::new("E001", err.to_string(), Span::EMPTY).with_note(format!("looked for {name:?}"))
            }
            Error::IncludeCycle { .. } => Diagnostic::new("E002", err.to_string(), Span::EMPTY),
            Error::Lex { span } => Diagnostic::new("E003", err.to_string(), *span),
            Error::Parse { span, .. } => Diagnostic::new("E004", err.to_string(), *span),
            Error::DuplicateLabel { span, .. } => Diagnostic::new("E005", err.to_string(), *span),
            Error::UndefinedSymbol { span, .. } => Diagnostic::new("E006", err.to_string(), *span),
            Error::UnknownMnemonic { span, .. } => Diagnostic::new("E007", err.to_string(), *span),
            Error::BadAddressingMode { span, .. } => Diagnostic::new("E008", err.to_string(), *span),
            Error::BranchOutOfRange { span, .. } => Diagnostic::new("E009", err.to_string(), *span),
            Error::DivisionByZero { span } => Diagnostic::new("E010", err.to_string(), *span),
            Error::ValueOutOfRange { span } => Diagnostic::new("E011", err.to_string(), *span),
            Error::Directive { span, .. } => Diagnostic::new("E012", err.to_string(), *span),
            Error::UnexpectedConditional { span } => Diagnostic::new("E013", err.to_string(), *span),
            Error::NoActiveSegment { span } => Diagnostic::new("E014", err.to_string(), *span),
            Error::MissingEntryPoint => Diagnostic::new("E015", err.to_string(), Span::EMPTY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_reports_one_indexed_line() {
        let source_map = SourceMap::single("player.asm", "org $2000\nstart:\n\tbogus\n");
        let span = Span::new(0, 19, 24);
        let diagnostic = Diagnostic::new("E007", "unknown mnemonic: \"bogus\"", span);
        assert_eq!(diagnostic.render(&source_map), "player.asm:3: unknown mnemonic: \"bogus\" [E007]");
    }

    #[test]
    fn test_render_resolves_included_file() {
        let mut flattened = String::new();
        flattened.push_str("org $2000\n");
        flattened.push_str("bogus\n");
        let source_map = crate::source_map::SourceMap::new(
            flattened.clone(),
            vec!["player.asm".to_owned(), "tables.asm".to_owned()],
            vec![(0, 1), (1, 7)],
        );
        let span = Span::new(0, flattened.find("bogus").unwrap() as u32, flattened.len() as u32 - 1);
        let diagnostic = Diagnostic::new("E007", "unknown mnemonic: \"bogus\"", span);
        assert_eq!(diagnostic.render(&source_map), "tables.asm:7: unknown mnemonic: \"bogus\" [E007]");
    }

    #[test]
    fn test_display_without_note() {
        let diagnostic = Diagnostic::new("E015", "no entry point", Span::EMPTY);
        assert_eq!(diagnostic.to_string(), "no entry point [E015]");
    }
}
