use crate::span::Span;
use thiserror::Error;

/// The result type for assembler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for assembler operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("{name}: source not found")]
    SourceNotFound { name: String },

    #[error("{name}: include cycle detected")]
    IncludeCycle { name: String },

    #[error("unrecognized token at {span:?}")]
    Lex { span: Span },

    #[error("{message} (at {span:?})")]
    Parse { message: String, span: Span },

    #[error("label is defined more than once: \"{name}\" (at {span:?})")]
    DuplicateLabel { name: String, span: Span },

    #[error("undefined symbol: \"{name}\" (at {span:?})")]
    UndefinedSymbol { name: String, span: Span },

    #[error("unknown mnemonic: \"{name}\" (at {span:?})")]
    UnknownMnemonic { name: String, span: Span },

    #[error("\"{mnemonic}\" does not support this addressing mode (at {span:?})")]
    BadAddressingMode { mnemonic: String, span: Span },

    #[error("branch target is out of range ({offset} bytes, at {span:?})")]
    BranchOutOfRange { offset: i64, span: Span },

    #[error("division by zero (at {span:?})")]
    DivisionByZero { span: Span },

    #[error("value does not fit in the operand's width (at {span:?})")]
    ValueOutOfRange { span: Span },

    #[error("{message} (at {span:?})")]
    Directive { message: String, span: Span },

    #[error("conditional directive out of place (at {span:?})")]
    UnexpectedConditional { span: Span },

    #[error("no active segment; an org directive must come first (at {span:?})")]
    NoActiveSegment { span: Span },

    #[error("no \"start\" symbol was defined for the run vector")]
    MissingEntryPoint,
}
