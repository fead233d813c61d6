// Re-export so consumers don't have to depend on logos directly.
pub use logos::Logos;

use smol_str::SmolStr;
use std::fmt::{self, Display, Formatter};

/// Tokens in the restricted MADS dialect this assembler accepts.
#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    #[regex(r"\n")]
    Newline,

    #[regex(r",")]
    Comma,

    #[regex(r":")]
    Colon,

    #[regex(r"=")]
    Equals,

    #[regex(r"\(")]
    OpenParen,

    #[regex(r"\)")]
    CloseParen,

    #[regex(r"#")]
    Hash,

    #[regex(r"\+")]
    Plus,

    #[regex(r"-")]
    Minus,

    #[regex(r"\*")]
    Star,

    #[regex(r"/")]
    Slash,

    #[regex(r"&")]
    Amp,

    #[regex(r"\|")]
    Pipe,

    #[regex(r"\^")]
    Caret,

    #[regex(r"~")]
    Tilde,

    /// `<expr`, low byte.
    #[regex(r"<")]
    Lo,

    /// `>expr`, high byte.
    #[regex(r">")]
    Hi,

    #[regex(r"\.[A-Za-z][A-Za-z0-9]*", directive)]
    Directive(SmolStr),

    /// An `@`-prefixed local label, scoped to the nearest preceding global label.
    #[regex(r"@[A-Za-z_][A-Za-z0-9_]*", local)]
    Local(SmolStr),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", identifier)]
    Identifier(SmolStr),

    #[regex(r#""[^"\n]*""#, string)]
    String(SmolStr),

    #[regex(r"\$[0-9A-Fa-f]+", hex)]
    #[regex(r"%[01]+", binary)]
    #[regex(r"[0-9]+", decimal)]
    Number(u32),

    #[regex(r";[^\n]*", logos::skip)]
    #[regex(r"[^\S\n]+", logos::skip)]
    #[error]
    Error,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::Newline => f.write_str("newline"),
            Token::Comma => f.write_str(","),
            Token::Colon => f.write_str(":"),
            Token::Equals => f.write_str("="),
            Token::OpenParen => f.write_str("("),
            Token::CloseParen => f.write_str(")"),
            Token::Hash => f.write_str("#"),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::Amp => f.write_str("&"),
            Token::Pipe => f.write_str("|"),
            Token::Caret => f.write_str("^"),
            Token::Tilde => f.write_str("~"),
            Token::Lo => f.write_str("<"),
            Token::Hi => f.write_str(">"),
            Token::Directive(s) => write!(f, ".{s}"),
            Token::Local(s) => write!(f, "@{s}"),
            Token::Identifier(s) => f.write_str(s.as_str()),
            Token::String(s) => write!(f, "\"{s}\""),
            Token::Number(n) => write!(f, "{n}"),
            Token::Error => f.write_str("<error>"),
        }
    }
}

fn directive(lex: &mut logos::Lexer<'_, Token>) -> SmolStr {
    SmolStr::new(&lex.slice()[1..])
}

fn local(lex: &mut logos::Lexer<'_, Token>) -> SmolStr {
    SmolStr::new(&lex.slice()[1..])
}

fn identifier(lex: &mut logos::Lexer<'_, Token>) -> SmolStr {
    SmolStr::new(lex.slice())
}

fn string(lex: &mut logos::Lexer<'_, Token>) -> SmolStr {
    let s = lex.slice();
    SmolStr::new(&s[1..s.len() - 1])
}

fn hex(lex: &mut logos::Lexer<'_, Token>) -> Option<u32> {
    u32::from_str_radix(&lex.slice()[1..], 16).ok()
}

fn binary(lex: &mut logos::Lexer<'_, Token>) -> Option<u32> {
    u32::from_str_radix(&lex.slice()[1..], 2).ok()
}

fn decimal(lex: &mut logos::Lexer<'_, Token>) -> Option<u32> {
    lex.slice().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(s: &str) -> Vec<Token> {
        Token::lexer(s).collect()
    }

    #[test]
    fn test_identifiers_and_punctuation() {
        assert_eq!(
            lex("lda #$ff\n"),
            &[Token::Identifier("lda".into()), Token::Hash, Token::Number(0xff), Token::Newline]
        );
    }

    #[test]
    fn test_local_and_directive() {
        assert_eq!(
            lex("@loop: .byte 1,2\n"),
            &[
                Token::Local("loop".into()),
                Token::Colon,
                Token::Directive("byte".into()),
                Token::Number(1),
                Token::Comma,
                Token::Number(2),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_number_bases() {
        assert_eq!(lex("$2000"), &[Token::Number(0x2000)]);
        assert_eq!(lex("%1010"), &[Token::Number(0b1010)]);
        assert_eq!(lex("42"), &[Token::Number(42)]);
    }

    #[test]
    fn test_line_comment_skipped() {
        assert_eq!(
            lex("lda #1 ; load one\nrts\n"),
            &[
                Token::Identifier("lda".into()),
                Token::Hash,
                Token::Number(1),
                Token::Newline,
                Token::Identifier("rts".into()),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(lex("icl \"config.asm\""), &[
            Token::Identifier("icl".into()),
            Token::String("config.asm".into()),
        ]);
    }
}
