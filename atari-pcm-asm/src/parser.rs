// Re-export so consumers don't have to depend on chumsky directly.
pub use chumsky::{Parser, Stream};

use crate::ast::{Directive, Expr, Line, Node, Operand, Statement};
use crate::lexer::Token;
use crate::span::Span;
use chumsky::prelude::*;
use smol_str::SmolStr;

/// The parser's error type.
pub type ParseError = Simple<Token>;

fn to_span(range: std::ops::Range<usize>) -> Span {
    Span::try_from(range).expect("source file larger than 4 GiB")
}

fn identifier() -> impl Parser<Token, SmolStr, Error = ParseError> + Clone {
    filter_map(|span, t: Token| match t {
        Token::Identifier(s) => Ok(s),
        _ => Err(ParseError::custom(span, "expected an identifier")),
    })
}

fn keyword(name: &'static str) -> impl Parser<Token, (), Error = ParseError> + Clone {
    filter(move |t: &Token| matches!(t, Token::Identifier(s) if s.eq_ignore_ascii_case(name)))
        .ignored()
}

/// Builds the expression grammar: unary `- ~ < >` binds tightest, then `* /`, then `+ -`, then
/// the bitwise operators, left-associative at each level.
fn expr_parser() -> impl Parser<Token, Node<Expr>, Error = ParseError> + Clone {
    recursive(|expr| {
        let number = filter_map(|span, t: Token| match t {
            Token::Number(n) => Ok(Node::new(Expr::Number(n), to_span(span))),
            _ => Err(ParseError::custom(span, "expected a number")),
        });
        let ident = filter_map(|span, t: Token| match t {
            Token::Identifier(s) => Ok(Node::new(Expr::Ident(s), to_span(span))),
            _ => Err(ParseError::custom(span, "expected an identifier")),
        });
        let local = filter_map(|span, t: Token| match t {
            Token::Local(s) => Ok(Node::new(Expr::Local(s), to_span(span))),
            _ => Err(ParseError::custom(span, "expected a local label")),
        });
        let pc = just(Token::Star).map_with_span(|_, span| Node::new(Expr::Pc, to_span(span)));
        let parens = expr.clone().delimited_by(just(Token::OpenParen), just(Token::CloseParen));

        let atom = number.or(ident).or(local).or(pc).or(parens);

        let unary = recursive(|unary: Recursive<'_, Token, Node<Expr>, ParseError>| {
            let neg = just(Token::Minus).ignore_then(unary.clone()).map_with_span(|n, span| {
                Node::new(Expr::Neg(Box::new(n.data)), to_span(span))
            });
            let not = just(Token::Tilde).ignore_then(unary.clone()).map_with_span(|n, span| {
                Node::new(Expr::Not(Box::new(n.data)), to_span(span))
            });
            let lo = just(Token::Lo).ignore_then(unary.clone()).map_with_span(|n, span| {
                Node::new(Expr::Lo(Box::new(n.data)), to_span(span))
            });
            let hi = just(Token::Hi).ignore_then(unary.clone()).map_with_span(|n, span| {
                Node::new(Expr::Hi(Box::new(n.data)), to_span(span))
            });
            neg.or(not).or(lo).or(hi).or(atom.clone())
        });

        #[derive(Clone, Copy)]
        enum Op {
            Add,
            Sub,
            Mul,
            Div,
            And,
            Or,
            Xor,
        }
        fn apply(op: Op, lhs: Node<Expr>, rhs: Node<Expr>) -> Node<Expr> {
            let span = lhs.span.join(&rhs.span);
            let data = match op {
                Op::Add => Expr::Add(Box::new(lhs.data), Box::new(rhs.data)),
                Op::Sub => Expr::Sub(Box::new(lhs.data), Box::new(rhs.data)),
                Op::Mul => Expr::Mul(Box::new(lhs.data), Box::new(rhs.data)),
                Op::Div => Expr::Div(Box::new(lhs.data), Box::new(rhs.data)),
                Op::And => Expr::And(Box::new(lhs.data), Box::new(rhs.data)),
                Op::Or => Expr::Or(Box::new(lhs.data), Box::new(rhs.data)),
                Op::Xor => Expr::Xor(Box::new(lhs.data), Box::new(rhs.data)),
            };
            Node::new(data, span)
        }

        let product = unary
            .clone()
            .then(
                just(Token::Star)
                    .to(Op::Mul)
                    .or(just(Token::Slash).to(Op::Div))
                    .then(unary)
                    .repeated(),
            )
            .foldl(|lhs, (op, rhs)| apply(op, lhs, rhs));

        let sum = product
            .clone()
            .then(
                just(Token::Plus)
                    .to(Op::Add)
                    .or(just(Token::Minus).to(Op::Sub))
                    .then(product)
                    .repeated(),
            )
            .foldl(|lhs, (op, rhs)| apply(op, lhs, rhs));

        sum.clone()
            .then(
                just(Token::Amp)
                    .to(Op::And)
                    .or(just(Token::Pipe).to(Op::Or))
                    .or(just(Token::Caret).to(Op::Xor))
                    .then(sum)
                    .repeated(),
            )
            .foldl(|lhs, (op, rhs)| apply(op, lhs, rhs))
    })
}

/// Builds the operand grammar for one instruction, given the already-consumed mnemonic.
fn operand_parser(expr: impl Parser<Token, Node<Expr>, Error = ParseError> + Clone) -> impl Parser<Token, Operand, Error = ParseError> + Clone {
    let immediate = just(Token::Hash).ignore_then(expr.clone()).map(Operand::Immediate);

    let indirect_x = just(Token::OpenParen)
        .ignore_then(expr.clone())
        .then_ignore(just(Token::Comma))
        .then_ignore(keyword("x"))
        .then_ignore(just(Token::CloseParen))
        .map(Operand::IndirectX);

    let indirect_family = expr
        .clone()
        .delimited_by(just(Token::OpenParen), just(Token::CloseParen))
        .then(just(Token::Comma).ignore_then(keyword("y")).or_not())
        .map(|(e, y)| if y.is_some() { Operand::IndirectY(e) } else { Operand::Indirect(e) });

    let indexed = expr
        .clone()
        .then_ignore(just(Token::Comma))
        .then(keyword("x").to(true).or(keyword("y").to(false)))
        .map(|(e, is_x)| if is_x { Operand::IndexedX(e) } else { Operand::IndexedY(e) });

    let accumulator = keyword("a").to(Operand::Accumulator);

    let direct = expr.map(Operand::Direct);

    immediate.or(indirect_x).or(indirect_family).or(indexed).or(accumulator).or(direct)
}

fn string_literal() -> impl Parser<Token, SmolStr, Error = ParseError> + Clone {
    filter_map(|span, t: Token| match t {
        Token::String(s) => Ok(s),
        _ => Err(ParseError::custom(span, "expected a string literal")),
    })
}

fn directive_keyword(name: &'static str) -> impl Parser<Token, (), Error = ParseError> + Clone {
    filter_map(move |span, t: Token| match &t {
        Token::Directive(s) if s.eq_ignore_ascii_case(name) => Ok(()),
        _ => Err(ParseError::custom(span, "expected a directive")),
    })
}

/// Builds a `Parser` for parsing the token stream into the flat statement list.
pub fn program_parser() -> impl Parser<Token, Vec<Line>, Error = ParseError> {
    let expr = expr_parser();
    let operand = operand_parser(expr.clone());

    let newlines = just(Token::Newline).ignored().repeated();

    let label = identifier()
        .then_ignore(just(Token::Colon))
        .map_with_span(|name, span| Line { statement: Statement::Label(name), span: to_span(span) });

    let local_label = filter_map(|span, t: Token| match t {
        Token::Local(s) => Ok(s),
        _ => Err(ParseError::custom(span, "expected a local label")),
    })
    .then_ignore(just(Token::Colon))
    .map_with_span(|name, span| Line { statement: Statement::LocalLabel(name), span: to_span(span) });

    let equ = identifier()
        .then_ignore(just(Token::Equals))
        .then(expr.clone())
        .map(|(name, value)| Statement::Directive(Directive::Equ(name, value)));

    let org = keyword("org").ignore_then(expr.clone()).map(|e| Statement::Directive(Directive::Org(e)));
    let ini = keyword("ini").ignore_then(expr.clone()).map(|e| Statement::Directive(Directive::Ini(e)));

    let if_dir = directive_keyword("if").ignore_then(expr.clone()).map(Directive::If);
    let elseif_dir = directive_keyword("elseif").ignore_then(expr.clone()).map(Directive::Elseif);
    let else_dir = directive_keyword("else").to(Directive::Else);
    let endif_dir = directive_keyword("endif").to(Directive::Endif);
    let error_dir =
        directive_keyword("error").ignore_then(string_literal()).map(Directive::Error);
    let byte_dir = directive_keyword("byte")
        .ignore_then(expr.clone().separated_by(just(Token::Comma)))
        .map(|values: Vec<_>| Directive::Byte(values.into()));
    let word_dir = directive_keyword("word")
        .ignore_then(expr.clone().separated_by(just(Token::Comma)))
        .map(|values: Vec<_>| Directive::Word(values.into()));
    let dotted = if_dir
        .or(elseif_dir)
        .or(else_dir)
        .or(endif_dir)
        .or(error_dir)
        .or(byte_dir)
        .or(word_dir)
        .map(Statement::Directive);

    let instruction = identifier()
        .then(operand.or_not())
        .map(|(mnemonic, operand)| Statement::Instruction { mnemonic, operand });

    let required_newline = just(Token::Newline).ignored().or(end());
    let op = equ
        .or(org)
        .or(ini)
        .or(dotted)
        .or(instruction)
        .map_with_span(|statement, span| Line { statement, span: to_span(span) })
        .then_ignore(required_newline);

    let item = op.or(label).or(local_label);
    item.separated_by(newlines.clone()).padded_by(newlines).then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos::Logos;

    fn parse(src: &str) -> Vec<Line> {
        let tokens: Vec<_> = Token::lexer(src).spanned().map(|(t, s)| (t, s)).collect();
        let len = src.len();
        let stream = Stream::from_iter(len..len, tokens.into_iter());
        program_parser().parse(stream).unwrap()
    }

    #[test]
    fn test_parse_label_and_instruction() {
        let lines = parse("start:\n\tlda #$01\n\tsta $d200\n");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].statement, Statement::Label("start".into()));
        assert!(matches!(lines[1].statement, Statement::Instruction { ref mnemonic, .. } if mnemonic == "lda"));
    }

    #[test]
    fn test_parse_equ() {
        let lines = parse("FOO = 5\n");
        assert_eq!(lines.len(), 1);
        assert!(matches!(&lines[0].statement, Statement::Directive(Directive::Equ(name, _)) if name == "FOO"));
    }

    #[test]
    fn test_parse_org_and_byte() {
        let lines = parse("org $2000\n.byte $AA,$BB\n");
        assert!(matches!(&lines[0].statement, Statement::Directive(Directive::Org(_))));
        match &lines[1].statement {
            Statement::Directive(Directive::Byte(values)) => assert_eq!(values.len(), 2),
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn test_parse_indirect_y() {
        let lines = parse("lda ($80),y\n");
        match &lines[0].statement {
            Statement::Instruction { operand: Some(Operand::IndirectY(_)), .. } => {}
            other => panic!("unexpected statement: {other:?}"),
        }
    }

    #[test]
    fn test_parse_local_label() {
        let lines = parse("start:\n@loop:\n\tdex\n\tbne @loop\n");
        assert_eq!(lines[1].statement, Statement::LocalLabel("loop".into()));
    }

    #[test]
    fn test_expr_precedence() {
        let lines = parse(".byte 1+2*3\n");
        match &lines[0].statement {
            Statement::Directive(Directive::Byte(values)) => {
                assert_eq!(values.len(), 1);
                assert_eq!(
                    values[0].data,
                    Expr::Add(Box::new(Expr::Number(1)), Box::new(Expr::Mul(Box::new(Expr::Number(2)), Box::new(Expr::Number(3)))))
                );
            }
            other => panic!("unexpected statement: {other:?}"),
        }
    }
}
