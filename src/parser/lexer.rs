//! Lexer for the coordinate list of a track link using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Delimiters
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,

    #[regex(r"[-+]?[0-9]+(\.[0-9]*)?([eE][-+]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[-+]?\.[0-9]+([eE][-+]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    /// Any run of text that is not part of the coordinate grammar
    Invalid(String),
}

/// Lex input string into tokens with spans
///
/// Unrecognized input is kept as [`Token::Invalid`] so the grammar can
/// report it at the right position instead of silently dropping it.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    let mut lexer = Token::lexer(input);
    std::iter::from_fn(move || {
        let tok = lexer.next()?;
        let span = lexer.span();
        Some(match tok {
            Ok(t) => (t, span),
            Err(()) => (Token::Invalid(lexer.slice().to_string()), span),
        })
    })
}
