//! Error types for parsing link paths

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::error::{Rich, RichPattern, RichReason};
use thiserror::Error;

use crate::parser::ast::ARTIFACT_EXTENSION;
use crate::parser::lexer::{Span, Token};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    #[error("Missing artifact filename after coordinate list")]
    MissingFilename { span: Span },

    #[error("Filename '{filename}' does not end in {ext}", ext = ARTIFACT_EXTENSION)]
    BadExtension { filename: String, span: Span },

    #[error("Filename '{filename}' points outside the document directory")]
    EscapingFilename { filename: String, span: Span },

    #[error("Not a track link: {input}")]
    NotATrackLink { input: String },
}

impl ParseError {
    /// Location of the error in the parsed source, if it has one
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Syntax { span, .. }
            | ParseError::MissingFilename { span }
            | ParseError::BadExtension { span, .. }
            | ParseError::EscapingFilename { span, .. } => Some(span.clone()),
            ParseError::NotATrackLink { .. } => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span().unwrap_or(0..source.len());
        let message = match self {
            ParseError::Syntax {
                message, expected, ..
            } if !expected.is_empty() => {
                format!("{}\nExpected: {}", message, expected.join(", "))
            }
            ParseError::Syntax { message, .. } => message.clone(),
            other => other.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl<'a> From<Rich<'a, Token>> for ParseError {
    fn from(err: Rich<'a, Token>) -> Self {
        let message = match err.reason() {
            RichReason::ExpectedFound { found: Some(tok), .. } => {
                format!("Unexpected {}", describe_token(tok))
            }
            RichReason::ExpectedFound { found: None, .. } => {
                "Unexpected end of coordinate list".to_string()
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let mut expected: Vec<String> = err.expected().filter_map(describe_pattern).collect();
        expected.sort();
        expected.dedup();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

fn describe_pattern(pattern: &RichPattern<'_, Token>) -> Option<String> {
    match pattern {
        RichPattern::Token(tok) => Some(describe_token(tok)),
        RichPattern::Label(label) => Some(label.to_string()),
        RichPattern::EndOfInput => Some("end of coordinate list".to_string()),
        RichPattern::Identifier(s) => Some(format!("'{}'", s)),
        RichPattern::Any | RichPattern::SomethingElse => None,
    }
}

fn describe_token(tok: &Token) -> String {
    match tok {
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Number(n) => format!("number {}", n),
        Token::Invalid(s) => format!("'{}'", s),
    }
}
