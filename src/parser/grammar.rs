//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::ParseError;
use crate::parser::ast::*;
use crate::parser::lexer::Token;

/// Parse a raw link path such as `track:(12.5 3.1)(12.6 3.2)walk.svg`
///
/// The `track:` prefix is optional. The parsed link has no description;
/// see [`parse_bracket_link`] for the bracketed document form.
pub fn parse(input: &str) -> Result<TrackLink, ParseError> {
    parse_at(input, 0)
}

/// Parse a bracketed document link, `[[track:...]]` or `[[track:...][desc]]`
pub fn parse_bracket_link(input: &str) -> Result<TrackLink, ParseError> {
    let inner = input
        .strip_prefix("[[")
        .and_then(|s| s.strip_suffix("]]"))
        .ok_or_else(|| ParseError::NotATrackLink {
            input: input.to_string(),
        })?;

    let (path, description) = match inner.find("][") {
        Some(idx) => (&inner[..idx], Some(inner[idx + 2..].to_string())),
        None => (inner, None),
    };
    if !path.starts_with(LINK_PREFIX) {
        return Err(ParseError::NotATrackLink {
            input: input.to_string(),
        });
    }

    let link = parse_at(path, 2)?;
    Ok(link.with_description(description))
}

/// Parse `input`, reporting spans shifted by `offset` into the caller's source
fn parse_at(input: &str, offset: usize) -> Result<TrackLink, ParseError> {
    let body_start = if input.starts_with(LINK_PREFIX) {
        LINK_PREFIX.len()
    } else {
        0
    };
    let body = &input[body_start..];

    // The coordinate list ends at the last closing paren; the rest is the filename
    let split = body.rfind(')').map(|i| i + 1).unwrap_or(0);
    let coord_start = offset + body_start;
    let coordinates = parse_coordinates(&body[..split], coord_start)?;

    let filename = &body[split..];
    let filename_span = coord_start + split..offset + input.len();
    if filename.is_empty() {
        return Err(ParseError::MissingFilename {
            span: filename_span,
        });
    }
    if filename.starts_with(char::is_whitespace) {
        return Err(ParseError::Syntax {
            span: filename_span,
            message: "Filename must directly follow the coordinate list".to_string(),
            expected: vec!["filename".to_string()],
        });
    }
    if has_bracket(filename) {
        return Err(ParseError::Syntax {
            span: filename_span,
            message: "Unexpected bracket in filename".to_string(),
            expected: vec![],
        });
    }
    if !stays_inside(filename) {
        return Err(ParseError::EscapingFilename {
            filename: filename.to_string(),
            span: filename_span,
        });
    }
    if !filename.ends_with(ARTIFACT_EXTENSION) || filename.len() == ARTIFACT_EXTENSION.len() {
        return Err(ParseError::BadExtension {
            filename: filename.to_string(),
            span: filename_span,
        });
    }

    Ok(TrackLink::from_parts(coordinates, filename.to_string(), None))
}

fn parse_coordinates(input: &str, offset: usize) -> Result<Vec<Coordinate>, ParseError> {
    let end = offset + input.len();

    // Create a logos lexer and convert to a token stream in caller coordinates
    let token_iter = crate::parser::lexer::lex(input)
        .map(|(tok, span)| (tok, (span.start + offset..span.end + offset).into()));

    let token_stream =
        Stream::from_iter(token_iter).map((end..end).into(), |(t, s): (_, _)| (t, s));

    coordinates_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| {
            errs.into_iter()
                .next()
                .map(ParseError::from)
                .unwrap_or_else(|| ParseError::Syntax {
                    span: offset..end,
                    message: "Malformed coordinate list".to_string(),
                    expected: vec![],
                })
        })
}

fn coordinates_parser<'a, I>() -> impl Parser<'a, I, Vec<Coordinate>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let number = select! {
        Token::Number(n) => n,
    }
    .labelled("number");

    // (lat lon) or (lat, lon)
    let pair = number
        .clone()
        .then_ignore(just(Token::Comma).or_not())
        .then(number)
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
        .map(|(lat, lon)| Coordinate::new(lat, lon));

    pair.repeated()
        .at_least(1)
        .collect::<Vec<_>>()
        .then_ignore(end())
}
