//! Template scanning and single-pass placeholder substitution

use super::registry::TemplateError;

/// Introduces a placeholder; doubled it stands for itself
pub const ESCAPE: char = '%';

/// Positional placeholder, consumed in order
pub const POSITIONAL: char = 's';

/// A piece of a scanned template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied through as-is (`%%` already collapsed)
    Literal(String),
    /// `%s`, filled from the next positional value
    Positional,
    /// `%<c>` for a named placeholder
    Named(char),
}

/// Split `source` into literal text and placeholders
///
/// `%s` is accepted only when `positional` is set; any other `%<c>` must be
/// listed in `names`. Scanning is a single left-to-right pass, so a `%`
/// is never matched as part of a longer or overlapping token.
pub fn scan(
    template: &str,
    source: &str,
    positional: bool,
    names: &[char],
) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices();

    while let Some((pos, c)) = chars.next() {
        if c != ESCAPE {
            literal.push(c);
            continue;
        }
        let Some((_, placeholder)) = chars.next() else {
            return Err(TemplateError::DanglingEscape {
                template: template.to_string(),
            });
        };
        let segment = match placeholder {
            ESCAPE => {
                literal.push(ESCAPE);
                continue;
            }
            POSITIONAL if positional => Segment::Positional,
            name if names.contains(&name) => Segment::Named(name),
            other => {
                return Err(TemplateError::UnknownPlaceholder {
                    template: template.to_string(),
                    placeholder: format!("{ESCAPE}{other}"),
                    position: pos,
                })
            }
        };
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(segment);
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Fill scanned segments with values
///
/// Inserted values are appended verbatim and never re-scanned, so a value
/// containing `%s` or `%d` comes out unchanged. Missing positional values
/// and unknown names expand to nothing; templates are validated up front
/// so neither happens for a well-formed [`super::Template`].
pub fn substitute<'v>(
    segments: &[Segment],
    positional: &[&str],
    named: impl Fn(char) -> Option<&'v str>,
) -> String {
    let mut out = String::new();
    let mut next = positional.iter();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Positional => out.push_str(next.next().copied().unwrap_or_default()),
            Segment::Named(name) => out.push_str(named(*name).unwrap_or_default()),
        }
    }
    out
}
