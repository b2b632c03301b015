//! Export templates, validated when they are configured

use std::fmt;

use thiserror::Error;

use super::resolver::{scan, substitute, Segment};

/// Placeholder for the path relative to the exported document
pub const RELATIVE_PATH: char = 'f';
/// Placeholder for the absolute artifact path
pub const ABSOLUTE_PATH: char = 'F';
/// Placeholder for the link description
pub const DESCRIPTION: char = 'd';

/// Default hypertext template: path, then description
pub const DEFAULT_HTML: &str = r#"<a href="%s" target="_blank">%s</a>"#;
/// Default typesetting macro template
pub const DEFAULT_LATEX: &str = r"\href{file://%F}{%d}";

/// Errors that can occur when validating a template
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    /// Placeholder that the template kind does not support
    #[error("unknown placeholder {placeholder} at offset {position} in {template} template")]
    UnknownPlaceholder {
        template: String,
        placeholder: String,
        position: usize,
    },

    /// Wrong number of positional placeholders
    #[error("{template} template needs exactly {expected} %s placeholders, found {found}")]
    PlaceholderCount {
        template: String,
        expected: usize,
        found: usize,
    },

    /// Template ends in a lone `%`
    #[error("{template} template ends with an unescaped %")]
    DanglingEscape { template: String },
}

/// Which substitution scheme a template uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Two ordered `%s`: path, description
    Html,
    /// Named `%f`, `%F`, `%d`
    Latex,
}

impl TemplateKind {
    fn name(self) -> &'static str {
        match self {
            TemplateKind::Html => "html",
            TemplateKind::Latex => "latex",
        }
    }
}

/// A validated export template
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    kind: TemplateKind,
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Hypertext template with exactly two positional `%s`
    pub fn html(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        let kind = TemplateKind::Html;
        let segments = scan(kind.name(), &source, true, &[])?;
        let found = segments
            .iter()
            .filter(|s| matches!(s, Segment::Positional))
            .count();
        if found != 2 {
            return Err(TemplateError::PlaceholderCount {
                template: kind.name().to_string(),
                expected: 2,
                found,
            });
        }
        Ok(Self {
            kind,
            source,
            segments,
        })
    }

    /// Typesetting macro template using `%f`, `%F` and `%d`
    pub fn latex(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        let kind = TemplateKind::Latex;
        let segments = scan(
            kind.name(),
            &source,
            false,
            &[RELATIVE_PATH, ABSOLUTE_PATH, DESCRIPTION],
        )?;
        Ok(Self {
            kind,
            source,
            segments,
        })
    }

    pub fn kind(&self) -> TemplateKind {
        self.kind
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Fill the template in one pass
    pub fn fill(&self, relative: &str, absolute: &str, description: &str) -> String {
        match self.kind {
            TemplateKind::Html => substitute(&self.segments, &[relative, description], |_| None),
            TemplateKind::Latex => substitute(&self.segments, &[], |name| match name {
                RELATIVE_PATH => Some(relative),
                ABSOLUTE_PATH => Some(absolute),
                DESCRIPTION => Some(description),
                _ => None,
            }),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// The template used for each export format
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTemplates {
    pub html: Template,
    pub latex: Template,
}

impl ExportTemplates {
    /// Build from template sources, validating both
    pub fn new(html: &str, latex: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            html: Template::html(html)?,
            latex: Template::latex(latex)?,
        })
    }
}

impl Default for ExportTemplates {
    fn default() -> Self {
        Self::new(DEFAULT_HTML, DEFAULT_LATEX).expect("Default templates should be valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_templates() {
        let templates = ExportTemplates::default();
        assert_eq!(templates.html.source(), DEFAULT_HTML);
        assert_eq!(templates.latex.kind(), TemplateKind::Latex);
    }

    #[test]
    fn test_html_fill() {
        let t = Template::html(DEFAULT_HTML).unwrap();
        assert_eq!(
            t.fill("FILE.svg", "/abs/FILE.svg", "Track"),
            r#"<a href="FILE.svg" target="_blank">Track</a>"#
        );
    }

    #[test]
    fn test_html_requires_two_placeholders() {
        assert_eq!(
            Template::html("<img src=\"%s\">").unwrap_err(),
            TemplateError::PlaceholderCount {
                template: "html".to_string(),
                expected: 2,
                found: 1
            }
        );
        assert!(Template::html("%s %s %s").is_err());
    }

    #[test]
    fn test_latex_fill() {
        let t = Template::latex(DEFAULT_LATEX).unwrap();
        insta::assert_snapshot!(
            t.fill("FILE.svg", "/home/u/proj/FILE.svg", "Track"),
            @r"\href{file:///home/u/proj/FILE.svg}{Track}"
        );
    }

    #[test]
    fn test_latex_all_placeholders_and_repeats() {
        let t = Template::latex(r"\includesvg{%f} %F %f (%d) 100%%").unwrap();
        assert_eq!(
            t.fill("a.svg", "/x/a.svg", "Walk"),
            r"\includesvg{a.svg} /x/a.svg a.svg (Walk) 100%"
        );
    }

    #[test]
    fn test_latex_rejects_positional() {
        assert!(matches!(
            Template::latex(r"\href{%s}{%d}"),
            Err(TemplateError::UnknownPlaceholder { .. })
        ));
    }

    #[test]
    fn test_description_with_placeholder_text_is_verbatim() {
        let t = Template::latex(r"%d|%F").unwrap();
        assert_eq!(t.fill("a.svg", "/a.svg", "50%F off"), "50%F off|/a.svg");
    }
}
