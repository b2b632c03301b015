//! Format-specific rendering of a resolved track link

use std::fmt;
use std::str::FromStr;

use crate::template::ExportTemplates;

/// Output format a link is exported to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Hypertext markup
    Html,
    /// Typesetting macro
    Latex,
    /// Bare relative path, for every other backend
    Plain,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Html => "html",
            ExportFormat::Latex => "latex",
            ExportFormat::Plain => "plain",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(ExportFormat::Html),
            "latex" | "tex" => Ok(ExportFormat::Latex),
            "plain" | "ascii" | "text" => Ok(ExportFormat::Plain),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

/// Paths of one artifact as seen from the exported document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub relative: String,
    pub absolute: String,
}

/// Render the output string for `format`
///
/// Without a description the relative path stands in for it.
pub fn render(
    templates: &ExportTemplates,
    format: ExportFormat,
    paths: &ResolvedPaths,
    description: Option<&str>,
) -> String {
    let description = description.unwrap_or(paths.relative.as_str());
    match format {
        ExportFormat::Plain => paths.relative.clone(),
        ExportFormat::Html => templates
            .html
            .fill(&paths.relative, &paths.absolute, description),
        ExportFormat::Latex => templates
            .latex
            .fill(&paths.relative, &paths.absolute, description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;
    use pretty_assertions::assert_eq;

    fn paths() -> ResolvedPaths {
        ResolvedPaths {
            relative: "FILE.svg".to_string(),
            absolute: "/home/u/proj/FILE.svg".to_string(),
        }
    }

    #[test]
    fn test_html_with_description() {
        let out = render(&ExportTemplates::default(), ExportFormat::Html, &paths(), Some("Track"));
        assert_eq!(out, r#"<a href="FILE.svg" target="_blank">Track</a>"#);
    }

    #[test]
    fn test_html_description_fallback() {
        let out = render(&ExportTemplates::default(), ExportFormat::Html, &paths(), None);
        assert_eq!(out, r#"<a href="FILE.svg" target="_blank">FILE.svg</a>"#);
    }

    #[test]
    fn test_latex() {
        let out = render(&ExportTemplates::default(), ExportFormat::Latex, &paths(), Some("Track"));
        assert_eq!(out, r"\href{file:///home/u/proj/FILE.svg}{Track}");
        assert!(!out.contains("%F") && !out.contains("%d"));
    }

    #[test]
    fn test_plain_ignores_description() {
        let out = render(&ExportTemplates::default(), ExportFormat::Plain, &paths(), Some("Track"));
        assert_eq!(out, "FILE.svg");
    }

    #[test]
    fn test_html_description_is_not_rescanned() {
        let out = render(&ExportTemplates::default(), ExportFormat::Html, &paths(), Some("%s"));
        assert_eq!(out, r#"<a href="FILE.svg" target="_blank">%s</a>"#);
    }

    #[test]
    fn test_custom_latex_template() {
        let templates = ExportTemplates {
            latex: Template::latex(r"\includegraphics{%f}").unwrap(),
            ..ExportTemplates::default()
        };
        let out = render(&templates, ExportFormat::Latex, &paths(), None);
        assert_eq!(out, r"\includegraphics{FILE.svg}");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("HTML".parse::<ExportFormat>(), Ok(ExportFormat::Html));
        assert_eq!("tex".parse::<ExportFormat>(), Ok(ExportFormat::Latex));
        assert_eq!("ascii".parse::<ExportFormat>(), Ok(ExportFormat::Plain));
        assert!("odt".parse::<ExportFormat>().is_err());
    }
}
