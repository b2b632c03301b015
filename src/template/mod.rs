//! Export templates for track links
//!
//! Templates use `%`-placeholders. The hypertext template takes two `%s`
//! filled in order with the path and the description; the typesetting
//! template takes named placeholders:
//!
//! ```text
//! %f   path relative to the exported document
//! %F   absolute path
//! %d   description
//! %%   a literal percent sign
//! ```
//!
//! Substitution is a single pass over the template, so values that happen
//! to contain placeholder text are inserted verbatim.

mod registry;
mod resolver;

pub use registry::{
    ExportTemplates, Template, TemplateError, TemplateKind, ABSOLUTE_PATH, DEFAULT_HTML,
    DEFAULT_LATEX, DESCRIPTION, RELATIVE_PATH,
};
pub use resolver::{scan, substitute, Segment};
