//! Jinja templates for outgoing mail and printable exports.
//!
//! Templates live in `templates/` at the crate root and are compiled into the
//! binary. Names ending in `.html.jinja` are HTML-escaped.

pub mod engine;

pub use engine::{render_template, TemplateError};
