//! Template rendering for config artifacts.
//!
//! Templates are rendered once each with [`tera::Tera::one_off`] and autoescape
//! off, since the output is plain config text rather than HTML.

use tera::{Context, Tera};

/// Renders `template` against `context`.
///
/// Placeholders use `{{ key }}`; `{% if %}` blocks are available for optional
/// sections. A placeholder referring to a missing key is an error.
pub fn render(template: &str, context: &Context) -> Result<String, tera::Error> {
    Tera::one_off(template, context, false)
}
