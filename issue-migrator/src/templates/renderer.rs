//! Comment body renderer.

use crate::tracker::Comment;
use chrono::{DateTime, Utc};
use handlebars::{no_escape, Handlebars};
use serde_json::json;

const ATTRIBUTION_TEMPLATE: &str = "attribution";

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs
}

/// Produces the body of a replayed comment.
///
/// Without attribution the original body is copied verbatim.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
    attribution: bool,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a renderer that copies comment bodies verbatim.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
            attribution: false,
        }
    }

    /// Creates a renderer that prefixes each comment with a header.
    ///
    /// The format can use `{{author}}`, `{{date}}` (`YYYY-MM-DD`) and
    /// `{{created_at}}` (RFC 3339). It is test-rendered once so that a bad
    /// format fails here rather than halfway through a run.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`](super::TemplateError) if the format does not
    /// compile or references unknown variables.
    pub fn with_attribution(format: &str) -> Result<Self, super::TemplateError> {
        let mut handlebars = create_handlebars_registry();
        handlebars.register_template_string(ATTRIBUTION_TEMPLATE, format)?;
        let renderer = Self {
            handlebars,
            attribution: true,
        };

        renderer.render_header("ghost", &DateTime::<Utc>::UNIX_EPOCH)?;
        Ok(renderer)
    }

    /// Returns true if comments get an attribution header.
    #[must_use]
    pub fn has_attribution(&self) -> bool {
        self.attribution
    }

    /// Renders the body to post for `comment`.
    ///
    /// # Errors
    ///
    /// Returns an error if the attribution header fails to render.
    pub fn render_comment(&self, comment: &Comment) -> Result<String, super::TemplateError> {
        if !self.attribution {
            return Ok(comment.body.clone());
        }

        let header = self.render_header(&comment.author, &comment.created_at)?;
        Ok(format!("{header}\n\n{}", comment.body))
    }

    fn render_header(
        &self,
        author: &str,
        created_at: &DateTime<Utc>,
    ) -> Result<String, super::TemplateError> {
        let data = json!({
            "author": author,
            "date": created_at.format("%Y-%m-%d").to_string(),
            "created_at": created_at.to_rfc3339(),
        });
        Ok(self.handlebars.render(ATTRIBUTION_TEMPLATE, &data)?)
    }
}
