//! Replayed comment rendering using Handlebars.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, TemplateRenderer};

/// Attribution header used when attribution is enabled without a custom format.
pub const DEFAULT_ATTRIBUTION_FORMAT: &str = "**Original comment by {{author}} on {{date}}:**";
