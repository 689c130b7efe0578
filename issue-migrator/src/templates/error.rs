//! Template error types.

/// Attribution header compilation or rendering error.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The header format does not compile.
    #[error("Invalid attribution format: {0}")]
    Format(#[from] handlebars::TemplateError),

    /// The header failed to render, e.g. it names an unknown variable.
    #[error("Failed to render attribution header: {0}")]
    Render(#[from] handlebars::RenderError),
}
