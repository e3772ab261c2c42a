use std::path::Path;

use super::namespace::Namespace;

/// Trait for template evaluation engines.
pub trait TemplateRenderer {
    /// Evaluates every expression span in `template` against `namespace`.
    ///
    /// # Arguments
    /// * `template` - Raw template text
    /// * `namespace` - Bindings visible to the expressions, besides the helpers
    ///
    /// # Returns
    /// * `Result<String, minijinja::Error>` - Text with every span replaced by its value
    fn render(&self, template: &str, namespace: &Namespace) -> Result<String, minijinja::Error>;

    /// Reads a templated source file with the renderer's default encoding.
    fn read(&self, path: &Path) -> std::io::Result<String>;
}
