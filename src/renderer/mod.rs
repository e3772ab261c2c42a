//! Template evaluation for Kiln.
//! Finds `${ ... }` spans in text, evaluates them against an explicit
//! namespace and provides the `include`/`includeTemplate` helpers.

mod encoding;
mod engine;
mod interface;
mod namespace;
mod scanner;

pub use encoding::Encoding;
pub use engine::MiniJinjaRenderer;
pub use interface::TemplateRenderer;
pub use namespace::Namespace;
pub use scanner::{scan, Segment};
