//! Common constants used throughout the Kiln site builder.

/// Supported site configuration file names, in lookup order
pub const CONFIG_FILES: [&str; 3] = ["kiln.json", "kiln.yml", "kiln.yaml"];

/// Output root used when neither the CLI nor the config file names one
pub const DEFAULT_OUTPUT_DIR: &str = "build";

/// File name patterns evaluated as templates by default
pub const DEFAULT_TEMPLATED: [&str; 5] = ["*.html", "*.htm", "*.xml", "*.rss", "*.css"];

/// Matches the `.dev` marker segment of excluded entries
pub const EXCLUDE_MARKER: &str = r"\.dev(\.|$)";

/// Maximum nesting of `includeTemplate` calls within one evaluation
pub const MAX_INCLUDE_DEPTH: usize = 16;

pub const INCLUDE_FN: &str = "include";
pub const INCLUDE_TEMPLATE_FN: &str = "includeTemplate";
pub const CURRENT_FILE: &str = "CURRENT_FILE";
pub const CURRENT_PATH: &str = "CURRENT_PATH";
pub const CURRENT_DIR: &str = "CURRENT_DIR";

/// Identifiers every evaluation reserves for itself
pub const RESERVED_NAMES: [&str; 5] =
    [INCLUDE_FN, INCLUDE_TEMPLATE_FN, CURRENT_FILE, CURRENT_PATH, CURRENT_DIR];
