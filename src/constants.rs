//! Common constants used throughout create-astro-exe.

/// Suffix marking stencil files that are emitted with the suffix stripped.
pub const DEFAULT_MARKER_SUFFIX: &str = ".template";

/// Destination extensions eligible for placeholder substitution by default.
pub const DEFAULT_ELIGIBLE_EXTENSIONS: [&str; 2] = ["json", "md"];

/// Supported template rule file names, in lookup order.
pub const CONFIG_FILES: [&str; 3] = ["scaffold.json", "scaffold.yml", "scaffold.yaml"];

/// Ignore patterns applied to every template.
pub const DEFAULT_IGNORE_PATTERNS: [&str; 1] = ["**/.DS_Store"];

/// Project name offered when none is given on the command line.
pub const DEFAULT_PROJECT_NAME: &str = "my-astro-app";

/// Longest accepted project name.
pub const MAX_PROJECT_NAME_LEN: usize = 50;

/// Directory name of the bundled template, shipped next to the executable.
pub const TEMPLATE_DIR_NAME: &str = "template";

/// Bundled template in the source tree; last resort for development builds.
pub const SOURCE_TEMPLATE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/template");
