//! Materialization rules for a template.
//! Rules are loaded from an optional rule file in the template root
//! (scaffold.json, scaffold.yml, scaffold.yaml) and fall back to defaults.

use crate::constants::{CONFIG_FILES, DEFAULT_ELIGIBLE_EXTENSIONS, DEFAULT_MARKER_SUFFIX};
use crate::error::{Error, Result};
use log::debug;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Which destination files undergo placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// Files whose destination extension is in the set (compared without the dot,
    /// case-insensitively).
    Extensions(BTreeSet<String>),
    /// Every file that carried the marker suffix.
    Stencils,
    /// Every file.
    All,
}

impl Eligibility {
    pub fn extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Eligibility::Extensions(
            extensions.into_iter().map(|ext| normalize_extension(ext.as_ref())).collect(),
        )
    }

    /// Decides eligibility for a destination file name.
    ///
    /// `was_stencil` tells whether the source name carried the marker suffix.
    pub fn is_eligible(&self, target_name: &str, was_stencil: bool) -> bool {
        match self {
            Eligibility::Extensions(set) => Path::new(target_name)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| set.contains(&ext.to_ascii_lowercase()))
                .unwrap_or(false),
            Eligibility::Stencils => was_stencil,
            Eligibility::All => true,
        }
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

/// Rules injected into the materializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub marker_suffix: String,
    pub eligibility: Eligibility,
    /// Extra glob patterns, relative to the template root, to leave out.
    pub ignore: Vec<String>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            marker_suffix: DEFAULT_MARKER_SUFFIX.to_string(),
            eligibility: Eligibility::extensions(DEFAULT_ELIGIBLE_EXTENSIONS),
            ignore: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EligibilityKind {
    #[default]
    Extensions,
    Stencils,
    All,
}

/// Raw contents of a rule file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    #[serde(default)]
    pub marker_suffix: Option<String>,
    #[serde(default)]
    pub eligibility: EligibilityKind,
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl TemplateConfig {
    pub fn into_rules(self) -> Result<Rules> {
        let marker_suffix =
            self.marker_suffix.unwrap_or_else(|| DEFAULT_MARKER_SUFFIX.to_string());
        if marker_suffix.is_empty() {
            return Err(Error::ConfigError("marker_suffix must not be empty".to_string()));
        }

        let eligibility = match self.eligibility {
            EligibilityKind::Extensions => match self.extensions {
                Some(extensions) => Eligibility::extensions(extensions),
                None => Eligibility::extensions(DEFAULT_ELIGIBLE_EXTENSIONS),
            },
            EligibilityKind::Stencils | EligibilityKind::All if self.extensions.is_some() => {
                return Err(Error::ConfigError(
                    "extensions can only be set with eligibility 'extensions'".to_string(),
                ));
            }
            EligibilityKind::Stencils => Eligibility::Stencils,
            EligibilityKind::All => Eligibility::All,
        };

        Ok(Rules { marker_suffix, eligibility, ignore: self.ignore })
    }
}

/// Parses rule file content, trying JSON first and YAML second.
pub fn parse_config(content: &str) -> Result<TemplateConfig> {
    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}"))),
    }
}

/// Loads the rules for a template root.
///
/// The first existing file of [`CONFIG_FILES`] wins; with none present the
/// default rules apply.
pub fn get_rules<P: AsRef<Path>>(template_root: P) -> Result<Rules> {
    let template_root = template_root.as_ref();
    for file in CONFIG_FILES {
        let config_path = template_root.join(file);
        if config_path.is_file() {
            debug!("Loading rules from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| Error::materialize(&config_path, e))?;
            if content.trim().is_empty() {
                return Ok(Rules::default());
            }
            return parse_config(&content)?.into_rules();
        }
    }

    debug!("No rule file in {}, using defaults", template_root.display());
    Ok(Rules::default())
}
