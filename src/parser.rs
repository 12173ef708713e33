//! Preloaded answers.
//! With `--stdin` a JSON object pre-answers the matching prompts; every key is
//! optional and `null` text values become empty strings.

use crate::error::{Error, Result};
use crate::project::PackageManager;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Answers {
    pub project_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: Option<String>,
    pub install_deps: Option<bool>,
    pub package_manager: Option<PackageManager>,
    pub init_git: Option<bool>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(Option::<String>::deserialize(deserializer)?.unwrap_or_default()))
}

/// Parses preloaded answers. Blank input means no answers.
pub fn parse_answers(content: &str) -> Result<Answers> {
    if content.trim().is_empty() {
        return Ok(Answers::default());
    }
    serde_json::from_str(content)
        .map_err(|e| Error::ValidationError(format!("Failed to parse answers as JSON: {e}")))
}

pub fn load_answers<R: Read>(mut reader: R) -> Result<Answers> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    parse_answers(&buffer)
}

/// Reads answers from stdin when requested, otherwise returns empty answers.
pub fn get_answers_from(take_from_stdin: bool) -> Result<Answers> {
    if take_from_stdin {
        load_answers(std::io::stdin().lock())
    } else {
        Ok(Answers::default())
    }
}
