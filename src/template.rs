//! Placeholder substitution for eligible template files.
//!
//! A placeholder is `{{`, optional whitespace, a key, optional whitespace, `}}`.
//! Every placeholder whose key is in the variable mapping is replaced with the
//! key's value in a single pass; values are inserted literally and never
//! re-scanned. Placeholders with unknown keys are left untouched.

use indexmap::IndexMap;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Variable mapping from placeholder key to replacement value.
pub type Variables = IndexMap<String, String>;

/// Any `{{ key }}`; the key may not contain braces.
static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("Invalid placeholder regex")
});

/// Substitutes placeholders for one fixed variable mapping.
#[derive(Debug)]
pub struct Substitutor<'a> {
    variables: &'a Variables,
}

impl<'a> Substitutor<'a> {
    pub fn new(variables: &'a Variables) -> Self {
        Self { variables }
    }

    pub fn substitute<'c>(&self, content: &'c str) -> Cow<'c, str> {
        if self.variables.is_empty() {
            return Cow::Borrowed(content);
        }
        PLACEHOLDER_REGEX.replace_all(content, |caps: &Captures| {
            match self.variables.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
    }
}

/// Replaces the placeholders in `content` using `variables`.
pub fn substitute(content: &str, variables: &Variables) -> String {
    Substitutor::new(variables).substitute(content).into_owned()
}
