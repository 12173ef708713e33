//! User input and interaction handling.
//! Prompts go through the [`Prompter`] trait so the project flow can run
//! against a terminal, against defaults only, or against a script in tests.

use crate::error::Result;
use dialoguer::{Confirm, Input, Select};

/// Validation hook for text prompts: `Err` carries the message shown to the user.
pub type Validator = fn(&str) -> std::result::Result<(), String>;

pub trait Prompter {
    /// Asks for a line of text.
    fn input(&self, prompt: &str, default: &str, validate: Option<Validator>) -> Result<String>;

    /// Asks a yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Asks to pick one of `items`, returning its index.
    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize>;
}

/// Terminal prompts backed by dialoguer.
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        DialoguerPrompter::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&self, prompt: &str, default: &str, validate: Option<Validator>) -> Result<String> {
        let mut input = Input::<String>::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true);
        if let Some(validate) = validate {
            input = input.validate_with(move |value: &String| validate(value));
        }
        Ok(input.interact_text()?)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new().with_prompt(prompt).default(default).interact()?)
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
        Ok(Select::new().with_prompt(prompt).default(default).items(items).interact()?)
    }
}

/// Answers every prompt with its default. Used for `--yes`.
pub struct DefaultsPrompter;

impl Prompter for DefaultsPrompter {
    fn input(&self, _prompt: &str, default: &str, _validate: Option<Validator>) -> Result<String> {
        Ok(default.to_string())
    }

    fn confirm(&self, _prompt: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn select(&self, _prompt: &str, _items: &[&str], default: usize) -> Result<usize> {
        Ok(default)
    }
}
