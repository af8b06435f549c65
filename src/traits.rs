use anyhow::Result;

use crate::config::Config;

/// Values that can be asked for interactively.
pub trait PromptType {
    fn create_by_prompt(prompt: &str, initial_value: Option<&Self>) -> Result<Self>
    where
        Self: Sized;

    fn create_by_prompt_skippable(prompt: &str, initial_value: Option<&Self>) -> Result<Option<Self>>
    where
        Self: Sized;
}

/// Styled rendering for the terminal, driven by the output section of [Config].
pub trait DisplayTerminal {
    fn fmt(&self, f: &mut String, config: &Config) -> Result<()>;

    fn fmt_to_string(&self, config: &Config) -> Result<String> {
        let mut s = String::new();
        DisplayTerminal::fmt(self, &mut s, config)?;
        Ok(s)
    }
}
