use std::{fmt::Display, str::FromStr};

use inquire::{validator::Validation, CustomUserError};

use crate::{traits::PromptType, types::book::Cover};

/// An ISBN typed or pasted by hand, e.g. when none of the offered covers fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Isbn(pub isbn2::Isbn);

impl Isbn {
    /// Covers are looked up by the bare digits, without hyphens.
    pub fn to_cover(&self) -> Cover {
        Cover::Isbn(self.digits())
    }

    pub fn digits(&self) -> String {
        self.0
            .to_string()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect()
    }
}

/// Accepts what usually gets pasted from a shop or catalogue page:
/// "ISBN 978-0-441-01359-3", "0441013597", with or without hyphens.
impl FromStr for Isbn {
    type Err = isbn2::IsbnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s
            .strip_prefix("ISBN")
            .or_else(|| s.strip_prefix("isbn"))
            .map(|rest| rest.trim_start_matches(&[':', '-', ' '][..]))
            .unwrap_or(s);
        let compact: String = s.chars().filter(|c| !matches!(c, '-' | ' ')).collect();
        compact.parse().map(Self)
    }
}

fn validator_isbn(input: &str) -> Result<Validation, CustomUserError> {
    match input.parse::<Isbn>() {
        Ok(_) => Ok(Validation::Valid),
        Err(_) => Ok(Validation::Invalid("Input isn't a valid isbn".into())),
    }
}

fn ask<'a>(prompt: &'a str, initial_value: &'a str) -> inquire::Text<'a> {
    inquire::Text::new(prompt)
        .with_placeholder("978-0-441-01359-3")
        .with_initial_value(initial_value)
        .with_validator(validator_isbn)
}

fn parse_answer(answer: &str) -> anyhow::Result<Isbn> {
    answer
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid isbn {answer:?}: {e:?}"))
}

impl PromptType for Isbn {
    fn create_by_prompt(prompt: &str, initial_value: Option<&Self>) -> anyhow::Result<Self> {
        let initial_value = initial_value.map(Isbn::digits).unwrap_or_default();
        parse_answer(&ask(prompt, &initial_value).prompt()?)
    }

    fn create_by_prompt_skippable(
        prompt: &str,
        initial_value: Option<&Self>,
    ) -> anyhow::Result<Option<Self>> {
        let initial_value = initial_value.map(Isbn::digits).unwrap_or_default();
        ask(prompt, &initial_value)
            .prompt_skippable()?
            .map(|answer| parse_answer(&answer))
            .transpose()
    }
}

impl Display for Isbn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.hyphenate() {
            Ok(hyphenated) => write!(f, "{hyphenated}"),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}
