use chrono::{NaiveDate, Utc};
use inquire::validator::Validation;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::traits::PromptType;

lazy_static! {
    static ref PARTIAL_DATE: Regex = Regex::new(r"^\d{4}(?:-\d{2}(?:-\d{2})?)?$").unwrap();
    static ref SINGLE_KEYSTROKE: Regex = Regex::new(r"^[0-9+]$").unwrap();
}

/// `yyyy`, `yyyy-mm` or `yyyy-mm-dd`.
pub fn is_partial_date(s: &str) -> bool {
    PARTIAL_DATE.is_match(s)
}

/// Turn pasted text into a source date. A lone digit or `+` is treated as
/// ordinary typing and gives `None`. Partial dates are kept, anything
/// `dateparser` understands becomes `yyyy-mm-dd` (in UTC) and everything else
/// is cut at the first `T`.
pub fn parse_pasted_date(text: &str) -> Option<String> {
    if SINGLE_KEYSTROKE.is_match(text) {
        return None;
    }
    let trimmed = text.trim();
    if is_partial_date(trimmed) {
        return Some(trimmed.to_string());
    }
    match dateparser::parse_with_timezone(trimmed, &Utc) {
        Ok(date) => Some(date.date_naive().format("%Y-%m-%d").to_string()),
        Err(_) => Some(text.split('T').next().unwrap_or_default().to_string()),
    }
}

/// The date line under an embedded post, e.g. "March 5, 2024".
pub fn parse_post_date(text: &str) -> Option<String> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%B %d, %Y")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok()
        .or_else(|| {
            dateparser::parse_with_timezone(text, &Utc)
                .ok()
                .map(|date| date.date_naive().format("%Y-%m-%d").to_string())
        })
}

/// The date of a source as entered in the form.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDate(pub String);

impl Display for SourceDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validator_date(input: &str) -> Result<Validation, inquire::CustomUserError> {
    match parse_pasted_date(input) {
        Some(date) if is_partial_date(&date) => Ok(Validation::Valid),
        None if input.trim().is_empty() => Ok(Validation::Valid),
        _ => Ok(Validation::Invalid(
            "Expected yyyy-mm-dd, yyyy-mm, yyyy, or a pasted date".into(),
        )),
    }
}

fn from_answer(answer: String) -> SourceDate {
    SourceDate(parse_pasted_date(&answer).unwrap_or(answer))
}

impl PromptType for SourceDate {
    fn create_by_prompt(prompt: &str, initial_value: Option<&Self>) -> anyhow::Result<Self> {
        let mut prompt = inquire::Text::new(prompt)
            .with_placeholder("yyyy-mm-dd, yyyy-mm, yyyy, or try pasting")
            .with_validator(validator_date);
        if let Some(s) = initial_value {
            prompt = prompt.with_initial_value(&s.0);
        }
        Ok(from_answer(prompt.prompt()?))
    }

    fn create_by_prompt_skippable(
        prompt: &str,
        initial_value: Option<&Self>,
    ) -> anyhow::Result<Option<Self>> {
        let mut prompt = inquire::Text::new(prompt)
            .with_placeholder("yyyy-mm-dd, yyyy-mm, yyyy, or try pasting")
            .with_validator(validator_date);
        if let Some(s) = initial_value {
            prompt = prompt.with_initial_value(&s.0);
        }
        Ok(prompt.prompt_skippable()?.map(from_answer))
    }
}
