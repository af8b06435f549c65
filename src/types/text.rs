use std::fmt::Display;

use inquire::validator::{StringValidator, Validation};
use serde::{Deserialize, Serialize};

use crate::{editor::TextField, traits::PromptType};

/// Required single line text such as a book title or an author list. Pasted
/// line breaks are folded into spaces and surrounding space is dropped.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text(pub String);

impl Text {
    pub fn from_answer(answer: &str) -> Self {
        let mut field = TextField::single_line();
        field.paste(answer);
        Text(field.trimmed().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone)]
struct NotBlank;

impl StringValidator for NotBlank {
    fn validate(&self, input: &str) -> Result<Validation, inquire::CustomUserError> {
        if Text::from_answer(input).0.is_empty() {
            Ok(Validation::Invalid("This field is required.".into()))
        } else {
            Ok(Validation::Valid)
        }
    }
}

impl PromptType for Text {
    fn create_by_prompt(prompt: &str, initial_value: Option<&Self>) -> anyhow::Result<Self> {
        let answer = inquire::Text::new(prompt)
            .with_initial_value(initial_value.map_or("", Text::as_str))
            .with_validator(NotBlank)
            .prompt()?;
        Ok(Text::from_answer(&answer))
    }

    fn create_by_prompt_skippable(
        prompt: &str,
        initial_value: Option<&Self>,
    ) -> anyhow::Result<Option<Self>> {
        let answer = inquire::Text::new(prompt)
            .with_initial_value(initial_value.map_or("", Text::as_str))
            .with_validator(NotBlank)
            .prompt_skippable()?;
        Ok(answer.as_deref().map(Text::from_answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_are_one_trimmed_line() {
        assert_eq!(Text::from_answer("  Good\r\nOmens \n"), Text("Good Omens".into()));
        assert_eq!(Text::from_answer(" \n "), Text::default());
    }
}
