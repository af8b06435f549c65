use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write};

use crate::{
    config::{Config, Styleable},
    traits::DisplayTerminal,
};

/// A person or outlet whose mentions are recorded.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
}

impl Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl DisplayTerminal for Profile {
    fn fmt(&self, f: &mut String, config: &Config) -> Result<()> {
        write!(f, "{}", self.name.style(&config.output_profile.style_content))?;
        Ok(())
    }
}

/// Profiles whose name contains the typed text, ignoring case. Nothing typed
/// means nothing suggested.
pub fn suggest_profiles<'a>(profiles: &'a [Profile], typed: &str) -> Vec<&'a Profile> {
    if typed.is_empty() {
        return vec![];
    }
    let typed = typed.to_lowercase();
    profiles
        .iter()
        .filter(|profile| profile.name.to_lowercase().contains(&typed))
        .collect()
}
