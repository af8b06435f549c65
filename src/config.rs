use std::path::PathBuf;

use anyhow::Result;
use crossterm::style::Stylize;
use figment::{
    providers::{Env, Format, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::{default_colors::*, traits::DisplayTerminal};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    bold:   bool,
    italic: bool,
    color:  crossterm::style::Color,
}

impl StyleConfig {
    fn style(&self, s: impl ToString) -> String {
        let mut s = s.to_string().with(self.color);
        if self.bold {
            s = s.bold();
        }
        if self.italic {
            s = s.italic();
        }
        s.to_string()
    }
}

pub trait Styleable {
    fn style(&self, c: &StyleConfig) -> String;
}

impl<T> Styleable for T
where
    T: ToString + std::fmt::Display,
{
    fn style(&self, c: &StyleConfig) -> String {
        c.style(self)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            color:  COLOR_WHITE,
            bold:   false,
            italic: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub prefix:            String,
    pub suffix:            String,
    pub description:       String,
    pub separator:         String,
    pub style_prefix:      StyleConfig,
    pub style_suffix:      StyleConfig,
    pub style_description: StyleConfig,
    pub style_separator:   StyleConfig,
    pub style_content:     StyleConfig,
}

impl OutputConfig {
    fn frame(&self) -> (String, String, String) {
        let prefix = self.prefix.style(&self.style_prefix);
        let suffix = self.suffix.style(&self.style_suffix);
        let description = self.description.style(&self.style_description);
        (prefix, description, suffix)
    }

    pub fn format(&self, content: &impl DisplayTerminal, config: &Config) -> Result<String> {
        let (prefix, description, suffix) = self.frame();
        let content = DisplayTerminal::fmt_to_string(content, config)?;
        Ok(format!("{prefix}{description} {content}{suffix}"))
    }

    pub fn format_str(&self, content: impl ToString) -> String {
        let (prefix, description, suffix) = self.frame();
        let content = content.to_string().style(&self.style_content);
        format!("{prefix}{description} {content}{suffix}")
    }

    pub fn format_vec<T: DisplayTerminal>(&self, content: &[T], config: &Config) -> Result<String> {
        let (prefix, description, suffix) = self.frame();
        let separator = self.separator.style(&self.style_separator);
        let mut s = format!("{prefix}{description} ");
        let mut i = content.iter().peekable();
        while let Some(x) = i.next() {
            s.push_str(&DisplayTerminal::fmt_to_string(x, config)?);
            if i.peek().is_some() {
                s.push_str(&separator);
            }
        }
        s.push_str(&suffix);
        Ok(s)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix:            "".into(),
            suffix:            "".into(),
            description:       "".into(),
            separator:         ", ".into(),
            style_prefix:      StyleConfig::default(),
            style_suffix:      StyleConfig::default(),
            style_description: StyleConfig {
                italic: true,
                ..StyleConfig::default()
            },
            style_separator:   StyleConfig::default(),
            style_content:     StyleConfig::default(),
        }
    }
}

/// Where records live in the content repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub api_url:       String,
    pub owner:         String,
    pub repo:          String,
    pub branch:        Option<String>,
    pub profiles_path: String,
    pub books_path:    String,
    pub sources_index: String,
    pub books_dir:     String,
    pub sources_dir:   String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            api_url:       "https://api.github.com".into(),
            owner:         "recommentions".into(),
            repo:          "source".into(),
            branch:        None,
            profiles_path: "profiles.jsonl".into(),
            books_path:    "books/books.jsonl".into(),
            sources_index: "sources.txt".into(),
            books_dir:     "books".into(),
            sources_dir:   "sources".into(),
        }
    }
}

/// Third party lookups used while filling in a source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub openlibrary_search: String,
    pub openlibrary_books:  String,
    pub openlibrary_covers: String,
    pub oembed:             String,
    pub user_agent:         String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            openlibrary_search: "https://openlibrary.org/search.json".into(),
            openlibrary_books:  "https://openlibrary.org/api/books".into(),
            openlibrary_covers: "https://covers.openlibrary.org/b".into(),
            oembed:             "https://publish.twitter.com/oembed".into(),
            user_agent:         concat!("mentions/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub credentials_location: PathBuf,
    pub history_location:     PathBuf,
    pub repository:           RepositoryConfig,
    pub services:             ServiceConfig,
    pub output_book:          OutputConfig,
    pub output_author:        OutputConfig,
    pub output_profile:       OutputConfig,
    pub output_source:        OutputConfig,
    pub output_time:          OutputConfig,
    pub output_cover:         OutputConfig,
    pub output_duplicate:     OutputConfig,
    pub output_warning:       OutputConfig,
    pub output_success:       OutputConfig,
    pub output_error:         OutputConfig,
}

impl Config {
    pub fn default_as_string() -> Result<String> {
        Ok(toml::to_string(&Self::default())?)
    }

    pub fn read_config() -> Result<Self> {
        let mut config: Self = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Yaml::file("config.yaml"))
            .merge(Env::prefixed("MENTIONS_").split("__"))
            .extract()?;
        config.credentials_location = expand(&config.credentials_location)?;
        config.history_location = expand(&config.history_location)?;
        Ok(config)
    }
}

fn expand(path: &std::path::Path) -> Result<PathBuf> {
    Ok(shellexpand::path::full(path)?.into_owned())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_location: PathBuf::from("~/.cache/mentions/credentials"),
            history_location:     PathBuf::from("~/.local/share/mentions/history.txt"),
            repository:           RepositoryConfig::default(),
            services:             ServiceConfig::default(),
            output_book:          OutputConfig {
                style_content: StyleConfig {
                    color: COLOR_BOOK,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_author:        OutputConfig {
                description: "by".into(),
                style_content: StyleConfig {
                    color: COLOR_AUTHOR,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_profile:       OutputConfig {
                description: "Profile:".into(),
                style_content: StyleConfig {
                    color: COLOR_PROFILE,
                    bold: true,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_source:        OutputConfig {
                description: "Source:".into(),
                style_content: StyleConfig {
                    color: COLOR_SOURCE,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_time:          OutputConfig {
                prefix: "[".into(),
                suffix: "]".into(),
                style_content: StyleConfig {
                    color: COLOR_TIMESTAMP,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_cover:         OutputConfig {
                prefix: "(".into(),
                suffix: ")".into(),
                style_content: StyleConfig {
                    color: COLOR_DIMMED,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_duplicate:     OutputConfig {
                description: "Duplicate!".into(),
                style_description: StyleConfig {
                    bold: true,
                    color: COLOR_ERROR,
                    ..StyleConfig::default()
                },
                style_content: StyleConfig {
                    color: COLOR_SOURCE,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_warning:       OutputConfig {
                description: "Warning:".into(),
                style_content: StyleConfig {
                    color: COLOR_WARNING,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_success:       OutputConfig {
                style_content: StyleConfig {
                    color: COLOR_SUCCESS,
                    bold: true,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
            output_error:         OutputConfig {
                description: "Error".into(),
                style_content: StyleConfig {
                    color: COLOR_ERROR,
                    ..StyleConfig::default()
                },
                ..OutputConfig::default()
            },
        }
    }
}
