use serde::{Deserialize, Serialize};

/// The `author` field of a stored book: older records hold a single name,
/// newer ones a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorField {
    Single(String),
    Multiple(Vec<String>),
}

impl AuthorField {
    pub fn as_slice(&self) -> &[String] {
        match self {
            AuthorField::Single(name) => std::slice::from_ref(name),
            AuthorField::Multiple(names) => names,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().iter().all(|name| name.trim().is_empty())
    }
}

impl From<Vec<String>> for AuthorField {
    fn from(names: Vec<String>) -> Self {
        AuthorField::Multiple(names)
    }
}

/// Split the comma separated authors field as typed: "Terry Pratchett, Neil
/// Gaiman" gives two names. Blank input gives no names.
pub fn parse_author_list(input: &str) -> Vec<String> {
    if input.trim().is_empty() {
        return vec![];
    }
    input.split(',').map(|name| name.trim().to_string()).collect()
}
