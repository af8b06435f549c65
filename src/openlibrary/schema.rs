use serde::{Deserialize, Serialize};

/// Response of `search.json`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub docs:      Vec<SearchDoc>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDoc {
    pub title:       Option<String>,
    pub author_name: Option<Vec<String>>,
    #[serde(default)]
    pub isbn:        Vec<String>,
    pub cover_i:     Option<u64>,
}

/// One entry of `api/books?jscmd=data`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edition {
    pub title:    Option<String>,
    pub subtitle: Option<String>,
    pub authors:  Option<Vec<Author>>,
    pub cover:    Option<Cover>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub url:  String,
    pub name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cover {
    pub small:  Option<String>,
    pub medium: Option<String>,
    pub large:  Option<String>,
}
