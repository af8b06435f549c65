//! Transport encoding of file contents and the JSON lines record format.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::de::DeserializeOwned;

use crate::error::{Error, RemoteError, Result};

/// Base64 of the UTF-8 bytes, as the content API expects for writes.
pub fn encode_content(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decode content returned by the API. The API wraps base64 at 60 columns,
/// so whitespace is skipped.
pub fn decode_content(path: &str, encoded: &str) -> std::result::Result<String, RemoteError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact).map_err(|e| RemoteError::Encoding {
        path:   path.to_string(),
        reason: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| RemoteError::Encoding {
        path:   path.to_string(),
        reason: e.to_string(),
    })
}

/// One JSON value per line. Blank lines are skipped; a malformed line fails
/// the whole file and names the line and the offending field.
pub fn parse_json_lines<T: DeserializeOwned>(content: &str) -> Result<Vec<T>> {
    content
        .split('\n')
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let de = &mut serde_json::Deserializer::from_str(line);
            serde_path_to_error::deserialize(de).map_err(|source| Error::MalformedLine {
                line: index + 1,
                source,
            })
        })
        .collect()
}
