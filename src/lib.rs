pub mod config;
pub mod default_colors;
pub mod draft;
pub mod duplicate;
pub mod editor;
pub mod error;
pub mod normalize;
pub mod oembed;
pub mod openlibrary;
pub mod preview;
pub mod reconcile;
pub mod remote;
pub mod session;
pub mod submit;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
