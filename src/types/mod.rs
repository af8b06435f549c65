pub mod author;
pub mod book;
pub mod collection;
pub mod date;
pub mod isbn;
pub mod option_to_create;
pub mod profile;
pub mod source;
pub mod text;
pub mod timestamp;
