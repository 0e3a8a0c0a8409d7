pub mod format;
pub mod json;

pub use format::{ItemView, Message, PlainItem, PlainStore, PlainTag, StoreView, TagAndItem, TagView};
pub use json::{FieldCheck, Validate, ValidJson};
