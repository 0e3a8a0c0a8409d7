pub mod item;
pub mod revoked_token;
pub mod store;
pub mod tag;
pub mod user;

pub use item::{Item, ItemChanges, NewItem};
pub use revoked_token::RevokedToken;
pub use store::Store;
pub use tag::Tag;
pub use user::User;
