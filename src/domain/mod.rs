pub mod error;
pub mod items;
pub mod slug;
