pub mod bulk;
pub mod catalog;
pub mod clipboard;
pub mod editor;
pub mod entry;
pub mod events;
pub mod session;
pub mod store;
pub mod template;
