pub mod csv;
pub mod native;
pub mod paste;
pub mod snapshot;
