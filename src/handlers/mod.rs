pub mod bookmarks;
pub mod system;
