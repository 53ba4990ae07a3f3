pub mod book;
pub mod collection;
pub mod collection_book;
pub mod soft_delete;

pub use soft_delete::SoftDelete;
