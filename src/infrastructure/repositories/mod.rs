//! Repository implementations using SeaORM

pub mod book_repository;
pub mod collection_repository;

pub use book_repository::SeaOrmBookRepository;
pub use collection_repository::SeaOrmCollectionRepository;
