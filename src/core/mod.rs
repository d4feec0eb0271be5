pub mod book_manager;
pub mod repository;
pub mod services;
pub mod utils;

pub use book_manager::BookManager;
pub use repository::{BookRepository, Books, Dirty};
