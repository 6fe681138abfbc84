//! HistoryRepository 実装

mod inmemory;
mod json_file;

pub use inmemory::InMemoryHistoryRepository;
pub use json_file::JsonFileHistoryRepository;
