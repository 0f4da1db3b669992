pub mod access;
pub mod repository;
pub mod types;
