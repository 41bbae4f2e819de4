pub mod errors;
pub mod retry;
pub mod db;
pub mod bootstrap;
pub mod student;
pub mod course;
pub mod enrollment;

pub use bootstrap::{ConnectionState, Storage, StorageStatus};

#[cfg(test)]
mod tests;
