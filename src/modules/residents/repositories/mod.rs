mod memory;
mod resident_repository;

pub use memory::InMemoryResidentDirectory;
pub use resident_repository::{ResidentDirectory, ResidentRepository};
