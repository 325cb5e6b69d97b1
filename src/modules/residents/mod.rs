// Residents module
//
// Read-only access to the resident directory owned by the surrounding
// application. The ledger only needs identities, status and monthly rent.

pub mod models;
pub mod repositories;

pub use models::{Resident, ResidentStatus};
pub use repositories::{InMemoryResidentDirectory, ResidentDirectory, ResidentRepository};
