mod resident;

pub use resident::{Resident, ResidentStatus};
