use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ResidentDirectory;
use crate::core::Result;
use crate::modules::residents::models::Resident;

/// Resident directory held in memory, for tests and embedding
#[derive(Default)]
pub struct InMemoryResidentDirectory {
    residents: RwLock<Vec<Resident>>,
}

impl InMemoryResidentDirectory {
    pub fn new(residents: Vec<Resident>) -> Self {
        Self {
            residents: RwLock::new(residents),
        }
    }

    /// Insert or replace a resident by ID
    pub async fn upsert(&self, resident: Resident) {
        let mut residents = self.residents.write().await;
        match residents.iter_mut().find(|r| r.id == resident.id) {
            Some(existing) => *existing = resident,
            None => residents.push(resident),
        }
    }
}

#[async_trait]
impl ResidentDirectory for InMemoryResidentDirectory {
    async fn active_residents(&self) -> Result<Vec<Resident>> {
        let residents = self.residents.read().await;
        Ok(residents.iter().filter(|r| r.is_billable()).cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Resident>> {
        let residents = self.residents.read().await;
        Ok(residents.iter().find(|r| r.id == id).cloned())
    }
}
