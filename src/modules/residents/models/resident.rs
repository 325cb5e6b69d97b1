use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Occupancy state of a resident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidentStatus {
    /// Living in the unit and billed monthly
    Active,
    /// Signed but not yet moved in
    Pending,
    MovedOut,
}

impl ResidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResidentStatus::Active => "active",
            ResidentStatus::Pending => "pending",
            ResidentStatus::MovedOut => "moved_out",
        }
    }
}

impl std::fmt::Display for ResidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResidentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "active" => Ok(ResidentStatus::Active),
            "pending" => Ok(ResidentStatus::Pending),
            "moved_out" => Ok(ResidentStatus::MovedOut),
            _ => Err(format!("Invalid resident status: {}", s)),
        }
    }
}

/// The ledger's read-only view of a resident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resident {
    pub id: String,
    pub name: String,
    pub unit_number: String,
    pub status: ResidentStatus,
    pub monthly_rent: Decimal,
}

impl Resident {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_number: impl Into<String>,
        status: ResidentStatus,
        monthly_rent: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_number: unit_number.into(),
            status,
            monthly_rent,
        }
    }

    /// Only active residents receive rent invoices
    pub fn is_billable(&self) -> bool {
        self.status == ResidentStatus::Active
    }
}
