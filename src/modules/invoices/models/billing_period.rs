// Calendar month a rent invoice covers.
//
// Invoices are keyed by the period label ("February 2026"), which is what
// staff see in the back office. The generator treats the label as an opaque
// key; this type only builds and parses labels and picks due dates.

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillingPeriod {
    year: i32,
    month: u32,
}

impl BillingPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::invalid_input(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }

        Ok(Self { year, month })
    }

    /// Period containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar month after the one containing `today`
    pub fn next_after(today: NaiveDate) -> Self {
        Self::containing(today).next()
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Label used as the invoice key, e.g. "February 2026"
    pub fn label(&self) -> String {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown");

        format!("{} {}", name, self.year)
    }

    /// Parse a label such as "February 2026" or "feb 2026"
    pub fn parse(label: &str) -> Result<Self> {
        let invalid = || {
            AppError::invalid_input(format!(
                "Billing period must look like 'February 2026', got '{}'",
                label
            ))
        };

        let mut parts = label.split_whitespace();
        let (Some(month), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        let month: Month = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;

        Self::new(year, month.number_from_month())
    }

    /// Due date on `due_day` of this month
    pub fn due_date(&self, due_day: u32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, due_day).ok_or_else(|| {
            AppError::invalid_input(format!(
                "Day {} does not exist in {}",
                due_day,
                self.label()
            ))
        })
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

impl std::str::FromStr for BillingPeriod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BillingPeriod {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<BillingPeriod> for String {
    fn from(period: BillingPeriod) -> Self {
        period.label()
    }
}
