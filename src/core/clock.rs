use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};

use crate::core::{AppError, Result};

/// Source of "now" and "today" for everything that derives payment status.
///
/// Timestamps are kept in UTC. "Today" is the calendar date at the
/// building's local offset, so a payment due on the 5th becomes overdue at
/// local midnight rather than UTC midnight.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate;
}

/// Wall clock with a fixed local offset (East Africa Time by default)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub const DEFAULT_OFFSET_HOURS: i32 = 3;

    /// Build a clock for a whole-hour UTC offset
    pub fn with_offset_hours(hours: i32) -> Result<Self> {
        let offset = FixedOffset::east_opt(hours * 3600).ok_or_else(|| {
            AppError::Configuration(format!("Invalid UTC offset: {} hours", hours))
        })?;

        Ok(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            offset: FixedOffset::east_opt(Self::DEFAULT_OFFSET_HOURS * 3600)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.offset).date_naive()
    }
}

/// Clock pinned to a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    /// Pin the clock to noon UTC of `date`
    pub fn on(date: NaiveDate) -> Self {
        let now = date
            .and_hms_opt(12, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or_else(Utc::now);

        Self { now, today: date }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
