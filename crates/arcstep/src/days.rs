use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// How close the leave is to running out, by share of days left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, StrumDisplay)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Band {
    Critical,
    Warning,
    Nominal,
}

impl Band {
    /// `left/total ≤ 1/3` is critical, `≤ 3/4` is warning, anything above is nominal.
    pub fn classify(days_left: u32, total_days: u32) -> Self {
        let (left, total) = (u64::from(days_left), u64::from(total_days.max(1)));
        if 3 * left <= total {
            Self::Critical
        } else if 4 * left <= 3 * total {
            Self::Warning
        } else {
            Self::Nominal
        }
    }
}

/// Largest total the gauge lays out markers for.
pub const MAX_TOTAL_DAYS: u32 = 365;

/// The parent-held pair the gauge displays. Always satisfies `1 ≤ total ≤ MAX_TOTAL_DAYS`
/// and `left ≤ total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLeaveDays", into = "RawLeaveDays")]
pub struct LeaveDays {
    total: u32,
    left: u32,
}

#[derive(Serialize, Deserialize)]
struct RawLeaveDays {
    total_days: u32,
    days_left: u32,
}

impl From<RawLeaveDays> for LeaveDays {
    fn from(raw: RawLeaveDays) -> Self {
        Self::new(raw.total_days, raw.days_left)
    }
}

impl From<LeaveDays> for RawLeaveDays {
    fn from(days: LeaveDays) -> Self {
        Self {
            total_days: days.total,
            days_left: days.left,
        }
    }
}

impl Default for LeaveDays {
    fn default() -> Self {
        Self::new(5, 3)
    }
}

impl LeaveDays {
    pub fn new(total: u32, left: u32) -> Self {
        let total = total.clamp(1, MAX_TOTAL_DAYS);
        Self {
            total,
            left: left.min(total),
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn used(&self) -> u32 {
        self.total - self.left
    }

    pub fn band(&self) -> Band {
        Band::classify(self.left, self.total)
    }

    /// New total, between 1 and `MAX_TOTAL_DAYS`. Days left never exceed the new total.
    pub fn update_total_days(self, new_total: u32) -> Self {
        Self::new(new_total, self.left)
    }

    pub fn with_days_left(self, left: u32) -> Self {
        Self::new(self.total, left)
    }
}
