//! Types that can be used in other crates

use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, ValidationError};

/// This Unit struct represents MinorUnit in which core amount works
#[derive(
    Default, Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct MinorUnit(i64);

impl MinorUnit {
    /// gets amount as i64 value
    pub fn get_amount_as_i64(self) -> i64 {
        self.0
    }

    /// forms a new minor unit from amount
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// zero amount
    pub fn zero() -> Self {
        Self(0)
    }

    /// true for strictly positive amounts
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Amounts sent to the processor are never negative
    pub fn ensure_non_negative(self) -> CustomResult<Self, ValidationError> {
        if self.0 < 0 {
            Err(ValidationError::InvalidValue {
                message: format!("amount must be non-negative, got {}", self.0),
            }
            .into())
        } else {
            Ok(self)
        }
    }
}

impl std::fmt::Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MinorUnit {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
