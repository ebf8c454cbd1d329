use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::StorageError;

/// Lifecycle state of an internship. Set by whoever manages the placement;
/// no transition order is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InternshipStatus {
    Pending,
    Active,
    Completed,
    Terminated,
}

impl InternshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for InternshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InternshipStatus {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "terminated" => Ok(Self::Terminated),
            other => Err(StorageError::ConstraintViolation(format!(
                "unknown internship status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Internship {
    pub id: i64,
    pub student_id: i64,
    pub company_id: i64,
    pub supervisor_id: i64,
    pub status: InternshipStatus,
    pub position: String,
    pub department: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl Internship {
    /// Length of the placement in whole weeks, rounded up. Zero when the end
    /// date precedes the start date.
    pub fn duration_weeks(&self) -> i64 {
        let days = (self.end_date - self.start_date).num_days();
        if days <= 0 {
            return 0;
        }
        (days + 6) / 7
    }
}
