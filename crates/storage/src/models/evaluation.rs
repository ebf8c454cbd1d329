use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::StorageError;
use crate::services::rating;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStatus {
    Draft,
    Submitted,
    Reviewed,
}

impl EvaluationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Reviewed => "reviewed",
        }
    }
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvaluationStatus {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "reviewed" => Ok(Self::Reviewed),
            other => Err(StorageError::ConstraintViolation(format!(
                "unknown evaluation status '{other}'"
            ))),
        }
    }
}

/// One rated criterion of an evaluation.
///
/// Ratings are expected in `[1, 5]` and weights in `[0, 1]`, but neither is
/// clamped: out-of-range values flow through to the scores as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub name: String,
    #[schema(value_type = f64)]
    pub rating: Decimal,
    #[schema(value_type = f64)]
    pub weight: Decimal,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Evaluation {
    pub id: i64,
    pub internship_id: i64,
    pub evaluator_id: i64,
    pub student_id: i64,
    pub status: EvaluationStatus,
    pub categories: Vec<Category>,
    #[schema(value_type = Option<f64>)]
    pub overall_rating: Option<Decimal>,
    pub comments: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Evaluation {
    pub fn is_reviewed(&self) -> bool {
        self.status == EvaluationStatus::Reviewed
    }

    /// Stored overall rating, or the weighted score of the categories when
    /// none has been stored yet.
    pub fn effective_rating(&self) -> Decimal {
        self.overall_rating
            .unwrap_or_else(|| rating::weighted_score(&self.categories))
    }

    /// Recomputes `overall_rating` from the categories. Repositories call
    /// this on every write so the stored value never drifts.
    pub fn refresh_overall_rating(&mut self) {
        self.overall_rating = if self.categories.is_empty() {
            None
        } else {
            Some(rating::weighted_score(&self.categories))
        };
    }
}
