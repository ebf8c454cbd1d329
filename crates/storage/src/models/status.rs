//! Two-way mapping between the stored lifecycle states and the vocabulary
//! shown on dashboards. Every arm is matched exhaustively in both directions
//! so a new state fails to compile until it is mapped.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EvaluationStatus, InternshipStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl From<InternshipStatus> for PlacementStatus {
    fn from(status: InternshipStatus) -> Self {
        match status {
            InternshipStatus::Pending => Self::Pending,
            InternshipStatus::Active => Self::Confirmed,
            InternshipStatus::Completed => Self::Completed,
            InternshipStatus::Terminated => Self::Cancelled,
        }
    }
}

impl From<PlacementStatus> for InternshipStatus {
    fn from(status: PlacementStatus) -> Self {
        match status {
            PlacementStatus::Pending => Self::Pending,
            PlacementStatus::Confirmed => Self::Active,
            PlacementStatus::Completed => Self::Completed,
            PlacementStatus::Cancelled => Self::Terminated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationDisplayStatus {
    Pending,
    UnderReview,
    Submitted,
}

impl From<EvaluationStatus> for EvaluationDisplayStatus {
    fn from(status: EvaluationStatus) -> Self {
        match status {
            EvaluationStatus::Draft => Self::Pending,
            EvaluationStatus::Submitted => Self::UnderReview,
            EvaluationStatus::Reviewed => Self::Submitted,
        }
    }
}

impl From<EvaluationDisplayStatus> for EvaluationStatus {
    fn from(status: EvaluationDisplayStatus) -> Self {
        match status {
            EvaluationDisplayStatus::Pending => Self::Draft,
            EvaluationDisplayStatus::UnderReview => Self::Submitted,
            EvaluationDisplayStatus::Submitted => Self::Reviewed,
        }
    }
}
