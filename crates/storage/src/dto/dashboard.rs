use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{EvaluationDisplayStatus, EvaluationStatus, PlacementStatus};
use crate::services::buckets::ANALYTICS_WEEKS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRegistrations {
    pub month: String,
    pub users: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_users: usize,
    pub students: usize,
    pub coordinators: usize,
    pub supervisors: usize,
    pub admins: usize,
    pub active_internships: usize,
    pub completed_this_year: usize,
    pub total_evaluations: usize,
    pub monthly_registrations: Vec<MonthlyRegistrations>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SemesterGrowth {
    pub semester: String,
    pub internships: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPlacements {
    pub company: String,
    pub placements: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyScore {
    pub company: String,
    pub average_score: f64,
    pub evaluation_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveVsCompleted {
    pub active: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorAnalytics {
    pub internship_growth: Vec<SemesterGrowth>,
    /// Percent of students holding a confirmed placement.
    pub placement_success_rate: u32,
    /// Percent of evaluations that have been reviewed.
    pub evaluation_completion_rate: u32,
    pub placements_per_company: Vec<CompanyPlacements>,
    pub evaluation_scores_by_company: Vec<CompanyScore>,
    pub active_vs_completed: ActiveVsCompleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyActivity {
    pub week: String,
    pub evaluations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorOverview {
    pub active_interns: usize,
    pub pending_evaluations: usize,
    pub reviewed_evaluations: usize,
    pub weekly_activity: Vec<WeeklyActivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopIntern {
    pub name: String,
    pub average_rating: f64,
    pub evaluation_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaAverage {
    pub criteria: String,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBucket {
    pub rating: u8,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorAnalytics {
    pub weekly_activity: Vec<WeeklyActivity>,
    pub top_interns: Vec<TopIntern>,
    pub average_by_criteria: Vec<CriteriaAverage>,
    pub score_distribution: Vec<ScoreBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRating {
    pub name: String,
    pub rating: f64,
}

/// An evaluation as the evaluated student sees it. Ratings, categories and
/// comments stay empty until the evaluation is reviewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentEvaluation {
    pub id: i64,
    pub evaluator: String,
    pub date: NaiveDate,
    pub overall_rating: Option<f64>,
    pub status: EvaluationStatus,
    pub display_status: EvaluationDisplayStatus,
    pub categories: Vec<CategoryRating>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentInternship {
    pub id: i64,
    pub company: String,
    pub supervisor: String,
    pub position: String,
    pub department: Option<String>,
    pub placement_status: PlacementStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_weeks: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSummary {
    pub total: usize,
    pub reviewed: usize,
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentOverview {
    pub internship: Option<StudentInternship>,
    pub evaluations: EvaluationSummary,
}

#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct WeeklyActivityParams {
    /// Number of trailing weeks to report
    #[serde(default = "default_weeks")]
    #[validate(range(min = 1, max = 52, message = "weeks must be between 1 and 52"))]
    pub weeks: u32,
}

fn default_weeks() -> u32 {
    ANALYTICS_WEEKS
}
