//! Read/write seam between the analytics engine and whatever holds the
//! records. The engine only ever sees snapshots returned from these calls.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Company, Evaluation, Internship, InternshipStatus, Role, User};

#[derive(Debug, Clone, Default)]
pub struct InternshipFilter {
    pub student_id: Option<i64>,
    pub supervisor_id: Option<i64>,
    pub company_id: Option<i64>,
    pub status: Option<InternshipStatus>,
}

impl InternshipFilter {
    pub fn for_student(student_id: i64) -> Self {
        Self {
            student_id: Some(student_id),
            ..Self::default()
        }
    }

    pub fn for_supervisor(supervisor_id: i64) -> Self {
        Self {
            supervisor_id: Some(supervisor_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, internship: &Internship) -> bool {
        self.student_id.is_none_or(|id| internship.student_id == id)
            && self.supervisor_id.is_none_or(|id| internship.supervisor_id == id)
            && self.company_id.is_none_or(|id| internship.company_id == id)
            && self.status.is_none_or(|status| internship.status == status)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EvaluationFilter {
    pub evaluator_id: Option<i64>,
    pub student_id: Option<i64>,
    pub internship_id: Option<i64>,
}

impl EvaluationFilter {
    pub fn for_evaluator(evaluator_id: i64) -> Self {
        Self {
            evaluator_id: Some(evaluator_id),
            ..Self::default()
        }
    }

    pub fn for_student(student_id: i64) -> Self {
        Self {
            student_id: Some(student_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, evaluation: &Evaluation) -> bool {
        self.evaluator_id.is_none_or(|id| evaluation.evaluator_id == id)
            && self.student_id.is_none_or(|id| evaluation.student_id == id)
            && self.internship_id.is_none_or(|id| evaluation.internship_id == id)
    }
}

#[async_trait]
pub trait PlacementRepository: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>>;
    /// Batch lookup. Unknown ids are skipped, not reported.
    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    async fn get_user(&self, id: i64) -> Result<User>;
    async fn put_user(&self, user: User) -> Result<User>;

    async fn list_companies(&self) -> Result<Vec<Company>>;
    async fn companies_by_ids(&self, ids: &[i64]) -> Result<Vec<Company>>;
    async fn get_company(&self, id: i64) -> Result<Company>;
    async fn put_company(&self, company: Company) -> Result<Company>;

    async fn list_internships(&self, filter: &InternshipFilter) -> Result<Vec<Internship>>;
    async fn internships_by_ids(&self, ids: &[i64]) -> Result<Vec<Internship>>;
    async fn get_internship(&self, id: i64) -> Result<Internship>;
    async fn put_internship(&self, internship: Internship) -> Result<Internship>;

    async fn list_evaluations(&self, filter: &EvaluationFilter) -> Result<Vec<Evaluation>>;
    async fn get_evaluation(&self, id: i64) -> Result<Evaluation>;
    /// Stores the evaluation with its overall rating recomputed from the
    /// categories.
    async fn put_evaluation(&self, evaluation: Evaluation) -> Result<Evaluation>;
}
