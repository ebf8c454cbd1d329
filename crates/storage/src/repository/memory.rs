use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EvaluationFilter, InternshipFilter, PlacementRepository};
use crate::error::{Result, StorageError};
use crate::models::{Company, Evaluation, Internship, Role, User};

/// Caller-owned in-process store. Each table is a `BTreeMap` so listings come
/// back in id order, which keeps tie ordering in rankings deterministic.
#[derive(Default)]
pub struct MemoryRepository {
    users: RwLock<BTreeMap<i64, User>>,
    companies: RwLock<BTreeMap<i64, Company>>,
    internships: RwLock<BTreeMap<i64, Internship>>,
    evaluations: RwLock<BTreeMap<i64, Evaluation>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository pre-populated with the given snapshots.
    pub fn with_records(
        users: Vec<User>,
        companies: Vec<Company>,
        internships: Vec<Internship>,
        evaluations: Vec<Evaluation>,
    ) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
            companies: RwLock::new(companies.into_iter().map(|c| (c.id, c)).collect()),
            internships: RwLock::new(internships.into_iter().map(|i| (i.id, i)).collect()),
            evaluations: RwLock::new(evaluations.into_iter().map(|e| (e.id, e)).collect()),
        }
    }
}

fn pick<T: Clone>(table: &BTreeMap<i64, T>, ids: &[i64]) -> Vec<T> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids.iter().filter_map(|id| table.get(id).cloned()).collect()
}

#[async_trait]
impl PlacementRepository for MemoryRepository {
    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        Ok(pick(&*self.users.read().await, ids))
    }

    async fn get_user(&self, id: i64) -> Result<User> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn put_user(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|existing| existing.id != user.id && existing.email == user.email)
        {
            return Err(StorageError::ConstraintViolation(format!(
                "email '{}' already in use",
                user.email
            )));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        Ok(self.companies.read().await.values().cloned().collect())
    }

    async fn companies_by_ids(&self, ids: &[i64]) -> Result<Vec<Company>> {
        Ok(pick(&*self.companies.read().await, ids))
    }

    async fn get_company(&self, id: i64) -> Result<Company> {
        self.companies
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn put_company(&self, company: Company) -> Result<Company> {
        self.companies
            .write()
            .await
            .insert(company.id, company.clone());
        Ok(company)
    }

    async fn list_internships(&self, filter: &InternshipFilter) -> Result<Vec<Internship>> {
        Ok(self
            .internships
            .read()
            .await
            .values()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect())
    }

    async fn internships_by_ids(&self, ids: &[i64]) -> Result<Vec<Internship>> {
        Ok(pick(&*self.internships.read().await, ids))
    }

    async fn get_internship(&self, id: i64) -> Result<Internship> {
        self.internships
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn put_internship(&self, internship: Internship) -> Result<Internship> {
        self.internships
            .write()
            .await
            .insert(internship.id, internship.clone());
        Ok(internship)
    }

    async fn list_evaluations(&self, filter: &EvaluationFilter) -> Result<Vec<Evaluation>> {
        Ok(self
            .evaluations
            .read()
            .await
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    async fn get_evaluation(&self, id: i64) -> Result<Evaluation> {
        self.evaluations
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn put_evaluation(&self, mut evaluation: Evaluation) -> Result<Evaluation> {
        evaluation.refresh_overall_rating();
        self.evaluations
            .write()
            .await
            .insert(evaluation.id, evaluation.clone());
        Ok(evaluation)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::{Category, EvaluationStatus, InternshipStatus};

    fn user(id: i64, email: &str, role: Role) -> User {
        User {
            id,
            first_name: "Test".to_string(),
            last_name: format!("User{id}"),
            email: email.to_string(),
            role,
            phone: None,
            created_at: NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn batch_lookup_skips_unknown_ids() {
        let repo = MemoryRepository::with_records(
            vec![
                user(1, "a@example.com", Role::Student),
                user(2, "b@example.com", Role::Supervisor),
            ],
            vec![],
            vec![],
            vec![],
        );

        let found = repo.users_by_ids(&[2, 99, 2, 1]).await.unwrap();
        let ids: Vec<i64> = found.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn get_missing_user_is_not_found() {
        let repo = MemoryRepository::new();
        assert!(matches!(
            repo.get_user(7).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = MemoryRepository::new();
        repo.put_user(user(1, "same@example.com", Role::Student))
            .await
            .unwrap();

        let err = repo
            .put_user(user(2, "same@example.com", Role::Student))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn list_by_role_filters() {
        let repo = MemoryRepository::with_records(
            vec![
                user(1, "a@example.com", Role::Student),
                user(2, "b@example.com", Role::Supervisor),
                user(3, "c@example.com", Role::Student),
            ],
            vec![],
            vec![],
            vec![],
        );

        let students = repo.list_users_by_role(Role::Student).await.unwrap();
        assert_eq!(students.len(), 2);
    }

    #[tokio::test]
    async fn put_evaluation_derives_overall_rating() {
        let repo = MemoryRepository::new();
        let evaluation = Evaluation {
            id: 1,
            internship_id: 1,
            evaluator_id: 2,
            student_id: 1,
            status: EvaluationStatus::Submitted,
            categories: vec![
                Category {
                    name: "Communication".to_string(),
                    rating: Decimal::from(4),
                    weight: Decimal::new(5, 1),
                    comment: None,
                },
                Category {
                    name: "Technical Skills".to_string(),
                    rating: Decimal::from(5),
                    weight: Decimal::new(5, 1),
                    comment: None,
                },
            ],
            overall_rating: None,
            comments: None,
            created_at: NaiveDate::from_ymd_opt(2026, 2, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        };

        let stored = repo.put_evaluation(evaluation).await.unwrap();
        assert_eq!(stored.overall_rating, Some(Decimal::new(45, 1)));

        let fetched = repo.get_evaluation(1).await.unwrap();
        assert_eq!(fetched.overall_rating, Some(Decimal::new(45, 1)));
    }

    fn internship(id: i64, company_id: i64, status: InternshipStatus) -> Internship {
        Internship {
            id,
            student_id: 1,
            company_id,
            supervisor_id: 2,
            status,
            position: "Data Intern".to_string(),
            department: None,
            start_date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
            created_at: NaiveDate::from_ymd_opt(2026, 1, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    fn draft(id: i64, internship_id: i64) -> Evaluation {
        Evaluation {
            id,
            internship_id,
            evaluator_id: 2,
            student_id: 1,
            status: EvaluationStatus::Draft,
            categories: Vec::new(),
            overall_rating: None,
            comments: None,
            created_at: NaiveDate::from_ymd_opt(2026, 3, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn internship_filter_combines_company_and_status() {
        let repo = MemoryRepository::with_records(
            vec![],
            vec![],
            vec![
                internship(1, 10, InternshipStatus::Active),
                internship(2, 10, InternshipStatus::Completed),
                internship(3, 11, InternshipStatus::Active),
            ],
            vec![],
        );

        let filter = InternshipFilter {
            company_id: Some(10),
            status: Some(InternshipStatus::Active),
            ..InternshipFilter::default()
        };
        let ids: Vec<i64> = repo
            .list_internships(&filter)
            .await
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![1]);

        let all = repo
            .list_internships(&InternshipFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn evaluation_filter_by_internship() {
        let repo = MemoryRepository::with_records(
            vec![],
            vec![],
            vec![],
            vec![draft(1, 5), draft(2, 6), draft(3, 5)],
        );

        let filter = EvaluationFilter {
            internship_id: Some(5),
            ..EvaluationFilter::default()
        };
        let ids: Vec<i64> = repo
            .list_evaluations(&filter)
            .await
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
