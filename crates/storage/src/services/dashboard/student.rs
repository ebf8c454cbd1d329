use rust_decimal::Decimal;

use crate::dto::decimal_to_f64;
use crate::dto::dashboard::{
    CategoryRating, EvaluationSummary, StudentEvaluation, StudentInternship, StudentOverview,
};
use crate::error::Result;
use crate::models::{Evaluation, Internship, InternshipStatus};
use crate::repository::{EvaluationFilter, InternshipFilter, PlacementRepository};
use crate::services::ranking::rank_descending;
use crate::services::rating::mean;
use crate::services::resolver::{EntityKind, EntityResolver, References};

/// The student's own evaluations, newest first. Nothing rated leaks out of
/// an evaluation until it has been reviewed.
pub fn build_student_evaluations(
    evaluations: &[Evaluation],
    resolver: &EntityResolver,
) -> Vec<StudentEvaluation> {
    let newest_first = rank_descending(evaluations.iter().collect(), |e: &&Evaluation| e.created_at);

    newest_first
        .into_iter()
        .map(|evaluation| {
            let visible = evaluation.is_reviewed();
            StudentEvaluation {
                id: evaluation.id,
                evaluator: resolver.user_name(EntityKind::Supervisor, evaluation.evaluator_id),
                date: evaluation.created_at.date(),
                overall_rating: visible.then(|| decimal_to_f64(evaluation.effective_rating())),
                status: evaluation.status,
                display_status: evaluation.status.into(),
                categories: if visible {
                    evaluation
                        .categories
                        .iter()
                        .map(|c| CategoryRating {
                            name: c.name.clone(),
                            rating: decimal_to_f64(c.rating),
                        })
                        .collect()
                } else {
                    Vec::new()
                },
                comments: if visible {
                    evaluation.comments.clone()
                } else {
                    None
                },
            }
        })
        .collect()
}

/// Picks the active internship, else the one that started last.
fn current_internship(internships: &[Internship]) -> Option<&Internship> {
    internships
        .iter()
        .find(|i| i.status == InternshipStatus::Active)
        .or_else(|| internships.iter().max_by_key(|i| i.start_date))
}

pub fn build_student_overview(
    internships: &[Internship],
    evaluations: &[Evaluation],
    resolver: &EntityResolver,
) -> StudentOverview {
    let internship = current_internship(internships).map(|i| StudentInternship {
        id: i.id,
        company: resolver.company_name(i.company_id),
        supervisor: resolver.user_name(EntityKind::Supervisor, i.supervisor_id),
        position: i.position.clone(),
        department: i.department.clone(),
        placement_status: i.status.into(),
        start_date: i.start_date,
        end_date: i.end_date,
        duration_weeks: i.duration_weeks(),
    });

    let reviewed: Vec<Decimal> = evaluations
        .iter()
        .filter(|e| e.is_reviewed())
        .map(Evaluation::effective_rating)
        .collect();

    StudentOverview {
        internship,
        evaluations: EvaluationSummary {
            total: evaluations.len(),
            reviewed: reviewed.len(),
            average_rating: decimal_to_f64(mean(&reviewed)),
        },
    }
}

pub async fn student_evaluations<R>(repo: &R, student_id: i64) -> Result<Vec<StudentEvaluation>>
where
    R: PlacementRepository + ?Sized,
{
    let evaluations = repo
        .list_evaluations(&EvaluationFilter::for_student(student_id))
        .await?;

    let refs = References {
        users: evaluations.iter().map(|e| e.evaluator_id).collect(),
        ..References::default()
    };
    let resolver = EntityResolver::load(repo, &refs).await?;

    tracing::debug!(
        student_id,
        evaluations = evaluations.len(),
        "Building student evaluation list"
    );

    Ok(build_student_evaluations(&evaluations, &resolver))
}

pub async fn student_overview<R>(repo: &R, student_id: i64) -> Result<StudentOverview>
where
    R: PlacementRepository + ?Sized,
{
    let internship_filter = InternshipFilter::for_student(student_id);
    let evaluation_filter = EvaluationFilter::for_student(student_id);

    let (internships, evaluations) = tokio::try_join!(
        repo.list_internships(&internship_filter),
        repo.list_evaluations(&evaluation_filter),
    )?;

    let refs = References {
        users: internships.iter().map(|i| i.supervisor_id).collect(),
        companies: internships.iter().map(|i| i.company_id).collect(),
        ..References::default()
    };
    let resolver = EntityResolver::load(repo, &refs).await?;

    tracing::debug!(
        student_id,
        internships = internships.len(),
        evaluations = evaluations.len(),
        "Building student overview"
    );

    Ok(build_student_overview(&internships, &evaluations, &resolver))
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::models::{EvaluationDisplayStatus, EvaluationStatus, PlacementStatus, Role};
    use crate::repository::memory::MemoryRepository;

    #[test]
    fn unreviewed_evaluations_hide_ratings() {
        let mut pending = evaluation(1, 1, 9, 1, EvaluationStatus::Submitted, Some("4.2"));
        pending.categories = vec![category("Communication", "4", "1")];
        pending.comments = Some("Strong start".to_string());
        pending.created_at = at(2026, 9, 1);

        let mut done = evaluation(2, 1, 9, 1, EvaluationStatus::Reviewed, Some("4.6"));
        done.categories = vec![category("Communication", "5", "1")];
        done.comments = Some("Excellent".to_string());
        done.created_at = at(2026, 10, 1);

        let resolver =
            EntityResolver::from_parts(vec![user(9, Role::Supervisor, at(2025, 1, 1))], vec![], vec![]);
        let list = build_student_evaluations(&[pending, done], &resolver);

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, 2);
        assert_eq!(list[0].overall_rating, Some(4.6));
        assert_eq!(list[0].categories.len(), 1);
        assert_eq!(list[0].comments.as_deref(), Some("Excellent"));
        assert_eq!(list[0].display_status, EvaluationDisplayStatus::Submitted);
        assert_eq!(list[0].evaluator, "First9 Last9");

        assert_eq!(list[1].id, 1);
        assert_eq!(list[1].overall_rating, None);
        assert!(list[1].categories.is_empty());
        assert_eq!(list[1].comments, None);
        assert_eq!(list[1].display_status, EvaluationDisplayStatus::UnderReview);
    }

    #[test]
    fn missing_evaluator_gets_fallback_name() {
        let list = build_student_evaluations(
            &[evaluation(1, 1, 404, 1, EvaluationStatus::Draft, None)],
            &EntityResolver::default(),
        );
        assert_eq!(list[0].evaluator, "Unknown Supervisor");
    }

    #[test]
    fn overview_prefers_active_internship() {
        let mut finished = internship(1, 1, 1, 9, InternshipStatus::Completed);
        finished.start_date = date(2026, 8, 1);
        let mut active = internship(2, 1, 2, 9, InternshipStatus::Active);
        active.start_date = date(2026, 1, 5);
        active.end_date = date(2026, 1, 20);

        let resolver = EntityResolver::from_parts(
            vec![user(9, Role::Supervisor, at(2025, 1, 1))],
            vec![company(1, "Acme"), company(2, "Globex")],
            vec![],
        );
        let overview = build_student_overview(&[finished, active], &[], &resolver);
        let internship = overview.internship.unwrap();

        assert_eq!(internship.id, 2);
        assert_eq!(internship.company, "Globex");
        assert_eq!(internship.supervisor, "First9 Last9");
        assert_eq!(internship.placement_status, PlacementStatus::Confirmed);
        assert_eq!(internship.duration_weeks, 3);
    }

    #[test]
    fn overview_summarises_reviewed_ratings() {
        let evaluations = vec![
            evaluation(1, 1, 9, 1, EvaluationStatus::Reviewed, Some("4.0")),
            evaluation(2, 1, 9, 1, EvaluationStatus::Reviewed, Some("5.0")),
            evaluation(3, 1, 9, 1, EvaluationStatus::Draft, Some("1.0")),
        ];

        let overview = build_student_overview(&[], &evaluations, &EntityResolver::default());
        assert!(overview.internship.is_none());
        assert_eq!(
            overview.evaluations,
            EvaluationSummary {
                total: 3,
                reviewed: 2,
                average_rating: 4.5
            }
        );
    }

    #[test]
    fn empty_overview() {
        let overview = build_student_overview(&[], &[], &EntityResolver::default());
        assert!(overview.internship.is_none());
        assert_eq!(overview.evaluations, EvaluationSummary::default());
    }

    #[tokio::test]
    async fn loads_only_own_records() {
        let repo = MemoryRepository::with_records(
            vec![
                user(1, Role::Student, at(2026, 1, 1)),
                user(2, Role::Student, at(2026, 1, 1)),
                user(9, Role::Supervisor, at(2026, 1, 1)),
            ],
            vec![company(1, "Acme")],
            vec![
                internship(1, 1, 1, 9, InternshipStatus::Active),
                internship(2, 2, 1, 9, InternshipStatus::Active),
            ],
            vec![
                evaluation(1, 1, 9, 1, EvaluationStatus::Reviewed, Some("4.0")),
                evaluation(2, 2, 9, 2, EvaluationStatus::Reviewed, Some("2.0")),
            ],
        );

        let overview = student_overview(&repo, 1).await.unwrap();
        assert_eq!(overview.internship.unwrap().company, "Acme");
        assert_eq!(overview.evaluations.total, 1);

        let evaluations = student_evaluations(&repo, 1).await.unwrap();
        assert_eq!(evaluations.len(), 1);
        assert_eq!(evaluations[0].evaluator, "First9 Last9");
    }
}
