use std::collections::HashSet;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::{TOP_COMPANIES, group_in_order, percent, start_of_day};
use crate::dto::decimal_to_f64;
use crate::dto::dashboard::{
    ActiveVsCompleted, CompanyPlacements, CompanyScore, CoordinatorAnalytics, SemesterGrowth,
};
use crate::error::Result;
use crate::models::{Evaluation, Internship, InternshipStatus, PlacementStatus, Role, User};
use crate::repository::{EvaluationFilter, InternshipFilter, PlacementRepository};
use crate::services::buckets::{Granularity, bucket};
use crate::services::ranking::top_n;
use crate::services::rating::mean;
use crate::services::resolver::{EntityKind, EntityResolver, References};

pub fn build_coordinator_analytics(
    students: &[User],
    internships: &[Internship],
    evaluations: &[Evaluation],
    resolver: &EntityResolver,
    now: NaiveDateTime,
) -> CoordinatorAnalytics {
    let internship_growth = bucket(
        internships.iter().map(|i| start_of_day(i.start_date)),
        Granularity::Semester,
        now,
    )
    .into_iter()
    .map(|b| SemesterGrowth {
        semester: b.label,
        internships: b.count,
    })
    .collect();

    let reviewed = evaluations.iter().filter(|e| e.is_reviewed()).count();

    CoordinatorAnalytics {
        internship_growth,
        placement_success_rate: placement_rate(students, internships),
        evaluation_completion_rate: percent(reviewed, evaluations.len()),
        placements_per_company: placements_per_company(internships, resolver),
        evaluation_scores_by_company: scores_by_company(evaluations, resolver),
        active_vs_completed: ActiveVsCompleted {
            active: count_status(internships, InternshipStatus::Active),
            completed: count_status(internships, InternshipStatus::Completed),
        },
    }
}

fn count_status(internships: &[Internship], status: InternshipStatus) -> usize {
    internships.iter().filter(|i| i.status == status).count()
}

/// Share of students with at least one confirmed placement. A student with
/// several confirmed internships is counted once.
fn placement_rate(students: &[User], internships: &[Internship]) -> u32 {
    let student_ids: HashSet<i64> = students.iter().map(|s| s.id).collect();
    let placed: HashSet<i64> = internships
        .iter()
        .filter(|i| PlacementStatus::from(i.status) == PlacementStatus::Confirmed)
        .map(|i| i.student_id)
        .filter(|id| student_ids.contains(id))
        .collect();

    percent(placed.len(), student_ids.len())
}

fn company_label(resolver: &EntityResolver, company_id: Option<i64>) -> String {
    match company_id {
        Some(id) => resolver.company_name(id),
        None => EntityKind::Company.fallback_label().to_string(),
    }
}

/// Placements per company. Internships whose company cannot be resolved are
/// pooled under the company fallback label.
fn placements_per_company(
    internships: &[Internship],
    resolver: &EntityResolver,
) -> Vec<CompanyPlacements> {
    let groups = group_in_order(
        internships
            .iter()
            .map(|i| (resolver.known_company(i.company_id), i.id)),
    );
    let counted: Vec<(Option<i64>, usize)> = groups
        .into_iter()
        .map(|(company_id, ids)| (company_id, ids.len()))
        .collect();

    top_n(counted, TOP_COMPANIES, |(_, placements)| *placements)
        .into_iter()
        .map(|(company_id, placements)| CompanyPlacements {
            company: company_label(resolver, company_id),
            placements,
        })
        .collect()
}

/// Joins reviewed evaluations to companies through their internship.
/// Evaluations whose internship or company cannot be resolved are pooled
/// under the company fallback label.
fn scores_by_company(evaluations: &[Evaluation], resolver: &EntityResolver) -> Vec<CompanyScore> {
    let groups = group_in_order(
        evaluations
            .iter()
            .filter(|e| e.is_reviewed())
            .map(|e| {
                (
                    resolver.company_of_internship(e.internship_id),
                    e.effective_rating(),
                )
            }),
    );

    let averaged: Vec<(Option<i64>, Decimal, usize)> = groups
        .into_iter()
        .map(|(company_id, ratings)| (company_id, mean(&ratings), ratings.len()))
        .collect();

    top_n(averaged, TOP_COMPANIES, |(_, average, _)| *average)
        .into_iter()
        .map(|(company_id, average, evaluation_count)| CompanyScore {
            company: company_label(resolver, company_id),
            average_score: decimal_to_f64(average),
            evaluation_count,
        })
        .collect()
}

pub async fn coordinator_analytics<R>(repo: &R, now: NaiveDateTime) -> Result<CoordinatorAnalytics>
where
    R: PlacementRepository + ?Sized,
{
    let internship_filter = InternshipFilter::default();
    let evaluation_filter = EvaluationFilter::default();

    let (students, internships, evaluations) = tokio::try_join!(
        repo.list_users_by_role(Role::Student),
        repo.list_internships(&internship_filter),
        repo.list_evaluations(&evaluation_filter),
    )?;

    let refs = References {
        companies: internships.iter().map(|i| i.company_id).collect(),
        ..References::default()
    };
    let resolver = EntityResolver::load(repo, &refs)
        .await?
        .with_internships(internships.iter().cloned());

    tracing::debug!(
        students = students.len(),
        internships = internships.len(),
        evaluations = evaluations.len(),
        "Building coordinator analytics"
    );

    Ok(build_coordinator_analytics(
        &students,
        &internships,
        &evaluations,
        &resolver,
        now,
    ))
}
