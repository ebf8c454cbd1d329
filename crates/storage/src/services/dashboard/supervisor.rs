use std::collections::HashSet;

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::{TOP_INTERNS, group_in_order};
use crate::dto::decimal_to_f64;
use crate::dto::dashboard::{
    CriteriaAverage, ScoreBucket, SupervisorAnalytics, SupervisorOverview, TopIntern,
    WeeklyActivity,
};
use crate::error::Result;
use crate::models::{Evaluation, EvaluationStatus, Internship, InternshipStatus};
use crate::repository::{EvaluationFilter, InternshipFilter, PlacementRepository};
use crate::services::buckets::{DASHBOARD_WEEKS, Granularity, bucket};
use crate::services::ranking::top_n;
use crate::services::rating::mean;
use crate::services::resolver::{EntityKind, EntityResolver, References};

fn weekly_activity(evaluations: &[Evaluation], weeks: u32, now: NaiveDateTime) -> Vec<WeeklyActivity> {
    bucket(
        evaluations.iter().map(|e| e.created_at),
        Granularity::Week(weeks),
        now,
    )
    .into_iter()
    .map(|b| WeeklyActivity {
        week: b.label,
        evaluations: b.count,
    })
    .collect()
}

/// Headline numbers for one supervisor. `internships` and `evaluations` must
/// already be scoped to that supervisor.
pub fn build_supervisor_overview(
    internships: &[Internship],
    evaluations: &[Evaluation],
    now: NaiveDateTime,
) -> SupervisorOverview {
    let active_interns: HashSet<i64> = internships
        .iter()
        .filter(|i| i.status == InternshipStatus::Active)
        .map(|i| i.student_id)
        .collect();

    let pending_evaluations = evaluations
        .iter()
        .filter(|e| matches!(e.status, EvaluationStatus::Draft | EvaluationStatus::Submitted))
        .count();

    SupervisorOverview {
        active_interns: active_interns.len(),
        pending_evaluations,
        reviewed_evaluations: evaluations.iter().filter(|e| e.is_reviewed()).count(),
        weekly_activity: weekly_activity(evaluations, DASHBOARD_WEEKS, now),
    }
}

pub fn build_supervisor_analytics(
    evaluations: &[Evaluation],
    resolver: &EntityResolver,
    weeks: u32,
    now: NaiveDateTime,
) -> SupervisorAnalytics {
    let reviewed: Vec<&Evaluation> = evaluations.iter().filter(|e| e.is_reviewed()).collect();

    SupervisorAnalytics {
        weekly_activity: weekly_activity(evaluations, weeks, now),
        top_interns: top_interns(&reviewed, resolver),
        average_by_criteria: average_by_criteria(&reviewed),
        score_distribution: score_distribution(&reviewed),
    }
}

fn top_interns(reviewed: &[&Evaluation], resolver: &EntityResolver) -> Vec<TopIntern> {
    let averaged: Vec<(i64, Decimal, usize)> =
        group_in_order(reviewed.iter().map(|e| (e.student_id, e.effective_rating())))
            .into_iter()
            .map(|(student_id, ratings)| (student_id, mean(&ratings), ratings.len()))
            .collect();

    top_n(averaged, TOP_INTERNS, |(_, average, _)| *average)
        .into_iter()
        .map(|(student_id, average, evaluation_count)| TopIntern {
            name: resolver.user_name(EntityKind::Student, student_id),
            average_rating: decimal_to_f64(average),
            evaluation_count,
        })
        .collect()
}

fn average_by_criteria(reviewed: &[&Evaluation]) -> Vec<CriteriaAverage> {
    let ratings = reviewed
        .iter()
        .flat_map(|e| e.categories.iter())
        .map(|c| (c.name.clone(), c.rating));

    group_in_order(ratings)
        .into_iter()
        .map(|(criteria, ratings)| CriteriaAverage {
            criteria,
            average: decimal_to_f64(mean(&ratings)),
        })
        .collect()
}

/// Histogram of whole-star ratings. Every star from 1 to 5 is present; values
/// outside that range are clamped into the nearest end.
fn score_distribution(reviewed: &[&Evaluation]) -> Vec<ScoreBucket> {
    let mut counts = [0usize; 5];

    for evaluation in reviewed {
        let stars = evaluation
            .effective_rating()
            .clamp(Decimal::ONE, Decimal::from(5))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_usize()
            .unwrap_or(1);
        counts[stars - 1] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(index, count)| ScoreBucket {
            rating: index as u8 + 1,
            count: *count,
        })
        .collect()
}

pub async fn supervisor_overview<R>(
    repo: &R,
    supervisor_id: i64,
    now: NaiveDateTime,
) -> Result<SupervisorOverview>
where
    R: PlacementRepository + ?Sized,
{
    let internship_filter = InternshipFilter::for_supervisor(supervisor_id);
    let evaluation_filter = EvaluationFilter::for_evaluator(supervisor_id);

    let (internships, evaluations) = tokio::try_join!(
        repo.list_internships(&internship_filter),
        repo.list_evaluations(&evaluation_filter),
    )?;

    tracing::debug!(
        supervisor_id,
        internships = internships.len(),
        evaluations = evaluations.len(),
        "Building supervisor overview"
    );

    Ok(build_supervisor_overview(&internships, &evaluations, now))
}

pub async fn supervisor_analytics<R>(
    repo: &R,
    supervisor_id: i64,
    weeks: u32,
    now: NaiveDateTime,
) -> Result<SupervisorAnalytics>
where
    R: PlacementRepository + ?Sized,
{
    let evaluations = repo
        .list_evaluations(&EvaluationFilter::for_evaluator(supervisor_id))
        .await?;

    let refs = References {
        users: evaluations
            .iter()
            .filter(|e| e.is_reviewed())
            .map(|e| e.student_id)
            .collect(),
        ..References::default()
    };
    let resolver = EntityResolver::load(repo, &refs).await?;

    tracing::debug!(
        supervisor_id,
        evaluations = evaluations.len(),
        weeks,
        "Building supervisor analytics"
    );

    Ok(build_supervisor_analytics(&evaluations, &resolver, weeks, now))
}
