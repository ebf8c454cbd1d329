use std::collections::{BTreeSet, HashMap};

use crate::error::Result;
use crate::models::{Company, Internship, User};
use crate::repository::PlacementRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Student,
    Supervisor,
    Company,
    Internship,
}

impl EntityKind {
    pub fn fallback_label(&self) -> &'static str {
        match self {
            Self::Student => "Unknown Student",
            Self::Supervisor => "Unknown Supervisor",
            Self::Company => "Unknown Company",
            Self::Internship => "Unknown Internship",
        }
    }
}

#[derive(Debug)]
pub enum Resolved<'a, T> {
    Found(&'a T),
    Missing(EntityKind),
}

impl<'a, T> Resolved<'a, T> {
    pub fn found(self) -> Option<&'a T> {
        match self {
            Self::Found(entity) => Some(entity),
            Self::Missing(_) => None,
        }
    }

    /// Display label for the entity, or the kind's fixed fallback.
    pub fn label_with(self, label: impl FnOnce(&T) -> String) -> String {
        match self {
            Self::Found(entity) => label(entity),
            Self::Missing(kind) => kind.fallback_label().to_string(),
        }
    }
}

/// Foreign key sets gathered from a slice before the enrichment fetch.
#[derive(Debug, Default, Clone)]
pub struct References {
    pub users: BTreeSet<i64>,
    pub companies: BTreeSet<i64>,
    pub internships: BTreeSet<i64>,
}

impl References {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.companies.is_empty() && self.internships.is_empty()
    }
}

/// In-memory join index built from one batch fetch per entity kind.
#[derive(Debug, Default)]
pub struct EntityResolver {
    users: HashMap<i64, User>,
    companies: HashMap<i64, Company>,
    internships: HashMap<i64, Internship>,
}

impl EntityResolver {
    pub fn from_parts(
        users: impl IntoIterator<Item = User>,
        companies: impl IntoIterator<Item = Company>,
        internships: impl IntoIterator<Item = Internship>,
    ) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            companies: companies.into_iter().map(|c| (c.id, c)).collect(),
            internships: internships.into_iter().map(|i| (i.id, i)).collect(),
        }
    }

    /// Fetches every referenced entity with one concurrent batch read per
    /// kind. Ids that do not resolve are simply absent from the index.
    pub async fn load<R>(repo: &R, refs: &References) -> Result<Self>
    where
        R: PlacementRepository + ?Sized,
    {
        if refs.is_empty() {
            return Ok(Self::default());
        }

        let user_ids: Vec<i64> = refs.users.iter().copied().collect();
        let company_ids: Vec<i64> = refs.companies.iter().copied().collect();
        let internship_ids: Vec<i64> = refs.internships.iter().copied().collect();

        let (users, companies, internships) = tokio::try_join!(
            fetch_if_any(&user_ids, |ids| repo.users_by_ids(ids)),
            fetch_if_any(&company_ids, |ids| repo.companies_by_ids(ids)),
            fetch_if_any(&internship_ids, |ids| repo.internships_by_ids(ids)),
        )?;

        let resolver = Self::from_parts(users, companies, internships);
        let missing = (user_ids.len() - resolver.users.len())
            + (company_ids.len() - resolver.companies.len())
            + (internship_ids.len() - resolver.internships.len());
        if missing > 0 {
            tracing::debug!(missing, "Unresolved references will use fallback labels");
        }

        Ok(resolver)
    }

    /// Adds internships fetched elsewhere so multi-hop joins avoid a second
    /// round trip.
    pub fn with_internships(mut self, internships: impl IntoIterator<Item = Internship>) -> Self {
        self.internships
            .extend(internships.into_iter().map(|i| (i.id, i)));
        self
    }

    pub fn user(&self, kind: EntityKind, id: i64) -> Resolved<'_, User> {
        self.users
            .get(&id)
            .map_or(Resolved::Missing(kind), Resolved::Found)
    }

    pub fn company(&self, id: i64) -> Resolved<'_, Company> {
        self.companies
            .get(&id)
            .map_or(Resolved::Missing(EntityKind::Company), Resolved::Found)
    }

    pub fn internship(&self, id: i64) -> Resolved<'_, Internship> {
        self.internships
            .get(&id)
            .map_or(Resolved::Missing(EntityKind::Internship), Resolved::Found)
    }

    pub fn user_name(&self, kind: EntityKind, id: i64) -> String {
        self.user(kind, id).label_with(User::full_name)
    }

    pub fn company_name(&self, id: i64) -> String {
        self.company(id).label_with(|c| c.name.clone())
    }

    /// `Some(company_id)` only when the company itself resolves, so every
    /// unresolvable id collapses onto the same `None` key.
    pub fn known_company(&self, company_id: i64) -> Option<i64> {
        self.company(company_id).found().map(|c| c.id)
    }

    /// Evaluation → internship → company, `None` when any hop is missing.
    pub fn company_of_internship(&self, internship_id: i64) -> Option<i64> {
        self.internship(internship_id)
            .found()
            .and_then(|i| self.known_company(i.company_id))
    }
}

async fn fetch_if_any<'a, T, F, Fut>(ids: &'a [i64], fetch: F) -> Result<Vec<T>>
where
    F: FnOnce(&'a [i64]) -> Fut,
    Fut: std::future::Future<Output = Result<Vec<T>>>,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    fetch(ids).await
}
