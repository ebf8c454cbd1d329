use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, QueryBuilder};

use super::{EvaluationFilter, InternshipFilter, PlacementRepository};
use crate::error::{Result, StorageError};
use crate::models::{Category, Company, Evaluation, Internship, Role, User};

const USER_COLUMNS: &str = "id, first_name, last_name, email, role, phone, created_at";
const COMPANY_COLUMNS: &str = "id, name, city, country, created_at";
const INTERNSHIP_COLUMNS: &str = "id, student_id, company_id, supervisor_id, status, position, \
     department, start_date, end_date, created_at";
const EVALUATION_COLUMNS: &str = "id, internship_id, evaluator_id, student_id, status, \
     categories, overall_rating, comments, created_at";

#[derive(FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    role: String,
    phone: Option<String>,
    created_at: NaiveDateTime,
}

impl TryFrom<UserRow> for User {
    type Error = StorageError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            role: row.role.parse()?,
            phone: row.phone,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct InternshipRow {
    id: i64,
    student_id: i64,
    company_id: i64,
    supervisor_id: i64,
    status: String,
    position: String,
    department: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    created_at: NaiveDateTime,
}

impl TryFrom<InternshipRow> for Internship {
    type Error = StorageError;

    fn try_from(row: InternshipRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            student_id: row.student_id,
            company_id: row.company_id,
            supervisor_id: row.supervisor_id,
            status: row.status.parse()?,
            position: row.position,
            department: row.department,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct EvaluationRow {
    id: i64,
    internship_id: i64,
    evaluator_id: i64,
    student_id: i64,
    status: String,
    categories: Json<Vec<Category>>,
    overall_rating: Option<Decimal>,
    comments: Option<String>,
    created_at: NaiveDateTime,
}

impl TryFrom<EvaluationRow> for Evaluation {
    type Error = StorageError;

    fn try_from(row: EvaluationRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            internship_id: row.internship_id,
            evaluator_id: row.evaluator_id,
            student_id: row.student_id,
            status: row.status.parse()?,
            categories: row.categories.0,
            overall_rating: row.overall_rating,
            comments: row.comments,
            created_at: row.created_at,
        })
    }
}

fn convert<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = StorageError>,
{
    rows.into_iter().map(T::try_from).collect()
}

pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlacementRepository for PgRepository {
    async fn list_users(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        convert(rows)
    }

    async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY id"
        ))
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await?;
        convert(rows)
    }

    async fn users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1) ORDER BY id"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        convert(rows)
    }

    async fn get_user(&self, id: i64) -> Result<User> {
        let row: UserRow =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(StorageError::NotFound)?;
        row.try_into()
    }

    async fn put_user(&self, user: User) -> Result<User> {
        let row: UserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO users (id, first_name, last_name, email, role, phone, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.phone)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::from(e).into_constraint("user"))?;
        row.try_into()
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    async fn companies_by_ids(&self, ids: &[i64]) -> Result<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ANY($1) ORDER BY id"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    async fn get_company(&self, id: i64) -> Result<Company> {
        sqlx::query_as::<_, Company>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    async fn put_company(&self, company: Company) -> Result<Company> {
        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            INSERT INTO companies (id, name, city, country, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name, city = EXCLUDED.city, country = EXCLUDED.country
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.city)
        .bind(&company.country)
        .bind(company.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::from(e).into_constraint("company"))?;
        Ok(company)
    }

    async fn list_internships(&self, filter: &InternshipFilter) -> Result<Vec<Internship>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {INTERNSHIP_COLUMNS} FROM internships WHERE 1=1"
        ));

        if let Some(student_id) = filter.student_id {
            query.push(" AND student_id = ");
            query.push_bind(student_id);
        }

        if let Some(supervisor_id) = filter.supervisor_id {
            query.push(" AND supervisor_id = ");
            query.push_bind(supervisor_id);
        }

        if let Some(company_id) = filter.company_id {
            query.push(" AND company_id = ");
            query.push_bind(company_id);
        }

        if let Some(status) = filter.status {
            query.push(" AND status = ");
            query.push_bind(status.as_str());
        }

        query.push(" ORDER BY id");

        let rows: Vec<InternshipRow> = query.build_query_as().fetch_all(&self.pool).await?;
        convert(rows)
    }

    async fn internships_by_ids(&self, ids: &[i64]) -> Result<Vec<Internship>> {
        let rows: Vec<InternshipRow> = sqlx::query_as(&format!(
            "SELECT {INTERNSHIP_COLUMNS} FROM internships WHERE id = ANY($1) ORDER BY id"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        convert(rows)
    }

    async fn get_internship(&self, id: i64) -> Result<Internship> {
        let row: InternshipRow = sqlx::query_as(&format!(
            "SELECT {INTERNSHIP_COLUMNS} FROM internships WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;
        row.try_into()
    }

    async fn put_internship(&self, internship: Internship) -> Result<Internship> {
        let row: InternshipRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO internships
                (id, student_id, company_id, supervisor_id, status, position,
                 department, start_date, end_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE
            SET company_id = EXCLUDED.company_id,
                supervisor_id = EXCLUDED.supervisor_id,
                status = EXCLUDED.status,
                position = EXCLUDED.position,
                department = EXCLUDED.department,
                start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date
            RETURNING {INTERNSHIP_COLUMNS}
            "#
        ))
        .bind(internship.id)
        .bind(internship.student_id)
        .bind(internship.company_id)
        .bind(internship.supervisor_id)
        .bind(internship.status.as_str())
        .bind(&internship.position)
        .bind(&internship.department)
        .bind(internship.start_date)
        .bind(internship.end_date)
        .bind(internship.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::from(e).into_constraint("internship"))?;
        row.try_into()
    }

    async fn list_evaluations(&self, filter: &EvaluationFilter) -> Result<Vec<Evaluation>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {EVALUATION_COLUMNS} FROM evaluations WHERE 1=1"
        ));

        if let Some(evaluator_id) = filter.evaluator_id {
            query.push(" AND evaluator_id = ");
            query.push_bind(evaluator_id);
        }

        if let Some(student_id) = filter.student_id {
            query.push(" AND student_id = ");
            query.push_bind(student_id);
        }

        if let Some(internship_id) = filter.internship_id {
            query.push(" AND internship_id = ");
            query.push_bind(internship_id);
        }

        query.push(" ORDER BY id");

        let rows: Vec<EvaluationRow> = query.build_query_as().fetch_all(&self.pool).await?;
        convert(rows)
    }

    async fn get_evaluation(&self, id: i64) -> Result<Evaluation> {
        let row: EvaluationRow = sqlx::query_as(&format!(
            "SELECT {EVALUATION_COLUMNS} FROM evaluations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;
        row.try_into()
    }

    async fn put_evaluation(&self, mut evaluation: Evaluation) -> Result<Evaluation> {
        evaluation.refresh_overall_rating();

        let row: EvaluationRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO evaluations
                (id, internship_id, evaluator_id, student_id, status,
                 categories, overall_rating, comments, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE
            SET status = EXCLUDED.status,
                categories = EXCLUDED.categories,
                overall_rating = EXCLUDED.overall_rating,
                comments = EXCLUDED.comments
            RETURNING {EVALUATION_COLUMNS}
            "#
        ))
        .bind(evaluation.id)
        .bind(evaluation.internship_id)
        .bind(evaluation.evaluator_id)
        .bind(evaluation.student_id)
        .bind(evaluation.status.as_str())
        .bind(Json(&evaluation.categories))
        .bind(evaluation.overall_rating)
        .bind(&evaluation.comments)
        .bind(evaluation.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StorageError::from(e).into_constraint("evaluation"))?;
        row.try_into()
    }
}
