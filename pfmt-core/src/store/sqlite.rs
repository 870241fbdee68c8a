//! SQLite-backed project store.
//!
//! Timestamps are stored as fixed-precision RFC 3339 TEXT so `ORDER BY`
//! on them is chronological; `additional_team` is a JSON TEXT column.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::store::{ProjectFilter, ProjectStore};
use crate::types::{Project, ProjectUpdate, ReportStatus};

/// Project store backed by a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteProjectStore {
    pool: SqlitePool,
}

impl SqliteProjectStore {
    /// Open a database file, creating it and the schema if missing.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::with_pool(pool).await
    }

    /// Open a private in-memory database.
    ///
    /// The pool is capped at one connection: every SQLite `:memory:`
    /// connection is a separate database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::with_pool(pool).await
    }

    /// Wrap an existing pool, ensuring the schema.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self> {
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                status TEXT NOT NULL,
                phase TEXT NOT NULL,
                report_status TEXT NOT NULL,
                owner_id TEXT NOT NULL,
                taf REAL NOT NULL,
                eac REAL NOT NULL,
                current_year_cashflow REAL NOT NULL,
                target_cashflow REAL NOT NULL,
                total_budget REAL NOT NULL,
                amount_spent REAL NOT NULL,
                taf_eac_variance REAL NOT NULL,
                cashflow_variance REAL NOT NULL,
                submitted_by TEXT NOT NULL,
                submitted_date TEXT,
                approved_by TEXT NOT NULL,
                approved_date TEXT,
                director_approved INTEGER NOT NULL,
                senior_pm_reviewed INTEGER NOT NULL,
                submissions INTEGER NOT NULL,
                additional_team TEXT NOT NULL,
                comments TEXT NOT NULL,
                highlights TEXT NOT NULL,
                next_steps TEXT NOT NULL,
                taf_eac_variance_explanation TEXT NOT NULL,
                cashflow_variance_explanation TEXT NOT NULL,
                last_pfmt_update TEXT,
                pfmt_file_name TEXT NOT NULL,
                pfmt_extracted_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ProjectStore for SqliteProjectStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Project>> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| row_to_project(&row)).transpose()
    }

    async fn get_all(&self, filter: &ProjectFilter) -> Result<Vec<Project>> {
        let mut sql = String::from("SELECT * FROM projects");
        let mut clauses = Vec::new();
        if filter.owner_id.is_some() {
            clauses.push("owner_id = ?");
        }
        if filter.status.is_some() {
            clauses.push("status = ?");
        }
        if filter.report_status.is_some() {
            clauses.push("report_status = ?");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at, id");

        let mut query = sqlx::query(&sql);
        if let Some(owner_id) = &filter.owner_id {
            query = query.bind(owner_id.clone());
        }
        if let Some(status) = &filter.status {
            query = query.bind(status.clone());
        }
        if let Some(report_status) = filter.report_status {
            query = query.bind(report_status.label());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_project).collect()
    }

    async fn create(&self, project: Project) -> Result<Project> {
        let additional_team = encode_team(&project.additional_team)?;

        sqlx::query(
            r#"
            INSERT INTO projects (
                id, name, description, status, phase, report_status, owner_id,
                taf, eac, current_year_cashflow, target_cashflow, total_budget,
                amount_spent, taf_eac_variance, cashflow_variance,
                submitted_by, submitted_date, approved_by, approved_date,
                director_approved, senior_pm_reviewed, submissions,
                additional_team, comments, highlights, next_steps,
                taf_eac_variance_explanation, cashflow_variance_explanation,
                last_pfmt_update, pfmt_file_name, pfmt_extracted_at,
                created_at, updated_at
            ) VALUES (
                ?, ?, ?, ?, ?, ?, ?,
                ?, ?, ?, ?, ?,
                ?, ?, ?,
                ?, ?, ?, ?,
                ?, ?, ?,
                ?, ?, ?, ?,
                ?, ?,
                ?, ?, ?,
                ?, ?
            )
            "#,
        )
        .bind(project.id.to_string())
        .bind(project.name.clone())
        .bind(project.description.clone())
        .bind(project.status.clone())
        .bind(project.phase.clone())
        .bind(project.report_status.label())
        .bind(project.owner_id.clone())
        .bind(project.taf)
        .bind(project.eac)
        .bind(project.current_year_cashflow)
        .bind(project.target_cashflow)
        .bind(project.total_budget)
        .bind(project.amount_spent)
        .bind(project.taf_eac_variance)
        .bind(project.cashflow_variance)
        .bind(project.submitted_by.clone())
        .bind(project.submitted_date.map(|dt| format_timestamp(&dt)))
        .bind(project.approved_by.clone())
        .bind(project.approved_date.map(|dt| format_timestamp(&dt)))
        .bind(project.director_approved)
        .bind(project.senior_pm_reviewed)
        .bind(project.submissions)
        .bind(additional_team)
        .bind(project.comments.clone())
        .bind(project.highlights.clone())
        .bind(project.next_steps.clone())
        .bind(project.taf_eac_variance_explanation.clone())
        .bind(project.cashflow_variance_explanation.clone())
        .bind(project.last_pfmt_update.map(|dt| format_timestamp(&dt)))
        .bind(project.pfmt_file_name.clone())
        .bind(project.pfmt_extracted_at.map(|dt| format_timestamp(&dt)))
        .bind(format_timestamp(&project.created_at))
        .bind(format_timestamp(&project.updated_at))
        .execute(&self.pool)
        .await?;

        Ok(project)
    }

    async fn update(&self, id: Uuid, update: ProjectUpdate) -> Result<Project> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await?;
        let mut project = match row {
            Some(row) => row_to_project(&row)?,
            None => return Err(Error::NotFound(id)),
        };

        update.apply(&mut project);
        project.updated_at = Utc::now();
        let additional_team = encode_team(&project.additional_team)?;

        sqlx::query(
            r#"
            UPDATE projects SET
                name = ?, description = ?, status = ?, phase = ?,
                report_status = ?, owner_id = ?,
                taf = ?, eac = ?, current_year_cashflow = ?,
                target_cashflow = ?, total_budget = ?, amount_spent = ?,
                taf_eac_variance = ?, cashflow_variance = ?,
                submitted_by = ?, submitted_date = ?, approved_by = ?,
                approved_date = ?, director_approved = ?,
                senior_pm_reviewed = ?, submissions = ?, additional_team = ?,
                comments = ?, highlights = ?, next_steps = ?,
                taf_eac_variance_explanation = ?,
                cashflow_variance_explanation = ?,
                last_pfmt_update = ?, pfmt_file_name = ?,
                pfmt_extracted_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(project.name.clone())
        .bind(project.description.clone())
        .bind(project.status.clone())
        .bind(project.phase.clone())
        .bind(project.report_status.label())
        .bind(project.owner_id.clone())
        .bind(project.taf)
        .bind(project.eac)
        .bind(project.current_year_cashflow)
        .bind(project.target_cashflow)
        .bind(project.total_budget)
        .bind(project.amount_spent)
        .bind(project.taf_eac_variance)
        .bind(project.cashflow_variance)
        .bind(project.submitted_by.clone())
        .bind(project.submitted_date.map(|dt| format_timestamp(&dt)))
        .bind(project.approved_by.clone())
        .bind(project.approved_date.map(|dt| format_timestamp(&dt)))
        .bind(project.director_approved)
        .bind(project.senior_pm_reviewed)
        .bind(project.submissions)
        .bind(additional_team)
        .bind(project.comments.clone())
        .bind(project.highlights.clone())
        .bind(project.next_steps.clone())
        .bind(project.taf_eac_variance_explanation.clone())
        .bind(project.cashflow_variance_explanation.clone())
        .bind(project.last_pfmt_update.map(|dt| format_timestamp(&dt)))
        .bind(project.pfmt_file_name.clone())
        .bind(project.pfmt_extracted_at.map(|dt| format_timestamp(&dt)))
        .bind(format_timestamp(&project.updated_at))
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(project)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }
}

/// RFC 3339 with fixed microsecond precision; fixed width keeps TEXT
/// ordering chronological.
fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::invalid_data(format!("timestamp '{value}': {e}")))
}

fn parse_optional_timestamp(value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_timestamp(&v)).transpose()
}

fn encode_team(team: &[String]) -> Result<String> {
    serde_json::to_string(team).map_err(|e| Error::invalid_data(format!("additional_team: {e}")))
}

fn row_to_project(row: &SqliteRow) -> Result<Project> {
    let id: String = row.try_get("id")?;
    let report_status: String = row.try_get("report_status")?;
    let additional_team: String = row.try_get("additional_team")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Project {
        id: Uuid::parse_str(&id)
            .map_err(|e| Error::invalid_data(format!("project id '{id}': {e}")))?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        status: row.try_get("status")?,
        phase: row.try_get("phase")?,
        report_status: ReportStatus::parse(&report_status).ok_or_else(|| {
            Error::invalid_data(format!("unknown report status '{report_status}'"))
        })?,
        owner_id: row.try_get("owner_id")?,
        taf: row.try_get("taf")?,
        eac: row.try_get("eac")?,
        current_year_cashflow: row.try_get("current_year_cashflow")?,
        target_cashflow: row.try_get("target_cashflow")?,
        total_budget: row.try_get("total_budget")?,
        amount_spent: row.try_get("amount_spent")?,
        taf_eac_variance: row.try_get("taf_eac_variance")?,
        cashflow_variance: row.try_get("cashflow_variance")?,
        submitted_by: row.try_get("submitted_by")?,
        submitted_date: parse_optional_timestamp(row.try_get("submitted_date")?)?,
        approved_by: row.try_get("approved_by")?,
        approved_date: parse_optional_timestamp(row.try_get("approved_date")?)?,
        director_approved: row.try_get("director_approved")?,
        senior_pm_reviewed: row.try_get("senior_pm_reviewed")?,
        submissions: row.try_get("submissions")?,
        additional_team: serde_json::from_str(&additional_team)
            .map_err(|e| Error::invalid_data(format!("additional_team column: {e}")))?,
        comments: row.try_get("comments")?,
        highlights: row.try_get("highlights")?,
        next_steps: row.try_get("next_steps")?,
        taf_eac_variance_explanation: row.try_get("taf_eac_variance_explanation")?,
        cashflow_variance_explanation: row.try_get("cashflow_variance_explanation")?,
        last_pfmt_update: parse_optional_timestamp(row.try_get("last_pfmt_update")?)?,
        pfmt_file_name: row.try_get("pfmt_file_name")?,
        pfmt_extracted_at: parse_optional_timestamp(row.try_get("pfmt_extracted_at")?)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
