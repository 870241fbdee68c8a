//! Project record, creation template, and partial-update payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a project's financial figures are current or need a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportStatus {
    /// Figures have not been refreshed this reporting cycle.
    #[default]
    #[serde(rename = "Update Required")]
    UpdateRequired,
    /// Figures were refreshed by a workbook ingestion.
    #[serde(rename = "Current")]
    Current,
}

impl ReportStatus {
    /// Human-readable label, also the stored representation.
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::UpdateRequired => "Update Required",
            ReportStatus::Current => "Current",
        }
    }

    /// Parse a stored label back into the enum.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Update Required" => Some(ReportStatus::UpdateRequired),
            "Current" => Some(ReportStatus::Current),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A project record.
///
/// Every field is always present: creation fills the whole record from a
/// [`ProjectTemplate`], so partial input never leaves gaps. Financial fields
/// hold finite numbers on every write path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: String,
    pub phase: String,
    pub report_status: ReportStatus,
    /// Empty when the project is unowned.
    pub owner_id: String,

    /// Total Approved Funding.
    pub taf: f64,
    /// Estimate at Completion.
    pub eac: f64,
    pub current_year_cashflow: f64,
    /// Planned spend for the current reporting year.
    pub target_cashflow: f64,
    pub total_budget: f64,
    pub amount_spent: f64,
    /// eac - taf, snapshotted at the last ingestion.
    pub taf_eac_variance: f64,
    /// currentYearCashflow - targetCashflow, snapshotted at the last ingestion.
    pub cashflow_variance: f64,

    pub submitted_by: String,
    pub submitted_date: Option<DateTime<Utc>>,
    pub approved_by: String,
    pub approved_date: Option<DateTime<Utc>>,
    pub director_approved: bool,
    pub senior_pm_reviewed: bool,
    pub submissions: u32,
    pub additional_team: Vec<String>,

    pub comments: String,
    pub highlights: String,
    pub next_steps: String,
    pub taf_eac_variance_explanation: String,
    pub cashflow_variance_explanation: String,

    /// When a workbook ingestion last touched this record.
    pub last_pfmt_update: Option<DateTime<Utc>>,
    /// File name of the last ingested workbook.
    pub pfmt_file_name: String,
    pub pfmt_extracted_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable field template applied to every newly created project.
///
/// Injected into [`crate::ProjectService`] at construction; the standard
/// template starts projects active with a stale report.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectTemplate {
    pub status: String,
    pub phase: String,
    pub report_status: ReportStatus,
}

impl ProjectTemplate {
    /// The stock template.
    pub fn standard() -> Self {
        Self {
            status: "Active".to_string(),
            phase: String::new(),
            report_status: ReportStatus::UpdateRequired,
        }
    }

    /// Materialize a record with every field set to a type-correct
    /// zero/empty value plus this template's values.
    ///
    /// The caller owns assigning a real id; timestamps start at now.
    pub fn blank_project(&self) -> Project {
        let now = Utc::now();
        Project {
            id: Uuid::nil(),
            name: String::new(),
            description: String::new(),
            status: self.status.clone(),
            phase: self.phase.clone(),
            report_status: self.report_status,
            owner_id: String::new(),
            taf: 0.0,
            eac: 0.0,
            current_year_cashflow: 0.0,
            target_cashflow: 0.0,
            total_budget: 0.0,
            amount_spent: 0.0,
            taf_eac_variance: 0.0,
            cashflow_variance: 0.0,
            submitted_by: String::new(),
            submitted_date: None,
            approved_by: String::new(),
            approved_date: None,
            director_approved: false,
            senior_pm_reviewed: false,
            submissions: 0,
            additional_team: Vec::new(),
            comments: String::new(),
            highlights: String::new(),
            next_steps: String::new(),
            taf_eac_variance_explanation: String::new(),
            cashflow_variance_explanation: String::new(),
            last_pfmt_update: None,
            pfmt_file_name: String::new(),
            pfmt_extracted_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for ProjectTemplate {
    fn default() -> Self {
        Self::standard()
    }
}

/// Partial-update payload: only the set fields are written.
///
/// Doubles as the creation payload, laid over the template after `name`
/// and `description` are validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_status: Option<ReportStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taf: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eac: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_year_cashflow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_cashflow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_spent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taf_eac_variance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cashflow_variance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director_approved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub senior_pm_reviewed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submissions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_team: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taf_eac_variance_explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cashflow_variance_explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_pfmt_update: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pfmt_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pfmt_extracted_at: Option<DateTime<Utc>>,
}

impl ProjectUpdate {
    /// Overwrite exactly the set fields of `project`.
    pub fn apply(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(status) = &self.status {
            project.status = status.clone();
        }
        if let Some(phase) = &self.phase {
            project.phase = phase.clone();
        }
        if let Some(report_status) = self.report_status {
            project.report_status = report_status;
        }
        if let Some(owner_id) = &self.owner_id {
            project.owner_id = owner_id.clone();
        }
        if let Some(taf) = self.taf {
            project.taf = taf;
        }
        if let Some(eac) = self.eac {
            project.eac = eac;
        }
        if let Some(current_year_cashflow) = self.current_year_cashflow {
            project.current_year_cashflow = current_year_cashflow;
        }
        if let Some(target_cashflow) = self.target_cashflow {
            project.target_cashflow = target_cashflow;
        }
        if let Some(total_budget) = self.total_budget {
            project.total_budget = total_budget;
        }
        if let Some(amount_spent) = self.amount_spent {
            project.amount_spent = amount_spent;
        }
        if let Some(taf_eac_variance) = self.taf_eac_variance {
            project.taf_eac_variance = taf_eac_variance;
        }
        if let Some(cashflow_variance) = self.cashflow_variance {
            project.cashflow_variance = cashflow_variance;
        }
        if let Some(submitted_by) = &self.submitted_by {
            project.submitted_by = submitted_by.clone();
        }
        if let Some(submitted_date) = self.submitted_date {
            project.submitted_date = Some(submitted_date);
        }
        if let Some(approved_by) = &self.approved_by {
            project.approved_by = approved_by.clone();
        }
        if let Some(approved_date) = self.approved_date {
            project.approved_date = Some(approved_date);
        }
        if let Some(director_approved) = self.director_approved {
            project.director_approved = director_approved;
        }
        if let Some(senior_pm_reviewed) = self.senior_pm_reviewed {
            project.senior_pm_reviewed = senior_pm_reviewed;
        }
        if let Some(submissions) = self.submissions {
            project.submissions = submissions;
        }
        if let Some(additional_team) = &self.additional_team {
            project.additional_team = additional_team.clone();
        }
        if let Some(comments) = &self.comments {
            project.comments = comments.clone();
        }
        if let Some(highlights) = &self.highlights {
            project.highlights = highlights.clone();
        }
        if let Some(next_steps) = &self.next_steps {
            project.next_steps = next_steps.clone();
        }
        if let Some(explanation) = &self.taf_eac_variance_explanation {
            project.taf_eac_variance_explanation = explanation.clone();
        }
        if let Some(explanation) = &self.cashflow_variance_explanation {
            project.cashflow_variance_explanation = explanation.clone();
        }
        if let Some(last_pfmt_update) = self.last_pfmt_update {
            project.last_pfmt_update = Some(last_pfmt_update);
        }
        if let Some(pfmt_file_name) = &self.pfmt_file_name {
            project.pfmt_file_name = pfmt_file_name.clone();
        }
        if let Some(pfmt_extracted_at) = self.pfmt_extracted_at {
            project.pfmt_extracted_at = Some(pfmt_extracted_at);
        }
    }

    /// Names of financial fields set to a non-finite value, if any.
    pub fn non_finite_fields(&self) -> Vec<&'static str> {
        let figures = [
            ("taf", self.taf),
            ("eac", self.eac),
            ("currentYearCashflow", self.current_year_cashflow),
            ("targetCashflow", self.target_cashflow),
            ("totalBudget", self.total_budget),
            ("amountSpent", self.amount_spent),
            ("tafEacVariance", self.taf_eac_variance),
            ("cashflowVariance", self.cashflow_variance),
        ];

        figures
            .into_iter()
            .filter_map(|(name, value)| match value {
                Some(v) if !v.is_finite() => Some(name),
                _ => None,
            })
            .collect()
    }
}
