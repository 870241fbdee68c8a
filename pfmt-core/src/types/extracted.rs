//! Per-ingestion extraction results and derived variances.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Financial figures read from the fixed workbook cells.
///
/// Lives only for the duration of one ingestion call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Figures {
    pub taf: f64,
    pub eac: f64,
    pub current_year_cashflow: f64,
    pub current_year_target: f64,
}

impl Figures {
    /// Derived variance pair, recomputed on every ingestion.
    pub fn variances(&self) -> Variances {
        Variances {
            taf_eac: self.eac - self.taf,
            cashflow: self.current_year_cashflow - self.current_year_target,
        }
    }
}

/// Variance pair derived from extracted figures.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Variances {
    /// eac - taf
    pub taf_eac: f64,
    /// currentYearCashflow - currentYearTarget
    pub cashflow: f64,
}

/// Summary of one workbook ingestion, returned alongside the merged record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedData {
    pub taf: f64,
    pub eac: f64,
    pub current_year_cashflow: f64,
    pub current_year_target: f64,
    pub taf_eac_variance: f64,
    pub cashflow_variance: f64,
    pub file_name: String,
    pub extracted_at: DateTime<Utc>,
}

impl ExtractedData {
    /// Combine the raw figures with their variances and provenance.
    pub fn from_figures(
        figures: Figures,
        file_name: impl Into<String>,
        extracted_at: DateTime<Utc>,
    ) -> Self {
        let variances = figures.variances();
        Self {
            taf: figures.taf,
            eac: figures.eac,
            current_year_cashflow: figures.current_year_cashflow,
            current_year_target: figures.current_year_target,
            taf_eac_variance: variances.taf_eac,
            cashflow_variance: variances.cashflow,
            file_name: file_name.into(),
            extracted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variances_exact() {
        let figures = Figures {
            taf: 1000.0,
            eac: 1250.5,
            current_year_cashflow: 300.0,
            current_year_target: 450.0,
        };

        let variances = figures.variances();
        assert_eq!(variances.taf_eac, 250.5);
        assert_eq!(variances.cashflow, -150.0);
    }

    #[test]
    fn test_variances_of_zero_figures() {
        let variances = Figures::default().variances();
        assert_eq!(variances.taf_eac, 0.0);
        assert_eq!(variances.cashflow, 0.0);
    }

    #[test]
    fn test_from_figures_carries_everything() {
        let figures = Figures {
            taf: 10.0,
            eac: 4.0,
            current_year_cashflow: 8.0,
            current_year_target: 3.0,
        };
        let extracted_at = Utc::now();

        let data = ExtractedData::from_figures(figures, "q2.xlsx", extracted_at);

        assert_eq!(data.taf, 10.0);
        assert_eq!(data.eac, 4.0);
        assert_eq!(data.taf_eac_variance, -6.0);
        assert_eq!(data.cashflow_variance, 5.0);
        assert_eq!(data.file_name, "q2.xlsx");
        assert_eq!(data.extracted_at, extracted_at);
    }

    #[test]
    fn test_extracted_data_serializes_camel_case() {
        let data = ExtractedData::from_figures(Figures::default(), "f.xlsx", Utc::now());
        let json = serde_json::to_value(&data).unwrap();

        assert!(json.get("currentYearTarget").is_some());
        assert!(json.get("tafEacVariance").is_some());
        assert!(json.get("fileName").is_some());
        assert!(json.get("extractedAt").is_some());
    }
}
