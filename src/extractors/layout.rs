// src/extractors/layout.rs
//! Layout constants tied to the observed Markstrat team export.
//!
//! Every field has a default matching that export; a JSON file passed with
//! `--layout` can override any subset of them when a release moves things.

use crate::utils::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where the Product Contribution period tag is searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PeriodScope {
    /// Last "Period N" text anywhere in the sheet.
    #[default]
    Sheet,
    /// Last "Period N" inside the section window, falling back to the sheet.
    Window,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub sheet: String,
    pub product_contribution: ProductContributionLayout,
    pub company_pl: CompanyPlLayout,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProductContributionLayout {
    pub anchor: String,
    pub window_rows: usize,
    pub window_cols: usize,
    /// Window-relative column holding metric labels.
    pub label_col: usize,
    /// Case-insensitive substrings identifying metric rows.
    pub metrics: Vec<String>,
    pub unit_marker: String,
    /// Product tickers a row needs before it counts as the header row.
    pub min_product_columns: usize,
    pub period_scope: PeriodScope,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompanyPlLayout {
    pub anchor: String,
    pub window_rows: usize,
    pub window_cols: usize,
    /// Period labels a row needs before it counts as the header row.
    pub min_period_columns: usize,
    /// Case-insensitive row text that ends the statement block.
    pub terminators: Vec<String>,
    pub unit: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sheet: "Firm".to_string(),
            product_contribution: ProductContributionLayout::default(),
            company_pl: CompanyPlLayout::default(),
        }
    }
}

impl Default for ProductContributionLayout {
    fn default() -> Self {
        Self {
            anchor: "Product Contribution".to_string(),
            window_rows: 30,
            window_cols: 20,
            label_col: 3,
            metrics: [
                "Revenues",
                "Cost of goods sold",
                "Inventory holding costs",
                "Inventory selling costs",
                "Contribution before marketing",
                "Advertising media",
                "Advertising research",
                "Commercial team costs",
                "Contribution after marketing",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            unit_marker: "thousands of dollars".to_string(),
            min_product_columns: 2,
            period_scope: PeriodScope::Sheet,
        }
    }
}

impl Default for CompanyPlLayout {
    fn default() -> Self {
        Self {
            anchor: "Company Profit & Loss Statement".to_string(),
            window_rows: 60,
            window_cols: 40,
            min_period_columns: 3,
            terminators: vec!["market contribution".to_string(), "all numbers".to_string()],
            unit: "thousands of dollars".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Loads a layout file; missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read layout file {}: {}", path.display(), e))
        })?;
        let layout: LayoutConfig = serde_json::from_str(&text).map_err(|e| {
            AppError::Config(format!("Invalid layout file {}: {}", path.display(), e))
        })?;
        tracing::debug!("Loaded layout overrides from {}", path.display());
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_layout_keeps_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(
            &path,
            r#"{"sheet": "Firm B", "product_contribution": {"label_col": 4, "period_scope": "window"}}"#,
        )
        .unwrap();

        let layout = LayoutConfig::from_json_file(&path).expect("Layout should parse");
        assert_eq!(layout.sheet, "Firm B");
        assert_eq!(layout.product_contribution.label_col, 4);
        assert_eq!(layout.product_contribution.period_scope, PeriodScope::Window);
        assert_eq!(layout.product_contribution.window_rows, 30);
        assert_eq!(layout.product_contribution.metrics.len(), 9);
        assert_eq!(layout.company_pl, CompanyPlLayout::default());
    }

    #[test]
    fn test_invalid_layout_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = LayoutConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)), "Got {:?}", err);
    }
}
