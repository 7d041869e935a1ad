// src/storage/mod.rs
use crate::extractors::record::{PeriodLabel, Section, SectionExtraction, TidyRecord};
use crate::utils::error::StorageError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const PRODUCT_CONTRIBUTION_FILE: &str = "product_contribution_tidy.csv";
pub const COMPANY_PL_FILE: &str = "firm_company_pl.csv";

const PRODUCT_CONTRIBUTION_HEADER: [&str; 9] =
    ["section", "period", "product", "metric", "value", "unit", "sheet", "row", "col"];
const COMPANY_PL_HEADER: [&str; 8] =
    ["section", "metric", "period", "value", "unit", "sheet", "row", "col"];

#[derive(Serialize)]
struct ProductContributionRow<'a> {
    section: Section,
    period: Option<PeriodLabel>,
    product: Option<&'a str>,
    metric: &'a str,
    value: f64,
    unit: Option<&'a str>,
    sheet: &'a str,
    row: usize,
    col: usize,
}

#[derive(Serialize)]
struct CompanyPlRow<'a> {
    section: Section,
    metric: &'a str,
    period: Option<PeriodLabel>,
    value: f64,
    unit: Option<&'a str>,
    sheet: &'a str,
    row: usize,
    col: usize,
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified output directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Writes the Product Contribution table, header row included even when empty.
    pub fn save_product_contribution(&self, records: &[TidyRecord]) -> Result<PathBuf, StorageError> {
        let rows = records.iter().map(|r| ProductContributionRow {
            section: r.section,
            period: r.period,
            product: r.product.as_deref(),
            metric: &r.metric,
            value: r.value,
            unit: r.unit.as_deref(),
            sheet: &r.sheet,
            row: r.row,
            col: r.col,
        });
        self.write_table(PRODUCT_CONTRIBUTION_FILE, &PRODUCT_CONTRIBUTION_HEADER, rows)
    }

    /// Writes the Company P&L table, header row included even when empty.
    pub fn save_company_pl(&self, records: &[TidyRecord]) -> Result<PathBuf, StorageError> {
        let rows = records.iter().map(|r| CompanyPlRow {
            section: r.section,
            metric: &r.metric,
            period: r.period,
            value: r.value,
            unit: r.unit.as_deref(),
            sheet: &r.sheet,
            row: r.row,
            col: r.col,
        });
        self.write_table(COMPANY_PL_FILE, &COMPANY_PL_HEADER, rows)
    }

    fn write_table<T, I>(&self, filename: &str, header: &[&str], rows: I) -> Result<PathBuf, StorageError>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        let file_path = self.base_dir.join(filename);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&file_path)?;

        writer.write_record(header)?;
        let mut count = 0usize;
        for row in rows {
            writer.serialize(row)?;
            count += 1;
        }
        writer.flush().map_err(StorageError::IoError)?;

        tracing::info!("Saved {} rows to {}", count, file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about one extracted table in JSON format, next to the table.
    pub fn save_metadata(
        &self,
        extraction: &SectionExtraction,
        table_path: &Path,
        source: &Path,
    ) -> Result<PathBuf, StorageError> {
        let stem = table_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| extraction.section.slug().to_string());
        let file_path = self.base_dir.join(format!("{}_meta.json", stem));

        let metadata = serde_json::json!({
            "source": source.display().to_string(),
            "sheet": extraction.sheet,
            "section": extraction.section.name(),
            "table": table_path.display().to_string(),
            "anchor": extraction.anchor,
            "window": {
                "origin": extraction.window_origin,
                "rows": extraction.window_rows,
                "cols": extraction.window_cols,
            },
            "unit": extraction.unit,
            "period": extraction.period,
            "record_count": extraction.records.len(),
            "skipped_cells": extraction.skipped.len(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());

        Ok(file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::Coord;
    use tempfile::TempDir;

    fn pc_record(product: &str, value: f64, period: Option<u64>) -> TidyRecord {
        TidyRecord {
            section: Section::ProductContribution,
            metric: "Revenues".to_string(),
            product: Some(product.to_string()),
            period: period.map(PeriodLabel::Period),
            value,
            unit: None,
            sheet: "Firm".to_string(),
            row: 14,
            col: 5,
        }
    }

    #[test]
    fn test_product_contribution_csv_layout() {
        let dir = TempDir::new().unwrap();
        let storage = StorageManager::new(dir.path().join("out")).unwrap();

        let path = storage
            .save_product_contribution(&[pc_record("ALPHA", 100.0, Some(5)), pc_record("BETA", 2.5, None)])
            .unwrap();
        let text = fs::read_to_string(path).unwrap();

        assert_eq!(
            text,
            "section,period,product,metric,value,unit,sheet,row,col\n\
             Product Contribution,5,ALPHA,Revenues,100.0,,Firm,14,5\n\
             Product Contribution,,BETA,Revenues,2.5,,Firm,14,5\n"
        );
    }

    #[test]
    fn test_company_pl_csv_layout() {
        let dir = TempDir::new().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let record = TidyRecord {
            section: Section::CompanyProfitLoss,
            metric: "Net income".to_string(),
            product: None,
            period: Some(PeriodLabel::Cumulative),
            value: -30.0,
            unit: Some("thousands of dollars".to_string()),
            sheet: "Firm".to_string(),
            row: 6,
            col: 5,
        };

        let path = storage.save_company_pl(&[record]).unwrap();
        let text = fs::read_to_string(path).unwrap();

        assert_eq!(
            text,
            "section,metric,period,value,unit,sheet,row,col\n\
             Company Profit & Loss Statement,Net income,Cumulative,-30.0,thousands of dollars,Firm,6,5\n"
        );
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let dir = TempDir::new().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();

        let path = storage.save_company_pl(&[]).unwrap();
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "section,metric,period,value,unit,sheet,row,col\n"
        );
    }

    #[test]
    fn test_metadata_json() {
        let dir = TempDir::new().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let extraction = SectionExtraction {
            section: Section::ProductContribution,
            sheet: "Firm".to_string(),
            anchor: Coord::new(10, 2),
            window_origin: Coord::new(10, 1),
            window_rows: 30,
            window_cols: 21,
            unit: Some("thousands of dollars".to_string()),
            period: Some(7),
            records: vec![pc_record("ALPHA", 1.0, Some(7))],
            skipped: Vec::new(),
        };
        let table = storage.save_product_contribution(&extraction.records).unwrap();

        let path = storage
            .save_metadata(&extraction, &table, Path::new("export.xlsx"))
            .unwrap();
        assert!(path.ends_with("product_contribution_tidy_meta.json"));

        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["section"], "Product Contribution");
        assert_eq!(json["anchor"]["row"], 10);
        assert_eq!(json["window"]["cols"], 21);
        assert_eq!(json["period"], 7);
        assert_eq!(json["record_count"], 1);
        assert_eq!(json["source"], "export.xlsx");
    }
}
