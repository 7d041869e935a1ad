// src/extractors/record.rs
use crate::workbook::Coord;
use serde::{Serialize, Serializer};
use std::fmt;

/// Column label of a P&L period column. Every numbered period sorts before
/// `Cumulative`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodLabel {
    Period(u64),
    Cumulative,
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodLabel::Period(n) => write!(f, "{}", n),
            PeriodLabel::Cumulative => f.write_str("Cumulative"),
        }
    }
}

impl Serialize for PeriodLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PeriodLabel::Period(n) => serializer.serialize_u64(*n),
            PeriodLabel::Cumulative => serializer.serialize_str("Cumulative"),
        }
    }
}

/// The labeled blocks this tool knows how to pull out of the Firm sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    ProductContribution,
    CompanyProfitLoss,
}

impl Section {
    pub fn name(&self) -> &'static str {
        match self {
            Section::ProductContribution => "Product Contribution",
            Section::CompanyProfitLoss => "Company Profit & Loss Statement",
        }
    }

    /// File-name friendly identifier.
    pub fn slug(&self) -> &'static str {
        match self {
            Section::ProductContribution => "product_contribution",
            Section::CompanyProfitLoss => "company_pl",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// One observation: a metric for one product and/or period, traced back to
/// the cell it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyRecord {
    pub section: Section,
    pub metric: String,
    pub product: Option<String>,
    pub period: Option<PeriodLabel>,
    pub value: f64,
    pub unit: Option<String>,
    pub sheet: String,
    pub row: usize,
    pub col: usize,
}

/// Why a cell inside an inferred data region produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Text or another non-numeric value where a number was expected.
    NonNumeric,
    /// A number in a column with no product/period label.
    UnmappedColumn,
    /// A P&L row carrying numbers but no text label.
    MissingLabel,
    /// Metric rows were found but no product header row.
    NoProductHeader,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NonNumeric => "non-numeric value in a data column",
            SkipReason::UnmappedColumn => "number in a column without an entity label",
            SkipReason::MissingLabel => "numbers in a row without a metric label",
            SkipReason::NoProductHeader => "no product header row",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCell {
    /// Absolute sheet coordinate.
    pub at: Coord,
    pub reason: SkipReason,
}

/// Everything one extraction call discovered, records included.
#[derive(Debug, Clone)]
pub struct SectionExtraction {
    pub section: Section,
    pub sheet: String,
    pub anchor: Coord,
    pub window_origin: Coord,
    pub window_rows: usize,
    pub window_cols: usize,
    pub unit: Option<String>,
    /// Product Contribution only: the period tag applied to every record.
    pub period: Option<u64>,
    pub records: Vec<TidyRecord>,
    pub skipped: Vec<SkippedCell>,
}

/// Product Contribution output order: (product, metric) ascending.
pub fn sort_product_contribution(records: &mut [TidyRecord]) {
    records.sort_by(|a, b| {
        a.product
            .cmp(&b.product)
            .then_with(|| a.metric.cmp(&b.metric))
    });
}

/// P&L output order: (metric, period) ascending, `Cumulative` after every period.
pub fn sort_company_pl(records: &mut [TidyRecord]) {
    records.sort_by(|a, b| {
        a.metric
            .cmp(&b.metric)
            .then_with(|| a.period.cmp(&b.period))
    });
}
