// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not open workbook {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("Sheet '{sheet}' not found in {path}")]
    SheetMissing { path: String, sheet: String },

    #[error("Could not read sheet '{sheet}': {reason}")]
    Sheet { sheet: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Workbook load failed: {0}")]
    Load(#[from] LoadError),

    #[error("Could not find '{anchor}' section in {sheet} sheet")]
    MissingSection { anchor: String, sheet: String },

    #[error("No period header row found under '{section}' (need at least {required} period columns)")]
    MissingHeader { section: String, required: usize },

    #[error("Strict mode: {section} skipped cell at row {row}, col {col} ({reason})")]
    SchemaDrift {
        section: String,
        row: usize,
        col: usize,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
