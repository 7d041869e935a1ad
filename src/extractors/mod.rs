// src/extractors/mod.rs
pub mod company_pl;
pub mod layout;
pub mod locate;
pub mod product_contribution;
pub mod record;
pub mod tidy;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use layout::{LayoutConfig, PeriodScope};
#[allow(unused_imports)]
pub use record::{sort_company_pl, sort_product_contribution, SectionExtraction, TidyRecord};
pub use tidy::TidyExtractor;
