// src/workbook/mod.rs
pub mod grid;
pub mod loader;

// Re-export key workbook types for convenience
pub use grid::{Cell, Coord, Grid, Window};
pub use loader::load_sheet;
