//! Core domain types and logic.

pub mod raw_table;
pub mod metric;
pub mod market;
pub mod horizon;
pub mod series;
pub mod forecast;
pub mod comparison;
pub mod pipeline;
pub mod error;
