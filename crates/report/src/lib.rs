// Excel report rendering: Outliers / Non-Outliers sheets plus one
// breakdown sheet per (office, job title) with pie charts.

pub mod breakdown;
pub mod builder;
pub mod sheet_name;

pub use builder::{write_report, ReportBuilder};
