// File loading - turns CSV and Excel sources into in-memory tables
// for the analysis engine. All file I/O lives here.

pub mod csv;
pub mod xlsx;
