//! CLI Exit Code Registry
//!
//! Single source of truth for exit codes. Exit codes are part of the
//! shell contract — scheduled jobs and wrapper scripts rely on them.
//!
//! | Code | Meaning                                        |
//! |------|------------------------------------------------|
//! | 0    | Success                                        |
//! | 1    | General error (unspecified)                    |
//! | 2    | Usage error (bad arguments or options)         |
//! | 3    | Input unreadable or malformed                  |
//! | 4    | Report write failure                           |
//! | 5    | Invalid configuration                          |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
#[allow(dead_code)]
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input file could not be read or is missing required columns.
pub const EXIT_INPUT: u8 = 3;

/// The output workbook or JSON file could not be written.
pub const EXIT_REPORT: u8 = 4;

/// Config file failed to parse or validate.
pub const EXIT_CONFIG: u8 = 5;
