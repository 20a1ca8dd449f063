//! CLI Exit Code Registry
//!
//! Single source of truth for `enrollcheck` exit codes. Scripts that wrap the
//! tool rely on them.
//!
//! | Code | Meaning                                        |
//! |------|------------------------------------------------|
//! | 0    | Success                                        |
//! | 1    | General error (unspecified)                    |
//! | 2    | Usage error (bad arguments, raised by clap)    |
//! | 3    | A required input file was not given            |
//! | 4    | Reading, parsing or writing a file failed      |
//! | 5    | Export requested but no target rows were found |
//! | 6    | Config file invalid                            |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Account export or application form not supplied.
pub const EXIT_MISSING_INPUT: u8 = 3;

/// File could not be read, parsed or written (includes missing columns).
pub const EXIT_IO: u8 = 4;

/// Reconciliation selected no target rows, so there is nothing to export.
pub const EXIT_NOTHING_TO_EXPORT: u8 = 5;

/// Config TOML failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 6;
