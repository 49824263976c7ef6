//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: wrapper scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | compare          | Reconciliation and input codes           |
//! | 50-59   | fetch            | Upstream record service                  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Compare (3-9)
// =============================================================================

/// Discrepancies found and `--strict-exit` was given.
pub const EXIT_DISCREPANCIES: u8 = 3;

/// Cannot read an input file or write report output.
pub const EXIT_IO: u8 = 4;

/// Input file could not be parsed (tracker JSON, etc.).
pub const EXIT_PARSE: u8 = 5;

/// Settings file is malformed or fails validation.
pub const EXIT_INVALID_CONFIG: u8 = 6;

// =============================================================================
// Fetch (50-59)
// =============================================================================

/// Upstream returned an error status, or the request failed outright.
pub const EXIT_FETCH_UPSTREAM: u8 = 54;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let mut codes = vec![
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_DISCREPANCIES,
            EXIT_IO,
            EXIT_PARSE,
            EXIT_INVALID_CONFIG,
            EXIT_FETCH_UPSTREAM,
        ];
        let before = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), before);
    }
}
