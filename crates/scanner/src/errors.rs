//! Scanner error types.
//!
//! Scans absorb every data-layer failure (a candidate that cannot be
//! evaluated is skipped; a sourcing failure yields an empty list), so the
//! only error a caller can see is invalid input.

use thiserror::Error;

use crate::service::MAX_SCAN_LIMIT;

#[derive(Error, Debug)]
pub enum ScannerError {
    /// The requested result limit is outside the accepted range.
    #[error("Scan limit {0} is outside 1..={MAX_SCAN_LIMIT}")]
    InvalidLimit(usize),
}
