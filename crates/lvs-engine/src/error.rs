//! Engine error type.

use lvs_state::StoreError;
use thiserror::Error;

/// Faults that prevent a verification report from being produced.
///
/// Failing checks are not errors: they are recorded in the report.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The license record store could not be read.
    #[error("license record store unavailable: {0}")]
    RecordStore(#[source] StoreError),
}
