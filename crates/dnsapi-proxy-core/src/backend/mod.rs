//! Update and clean orchestrators
//!
//! One orchestrator per upstream model. Each owns a lock that serializes
//! its update and clean sequences across all request tasks; the lock guard
//! lives for the whole sequence and is dropped on success, on error and
//! when the sequence is cancelled by [`run_with_deadline`].

pub mod cloud;
pub mod legacy;

pub use cloud::CloudBackend;
pub use legacy::LegacyBackend;

use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;

/// Bound a whole orchestration by `deadline`
///
/// On elapse the sequence is dropped mid-flight, which releases the
/// backend lock and aborts the in-flight provider request.
pub async fn run_with_deadline<F>(deadline: Duration, sequence: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match tokio::time::timeout(deadline, sequence).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!("Provider exchange exceeded deadline of {:?}", deadline);
            Err(Error::Timeout(deadline))
        }
    }
}
