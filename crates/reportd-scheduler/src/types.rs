use anyhow::Result;
use async_trait::async_trait;

use reportd_common::ReportRequest;

/// Contract between producers and a report-request scheduler.
///
/// `submit` transfers ownership of the request into the scheduler, which
/// assigns its uuid and marks it saved before it becomes visible to any
/// consumer. After that point the uuid is the handle for everything else.
#[async_trait]
pub trait ReportScheduler: Send + Sync {
    /// Accept a request, assign its identity, and enqueue it.
    /// Rejects a request that already carries a uuid.
    async fn submit(&self, request: ReportRequest) -> Result<String>;

    /// Remove a pending request by identity. Returns whether anything
    /// was actually pending under that uuid.
    async fn cancel(&self, uuid: &str) -> Result<bool>;

    /// Pop the best pending request: highest priority, then earliest
    /// request date (missing date last), then submission order.
    /// Non-blocking; `None` when the queue is empty.
    async fn next_ready(&self) -> Result<Option<ReportRequest>>;

    /// Number of pending (non-cancelled) requests.
    async fn pending(&self) -> Result<usize>;
}
