use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::RwLock;
use uuid::Uuid;

use reportd_common::ReportRequest;

use crate::queue::RequestQueue;
use crate::types::ReportScheduler;

/// In-memory scheduler backing store.
///
/// The heap and the identity sets live under one lock so acceptance
/// (uuid + saved) is visible before the request can be popped, and so
/// cancellation can never race a concurrent pop into a double dispatch.
#[derive(Debug, Clone)]
pub struct MemoryScheduler {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    queue: RequestQueue,
    /// Uuids currently pending in the queue.
    live: HashSet<String>,
    /// Cancelled uuids still physically in the heap; skipped at pop.
    cancelled: HashSet<String>,
}

impl MemoryScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }
}

impl Default for MemoryScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ReportScheduler for MemoryScheduler {
    async fn submit(&self, mut request: ReportRequest) -> Result<String> {
        if let Some(existing) = request.uuid() {
            bail!("request already accepted by a scheduler as {existing}");
        }

        let uuid = Uuid::new_v4().to_string();
        request.assign_identity(uuid.clone())?;
        request.saved = true;

        let mut inner = self.inner.write().await;
        inner.live.insert(uuid.clone());
        inner.queue.push(request);

        tracing::debug!(uuid = %uuid, depth = inner.live.len(), "request accepted");
        Ok(uuid)
    }

    async fn cancel(&self, uuid: &str) -> Result<bool> {
        let mut inner = self.inner.write().await;
        if !inner.live.remove(uuid) {
            return Ok(false);
        }
        inner.cancelled.insert(uuid.to_string());

        tracing::debug!(uuid = %uuid, "request cancelled");
        Ok(true)
    }

    async fn next_ready(&self) -> Result<Option<ReportRequest>> {
        let mut inner = self.inner.write().await;
        while let Some(request) = inner.queue.pop() {
            let uuid = request
                .uuid()
                .map(str::to_string)
                .unwrap_or_default();
            if inner.cancelled.remove(&uuid) {
                continue;
            }
            inner.live.remove(&uuid);
            return Ok(Some(request));
        }
        Ok(None)
    }

    async fn pending(&self) -> Result<usize> {
        let inner = self.inner.read().await;
        Ok(inner.live.len())
    }
}
