use std::sync::Arc;

use reportd_scheduler::ReportScheduler;

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<dyn ReportScheduler>,
    pub metrics: Arc<Metrics>,
}
