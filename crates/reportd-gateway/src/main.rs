mod args;
mod handlers;
mod metrics;
mod state;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use clap::Parser;

use reportd_scheduler::MemoryScheduler;

use crate::args::Args;
use crate::handlers::{cancel_request, healthz, next_request, submit_request};
use crate::metrics::{metrics_handler, track_requests, Metrics};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    reportd_common::telemetry::init_tracing("reportd-gateway");

    let st = AppState {
        scheduler: Arc::new(MemoryScheduler::new()),
        metrics: Arc::new(Metrics::default()),
    };

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics_handler))
        .route("/v1/requests", post(submit_request))
        .route("/v1/requests/:uuid", delete(cancel_request))
        .route("/v1/requests/next", post(next_request))
        .layer(middleware::from_fn_with_state(st.clone(), track_requests))
        .with_state(st);

    tracing::info!("reportd-gateway listening on {}", args.listen_addr);
    let listener = tokio::net::TcpListener::bind(&args.listen_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
