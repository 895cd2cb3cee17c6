use std::collections::HashMap;
use std::sync::atomic::Ordering;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use reportd_common::{
    CohortDefinitionRef, Priority, RenderingMode, ReportDefinitionRef, ReportRequest, UserRef,
};

use crate::state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
    pub report_definition: ReportDefinitionRef,

    #[serde(default)]
    pub base_cohort: Option<CohortDefinitionRef>,

    #[serde(default)]
    pub parameter_values: HashMap<String, serde_json::Value>,

    pub rendering_mode: RenderingMode,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default)]
    pub requested_by: Option<UserRef>,

    /// Producer-supplied submission time; now() when omitted.
    #[serde(default)]
    pub request_date: Option<DateTime<Utc>>,
}

pub async fn submit_request(State(st): State<AppState>, Json(body): Json<SubmitBody>) -> Response {
    let mut request = ReportRequest::new(
        body.report_definition,
        body.base_cohort,
        body.parameter_values,
        body.rendering_mode,
        body.priority,
    );
    request.requested_by = body.requested_by;
    request.request_date = Some(body.request_date.unwrap_or_else(Utc::now));
    for label in body.labels {
        request.add_label(label);
    }

    match st.scheduler.submit(request).await {
        Ok(uuid) => {
            st.metrics.submitted_total.fetch_add(1, Ordering::Relaxed);
            tracing::info!(uuid = %uuid, "report request submitted");
            Json(serde_json::json!({ "uuid": uuid })).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "submit rejected");
            (StatusCode::CONFLICT, format!("submit rejected: {e}")).into_response()
        }
    }
}

pub async fn cancel_request(State(st): State<AppState>, Path(uuid): Path<String>) -> Response {
    match st.scheduler.cancel(&uuid).await {
        Ok(true) => {
            st.metrics.cancelled_total.fetch_add(1, Ordering::Relaxed);
            tracing::info!(uuid = %uuid, "report request cancelled");
            Json(serde_json::json!({ "cancelled": true })).into_response()
        }
        Ok(false) => (
            StatusCode::NOT_FOUND,
            format!("no pending request with uuid '{uuid}'"),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, uuid = %uuid, "cancel failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "cancel failed").into_response()
        }
    }
}

/// Hand the best pending request to the caller (an execution worker).
/// 204 when the queue is empty.
pub async fn next_request(State(st): State<AppState>) -> Response {
    match st.scheduler.next_ready().await {
        Ok(Some(request)) => {
            st.metrics.dispatched_total.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                uuid = request.uuid().unwrap_or_default(),
                priority = ?request.priority,
                "report request dispatched"
            );
            Json(request).into_response()
        }
        Ok(None) => {
            st.metrics.empty_polls_total.fetch_add(1, Ordering::Relaxed);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "next_ready failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "dequeue failed").into_response()
        }
    }
}
