use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use planning_core::{aggregate_records, ProjectionOutcome, RampSchedule, SiteRecord};
use serde::{Deserialize, Serialize};

use crate::config::PlanParams;
use crate::sinks::projection_csv::write_series_csv;

/// Stateless planning API: each request is projected from its own inputs,
/// so concurrent calls never share mutable state. Configured params are only
/// the fallback for omitted overrides.
#[derive(Clone)]
pub struct ApiState {
    pub params: Arc<PlanParams>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectionRequest {
    pub sites: Vec<SiteRecord>,
    /// Override for the configured per-unit consumption (㎥/month).
    pub unit_consumption: Option<f64>,
    /// Override for the configured ramp, comma-separated percentages.
    pub ramp: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SeriesPoint {
    pub period: String,
    pub volume: f64,
}

#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    pub series: Vec<SeriesPoint>,
    /// Count of input rows excluded by the skip-on-failure policy.
    pub rejected_rows: usize,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/projection", post(projection_json))
        .route("/v1/projection.csv", post(projection_csv))
        .with_state(state)
}

pub async fn serve(bind_addr: &str, state: ApiState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = bind_addr, "planning API listening");
    axum::serve(listener, router(state).into_make_service()).await?;
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

fn run_projection(
    req: &ProjectionRequest,
    params: &PlanParams,
) -> Result<ProjectionOutcome, (StatusCode, String)> {
    let consumption = req.unit_consumption.unwrap_or(params.unit_consumption);

    let ramp: RampSchedule = match &req.ramp {
        Some(raw) => raw
            .parse()
            .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, format!("{e}")))?,
        None => params
            .ramp_schedule()
            .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("configured ramp: {e}")))?,
    };

    metrics::counter!("projection_requests_total").increment(1);

    let outcome = aggregate_records(&req.sites, consumption, &ramp)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, format!("{e}")))?;

    for row in &outcome.rejected {
        tracing::warn!(index = row.index, site = %row.name, error = %row.error, "site row rejected");
    }
    if !outcome.rejected.is_empty() {
        metrics::counter!("site_rows_invalid_total").increment(outcome.rejected.len() as u64);
    }

    Ok(outcome)
}

async fn projection_json(
    State(state): State<ApiState>,
    Json(req): Json<ProjectionRequest>,
) -> Result<Json<ProjectionResponse>, (StatusCode, String)> {
    let outcome = run_projection(&req, &state.params)?;

    let series = outcome
        .series
        .iter()
        .map(|(period, volume)| SeriesPoint {
            period: period.to_string(),
            volume: *volume,
        })
        .collect();

    Ok(Json(ProjectionResponse {
        series,
        rejected_rows: outcome.rejected.len(),
    }))
}

async fn projection_csv(
    State(state): State<ApiState>,
    Json(req): Json<ProjectionRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let outcome = run_projection(&req, &state.params)?;

    let csv_error = |e: &dyn std::fmt::Display| {
        (StatusCode::INTERNAL_SERVER_ERROR, format!("csv export: {e}"))
    };

    let mut wtr = csv::Writer::from_writer(Vec::new());
    write_series_csv(&mut wtr, &outcome.series).map_err(|e| csv_error(&e))?;
    let body = String::from_utf8(wtr.into_inner().map_err(|e| csv_error(&e))?)
        .map_err(|e| csv_error(&e))?;

    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        router(ApiState {
            params: Arc::new(PlanParams::default()),
        })
    }

    fn projection_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/projection")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn projects_with_configured_defaults() {
        let req = projection_request(serde_json::json!({
            "sites": [
                { "name": "A", "units": "500", "start_period": "2026-03" },
                { "name": "B", "units": "abc", "start_period": "2026-03" }
            ]
        }));

        let resp = test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["rejected_rows"], 1);
        assert_eq!(json["series"][0]["period"], "2026-03");
        assert_eq!(json["series"][0]["volume"], 4500.0);
        assert_eq!(json["series"][3]["volume"], 15000.0);
    }

    #[tokio::test]
    async fn rejects_negative_consumption_override() {
        let req = projection_request(serde_json::json!({
            "sites": [{ "name": "A", "units": "500", "start_period": "2026-03" }],
            "unit_consumption": -1.0
        }));

        let resp = test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn rejects_unparseable_ramp_override() {
        let req = projection_request(serde_json::json!({
            "sites": [{ "name": "A", "units": "500", "start_period": "2026-03" }],
            "ramp": "30,sixty"
        }));

        let resp = test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn csv_endpoint_uses_reference_header() {
        let req = Request::builder()
            .method("POST")
            .uri("/v1/projection.csv")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({
                    "sites": [{ "name": "A", "units": "500", "start_period": "2026-03" }]
                })
                .to_string(),
            ))
            .unwrap();

        let resp = test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "연월,신규물량(㎥)");
        assert_eq!(lines[1], "2026-03,4500");
    }
}
