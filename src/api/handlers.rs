//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{AmortizationQuery, ErrorResponse, MonthlyFlowRecord, flow_records};
use crate::calculator::EvaluationReport;
use crate::engine::amortization::AmortizationRow;

/// Returns the full evaluation report.
///
/// `GET /report` → 200 + `EvaluationReport` JSON
pub async fn get_report(State(state): State<Arc<AppState>>) -> Json<EvaluationReport> {
    Json(state.report.clone())
}

/// Returns the twelve monthly flow records.
///
/// `GET /flows` → 200 + `Vec<MonthlyFlowRecord>` JSON
pub async fn get_flows(State(state): State<Arc<AppState>>) -> Json<Vec<MonthlyFlowRecord>> {
    Json(flow_records(&state.report.balance))
}

/// Returns amortization rows, optionally filtered by year range.
///
/// `GET /amortization` → 200 + `Vec<AmortizationRow>` JSON
/// `GET /amortization?from=N&to=M` → filtered range (inclusive)
/// `GET /amortization?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_amortization(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AmortizationQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(1);
    let to = query.to.unwrap_or(u32::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let rows: Vec<AmortizationRow> = state
        .report
        .amortization
        .iter()
        .filter(|r| r.year >= from && r.year <= to)
        .copied()
        .collect();

    Ok(Json(rows))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::calculator::{Calculator, ResidentialRequest};
    use crate::catalog;
    use crate::config::TariffConfig;

    fn make_test_state() -> Arc<AppState> {
        let mut calc = Calculator::new(TariffConfig::default());
        let report = calc.evaluate_residential(&ResidentialRequest {
            capacity_kwc: 3.0,
            panel_watt: 400.0,
            annual_consumption_kwh: 4500.0,
            pool: false,
            profile: *catalog::occupancy_profile("active").expect("profile"),
            battery: None,
            marginal_rate_pct: 30.0,
            high_tier: false,
        });
        Arc::new(AppState { report })
    }

    #[tokio::test]
    async fn report_returns_200() {
        let state = make_test_state();
        let app = router(state);

        let req = Request::builder()
            .uri("/report")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("sizing").is_some());
        assert!(json.get("billing").is_some());
        assert!(json.get("amortization").is_some());
        assert_eq!(json["mode"], "residential");
    }

    #[tokio::test]
    async fn flows_returns_twelve_records() {
        let state = make_test_state();
        let app = router(state);

        let req = Request::builder()
            .uri("/flows")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.len(), 12);
        assert_eq!(json[0]["month"], "Jan");
    }

    #[tokio::test]
    async fn amortization_returns_all_years() {
        let state = make_test_state();
        let app = router(state);

        let req = Request::builder()
            .uri("/amortization")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.len(), 25);
    }

    #[tokio::test]
    async fn amortization_range_query() {
        let state = make_test_state();
        let app = router(state);

        let req = Request::builder()
            .uri("/amortization?from=5&to=10")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.len(), 6); // years 5,6,7,8,9,10
        assert_eq!(json[0]["year"], 5);
        assert_eq!(json[5]["year"], 10);
    }

    #[tokio::test]
    async fn amortization_invalid_range_returns_400() {
        let state = make_test_state();
        let app = router(state);

        let req = Request::builder()
            .uri("/amortization?from=10&to=5")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json.get("error").is_some());
    }
}
