/// API сервер предикции хода строительства

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use obra_ml::{
    predict_project_completion, preprocessing::aggregate_day_metrics,
    types::{DailyReport, MetricsResponse}, HistoricalDataProvider, InMemoryReportStore,
    PredictionOutcome,
};

#[derive(Clone)]
struct AppState {
    store: Arc<InMemoryReportStore>,
}

#[tokio::main]
async fn main() {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let state = AppState {
        store: Arc::new(InMemoryReportStore::new()),
    };

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/partes-diarias", post(ingest_reports))
        .route("/predicao-obra/:project_id", get(predicao_obra))
        .route("/predicao-obra/:project_id/metricas", get(metricas_obra))
        .layer(cors)
        .with_state(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], 8000));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    tracing::info!("Server listening on http://0.0.0.0:8000");
    axum::serve(listener, app).await.unwrap();
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Obra ML API (Rust)",
        "version": "0.1.0"
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn ingest_reports(
    State(state): State<AppState>,
    Json(batch): Json<Vec<DailyReport>>,
) -> Json<serde_json::Value> {
    tracing::info!("Ingest request: {} reports", batch.len());
    let approved = batch.iter().filter(|r| r.approved).count();
    let received = state.store.insert_reports(batch).await;
    Json(serde_json::json!({ "received": received, "approved": approved }))
}

#[derive(Debug, Deserialize)]
struct PredicaoQuery {
    #[serde(rename = "diasPrevistos")]
    dias_previstos: Option<i64>,
}

async fn predicao_obra(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Query(query): Query<PredicaoQuery>,
) -> impl IntoResponse {
    tracing::info!(
        "Prediction request: project {} days_ahead {:?}",
        project_id,
        query.dias_previstos
    );

    match predict_project_completion(state.store.as_ref(), project_id, query.dias_previstos).await
    {
        Ok(PredictionOutcome::Success(result)) => {
            (StatusCode::OK, Json(serde_json::json!(result))).into_response()
        }
        Ok(PredictionOutcome::NoData(body)) => {
            (StatusCode::NOT_FOUND, Json(serde_json::json!(body))).into_response()
        }
        Err(e) => {
            tracing::error!("Prediction failed for project {}: {}", project_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "message": "Prediction failed",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

async fn metricas_obra(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> impl IntoResponse {
    tracing::info!("Metrics request: project {}", project_id);

    match state.store.fetch_approved_daily_reports(project_id).await {
        Ok(reports) => {
            let metricas = aggregate_day_metrics(&reports);
            let body = MetricsResponse {
                project_id,
                total_days: metricas.len(),
                metricas,
            };
            (StatusCode::OK, Json(serde_json::json!(body))).into_response()
        }
        Err(e) => {
            tracing::error!("Metrics failed for project {}: {}", project_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "success": false,
                    "message": "Metrics aggregation failed",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
