//! HTTP surface: `GET /` and `GET /credit-score?customer_id=...`.
//! Outcomes travel in the JSON `status` field; the HTTP status is always 200.

use crate::config::ServerConfig;
use crate::service::CreditService;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub type SharedService = Arc<CreditService>;

#[derive(Debug, Deserialize)]
pub struct CreditScoreQuery {
    #[serde(default)]
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CreditScoreResponse {
    Success {
        customer_id: String,
        prediction: Vec<String>,
        proba: Vec<String>,
    },
    Error {
        message: String,
    },
}

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/credit-score", get(credit_score_handler))
        .with_state(service)
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "Hello": "World" }))
}

async fn credit_score_handler(
    State(service): State<SharedService>,
    query: Result<Query<CreditScoreQuery>, QueryRejection>,
) -> Json<CreditScoreResponse> {
    let customer_id = match query {
        Ok(Query(q)) => q.customer_id.unwrap_or_default(),
        Err(e) => {
            info!(error = %e, "credit score query rejected");
            return Json(CreditScoreResponse::Error {
                message: e.body_text(),
            });
        }
    };
    let response = match service.score_customer(&customer_id) {
        Ok(p) => CreditScoreResponse::Success {
            customer_id: p.customer_id,
            prediction: p.prediction,
            proba: p.proba,
        },
        Err(e) => {
            info!(customer_id = %customer_id, kind = e.kind(), "credit score request rejected");
            CreditScoreResponse::Error {
                message: e.to_string(),
            }
        }
    };
    Json(response)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            tracing::warn!(error = %e, "ctrl-c handler unavailable; serving until killed");
            std::future::pending::<()>().await
        }
    }
}

/// Bind and serve until Ctrl+C.
pub async fn run(service: SharedService, config: &ServerConfig) -> Result<(), std::io::Error> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "credit score service listening");
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
}
