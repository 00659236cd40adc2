//! 電力剖面集的 HTTP API (唯讀)。
//!
//! | 路徑 | 回應 |
//! |---|---|
//! | `GET /electrical_profile_set/` | `[{id, name}]` |
//! | `GET /electrical_profile_set/{id}/` | `ElectricalProfilesList` |
//! | `GET /electrical_profile_set/{id}/level_order/` | `ElectricalProfileLevelOrder` |

use crate::app::QueryService;
use crate::domain::model::{ElectricalProfileLevelOrder, ElectricalProfilesList, SetId, SetSummary};
use crate::domain::ports::Storage;
use crate::utils::error::{ProfileError, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::net::SocketAddr;

impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!("❌ Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected with {}: {}", status, self);
        }

        let body = serde_json::json!({ "error": self.user_friendly_message() });
        (status, Json(body)).into_response()
    }
}

pub fn router<S: Storage + 'static>(service: QueryService<S>) -> Router {
    Router::new()
        .route("/electrical_profile_set/", get(list::<S>))
        .route("/electrical_profile_set/{id}/", get(retrieve::<S>))
        .route(
            "/electrical_profile_set/{id}/level_order/",
            get(level_order::<S>),
        )
        .fallback(fallback)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(service)
}

/// 非數字的 id 與不存在的 id 一樣回 404
fn parse_id(raw: &str) -> Result<SetId> {
    raw.parse()
        .map_err(|_| ProfileError::not_found("ElectricalProfilesSet", raw))
}

async fn list<S: Storage + 'static>(
    State(service): State<QueryService<S>>,
) -> Json<Vec<SetSummary>> {
    let summaries = service.list_all().await;
    tracing::debug!("Listing {} electrical profile set(s)", summaries.len());
    Json(summaries)
}

async fn retrieve<S: Storage + 'static>(
    State(service): State<QueryService<S>>,
    Path(id): Path<String>,
) -> Result<Json<ElectricalProfilesList>> {
    let id = parse_id(&id)?;
    Ok(Json(service.retrieve_data(id).await?))
}

async fn level_order<S: Storage + 'static>(
    State(service): State<QueryService<S>>,
    Path(id): Path<String>,
) -> Result<Json<ElectricalProfileLevelOrder>> {
    let id = parse_id(&id)?;
    Ok(Json(service.retrieve_level_order(id).await?))
}

async fn fallback() -> ProfileError {
    ProfileError::NotFound {
        entity: "route",
        id: String::new(),
    }
}

async fn method_not_allowed() -> Response {
    let body = serde_json::json!({ "error": "Method not allowed." });
    (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response()
}

pub async fn serve<S: Storage + 'static>(addr: SocketAddr, service: QueryService<S>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("▸ Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutting down");
            }
        })
        .await?;
    Ok(())
}
