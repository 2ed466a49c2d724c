use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use toplist_core::UserId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/:user_id/ranks", get(user_ranks))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.list_users().await {
        Ok(users) => {
            let items: Vec<_> = users.iter().map(dto::user_to_json).collect();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn user_ranks(
    Extension(services): Extension<Arc<AppServices>>,
    Path(user_id): Path<String>,
) -> axum::response::Response {
    let user_id: UserId = match user_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.user_ranks(user_id).await {
        Ok(views) => {
            let items: Vec<_> = views.iter().map(dto::rank_summary_to_json).collect();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}
