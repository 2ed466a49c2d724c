use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};

use toplist_core::{CommentId, RankId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::AuthContext;

/// Read-only rank endpoints, open to anonymous callers.
pub fn public_router() -> Router {
    Router::new()
        .route("/", get(list_ranks))
        .route("/:id", get(get_rank))
}

/// Mutating rank endpoints; the auth middleware is layered on top.
pub fn protected_router() -> Router {
    Router::new()
        .route("/", post(create_rank))
        .route("/:id", put(update_rank).delete(delete_rank))
        .route("/:id/upvote", post(toggle_upvote))
        .route("/:id/downvote", post(toggle_downvote))
        .route("/:id/comments", post(add_comment))
        .route(
            "/:id/comments/:comment_id",
            put(edit_comment).delete(delete_comment),
        )
}

pub async fn list_ranks(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::ListRanksQuery>,
) -> axum::response::Response {
    match services.list_ranks(params.into_query()).await {
        Ok(views) => {
            let items: Vec<_> = views.iter().map(dto::rank_summary_to_json).collect();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn create_rank(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Json(body): Json<dto::RankRequest>,
) -> axum::response::Response {
    let draft = match body.into_draft() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.create_rank(auth.user_id(), draft).await {
        Ok(view) => (StatusCode::CREATED, Json(dto::rank_detail_to_json(&view))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_rank(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RankId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.get_rank(id).await {
        Ok(view) => (StatusCode::OK, Json(dto::rank_detail_to_json(&view))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_rank(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::RankRequest>,
) -> axum::response::Response {
    let id: RankId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let draft = match body.into_draft() {
        Ok(d) => d,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.update_rank(id, auth.user_id(), draft).await {
        Ok(view) => (StatusCode::OK, Json(dto::rank_detail_to_json(&view))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_rank(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RankId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.delete_rank(id, auth.user_id()).await {
        Ok(view) => (StatusCode::OK, Json(dto::rank_detail_to_json(&view))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn toggle_upvote(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RankId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.toggle_upvote(id, auth.user_id()).await {
        Ok(view) => (StatusCode::OK, Json(dto::rank_detail_to_json(&view))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn toggle_downvote(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: RankId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.toggle_downvote(id, auth.user_id()).await {
        Ok(view) => (StatusCode::OK, Json(dto::rank_detail_to_json(&view))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn add_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::CommentRequest>,
) -> axum::response::Response {
    let id: RankId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.add_comment(id, auth.user_id(), body.text).await {
        Ok(view) => (StatusCode::OK, Json(dto::rank_detail_to_json(&view))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn edit_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path((id, comment_id)): Path<(String, String)>,
    Json(body): Json<dto::CommentRequest>,
) -> axum::response::Response {
    let id: RankId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let comment_id: CommentId = match comment_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .edit_comment(id, comment_id, auth.user_id(), body.text)
        .await
    {
        Ok(view) => (StatusCode::OK, Json(dto::rank_detail_to_json(&view))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_comment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path((id, comment_id)): Path<(String, String)>,
) -> axum::response::Response {
    let id: RankId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let comment_id: CommentId = match comment_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .delete_comment(id, comment_id, auth.user_id())
        .await
    {
        Ok(view) => (StatusCode::OK, Json(dto::rank_detail_to_json(&view))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
