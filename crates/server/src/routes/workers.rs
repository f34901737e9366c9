use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::worker::{CreateWorker, UpdateWorker, Worker};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_worker_middleware};

pub async fn get_workers(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Worker>>>, ApiError> {
    let workers = Worker::find_all(&state.db().conn).await?;
    Ok(ResponseJson(ApiResponse::success(workers)))
}

pub async fn get_worker(
    Extension(worker): Extension<Worker>,
) -> Result<ResponseJson<ApiResponse<Worker>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(worker)))
}

pub async fn create_worker(
    State(state): State<AppState>,
    Json(payload): Json<CreateWorker>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Worker>>), ApiError> {
    let worker = Worker::create(&state.db().conn, &payload, Uuid::new_v4()).await?;
    Ok((
        StatusCode::CREATED,
        ResponseJson(ApiResponse::success(worker)),
    ))
}

pub async fn update_worker(
    Extension(existing_worker): Extension<Worker>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateWorker>,
) -> Result<ResponseJson<ApiResponse<Worker>>, ApiError> {
    let worker = Worker::update(&state.db().conn, existing_worker.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(worker)))
}

pub async fn delete_worker(
    Extension(worker): Extension<Worker>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let rows_affected = Worker::delete(&state.db().conn, worker.id).await?;

    if rows_affected == 0 {
        return Err(ApiError::NotFound("Worker not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub fn router(state: &AppState) -> Router<AppState> {
    let worker_id_router = Router::new()
        .route("/", get(get_worker).put(update_worker).delete(delete_worker))
        .layer(from_fn_with_state(
            state.clone(),
            load_worker_middleware::<AppState>,
        ));

    let workers_router = Router::new()
        .route("/", get(get_workers).post(create_worker))
        .nest("/{id}", worker_id_router);

    Router::new().nest("/workers", workers_router)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use uuid::Uuid;

    use crate::test_support::{create_project, send_json, test_app};

    #[tokio::test]
    async fn worker_crud_over_http() {
        let (_guard, app) = test_app().await;
        let project_id = create_project(&app, "Dam").await;

        let (status, json) = send_json(
            &app,
            "POST",
            "/api/v1/workers",
            Some(serde_json::json!({
                "project_id": project_id,
                "team_id": null,
                "name": "Rosa",
                "trade": "welder",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = json
            .pointer("/data/id")
            .and_then(|v| v.as_str())
            .and_then(|v| Uuid::parse_str(v).ok())
            .unwrap();

        let (status, json) = send_json(
            &app,
            "PUT",
            &format!("/api/v1/workers/{id}"),
            Some(serde_json::json!({ "trade": "lead welder" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json.pointer("/data/name").and_then(|v| v.as_str()),
            Some("Rosa")
        );
        assert_eq!(
            json.pointer("/data/trade").and_then(|v| v.as_str()),
            Some("lead welder")
        );

        let (status, _) = send_json(&app, "DELETE", &format!("/api/v1/workers/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send_json(&app, "GET", &format!("/api/v1/workers/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn worker_with_unknown_team_is_bad_request() {
        let (_guard, app) = test_app().await;
        let project_id = create_project(&app, "Dam").await;

        let (status, _) = send_json(
            &app,
            "POST",
            "/api/v1/workers",
            Some(serde_json::json!({
                "project_id": project_id,
                "team_id": Uuid::new_v4(),
                "name": "Rosa",
                "trade": null,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn project_worker_listing_is_scoped() {
        let (_guard, app) = test_app().await;
        let first = create_project(&app, "East wing").await;
        let second = create_project(&app, "West wing").await;

        for (project_id, name) in [(first, "Marco"), (second, "Elena")] {
            let (status, _) = send_json(
                &app,
                "POST",
                "/api/v1/workers",
                Some(serde_json::json!({
                    "project_id": project_id,
                    "team_id": null,
                    "name": name,
                    "trade": null,
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, json) = send_json(
            &app,
            "GET",
            &format!("/api/v1/projects/{first}/workers"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let workers = json.pointer("/data").and_then(|v| v.as_array()).unwrap();
        assert_eq!(workers.len(), 1);
        assert_eq!(
            workers[0].get("name").and_then(|v| v.as_str()),
            Some("Marco")
        );
    }
}
