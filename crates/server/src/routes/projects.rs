use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    project::{CreateProject, Dashboard, Project},
    task::Task,
    team::Team,
    worker::Worker,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_project_middleware};

pub async fn get_projects(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Project>>>, ApiError> {
    let dashboards = Dashboard::find_all(&state.db().conn).await?;
    let projects = dashboards
        .into_iter()
        .map(Dashboard::into_project)
        .collect();
    Ok(ResponseJson(ApiResponse::success(projects)))
}

pub async fn get_project(
    Extension(dashboard): Extension<Dashboard>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(dashboard.into_project())))
}

pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProject>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Project>>), ApiError> {
    tracing::debug!("Creating project '{}'", payload.name);

    let project = Project::create(&state.db().conn, &payload, Uuid::new_v4()).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(project))))
}

pub async fn update_project(
    Extension(dashboard): Extension<Dashboard>,
    State(state): State<AppState>,
    Json(payload): Json<CreateProject>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = Project::update(&state.db().conn, dashboard.project.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn delete_project(
    Extension(dashboard): Extension<Dashboard>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let rows_affected = Project::delete(&state.db().conn, dashboard.project.id).await?;

    if rows_affected == 0 {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_project_tasks(
    Extension(dashboard): Extension<Dashboard>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let tasks = Task::find_by_project_id(&state.db().conn, dashboard.project.id).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub async fn get_project_teams(
    Extension(dashboard): Extension<Dashboard>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Team>>>, ApiError> {
    let teams = Team::find_by_project_id(&state.db().conn, dashboard.project.id).await?;
    Ok(ResponseJson(ApiResponse::success(teams)))
}

pub async fn get_project_workers(
    Extension(dashboard): Extension<Dashboard>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Worker>>>, ApiError> {
    let workers = Worker::find_by_project_id(&state.db().conn, dashboard.project.id).await?;
    Ok(ResponseJson(ApiResponse::success(workers)))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let project_id_router = Router::new()
        .route(
            "/",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/tasks", get(get_project_tasks))
        .route("/teams", get(get_project_teams))
        .route("/workers", get(get_project_workers))
        .layer(from_fn_with_state(
            state.clone(),
            load_project_middleware::<AppState>,
        ));

    let projects_router = Router::new()
        .route("/", get(get_projects).post(create_project))
        .nest("/{id}", project_id_router);

    Router::new().nest("/projects", projects_router)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_support::{create_project, project_payload, send_json, test_app};

    #[tokio::test]
    async fn project_crud_over_http() {
        let (_guard, app) = test_app().await;

        let id = create_project(&app, "Harbor expansion").await;

        let (status, json) = send_json(&app, "GET", &format!("/api/v1/projects/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json.pointer("/data/name").and_then(|v| v.as_str()),
            Some("Harbor expansion")
        );
        assert_eq!(
            json.pointer("/data/start_date").and_then(|v| v.as_str()),
            Some("01-06-2025")
        );

        let (status, json) = send_json(
            &app,
            "PUT",
            &format!("/api/v1/projects/{id}"),
            Some(project_payload("Harbor expansion II")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json.pointer("/data/name").and_then(|v| v.as_str()),
            Some("Harbor expansion II")
        );

        let (status, _) = send_json(&app, "DELETE", &format!("/api/v1/projects/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send_json(&app, "GET", &format!("/api/v1/projects/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_project_rejects_malformed_dates() {
        let (_guard, app) = test_app().await;

        let mut payload = project_payload("Bad dates");
        payload["start_date"] = serde_json::json!("2025-06-01");

        let (status, json) = send_json(&app, "POST", "/api/v1/projects", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json.get("success").and_then(|v| v.as_bool()), Some(false));
        let message = json
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        assert!(message.contains("dd-MM-yyyy"));
    }

    #[tokio::test]
    async fn unknown_project_id_is_not_found() {
        let (_guard, app) = test_app().await;

        let id = uuid::Uuid::new_v4();
        let (status, _) = send_json(&app, "GET", &format!("/api/v1/projects/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send_json(
            &app,
            "PUT",
            &format!("/api/v1/projects/{id}"),
            Some(project_payload("Ghost")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn project_list_includes_created_projects() {
        let (_guard, app) = test_app().await;

        create_project(&app, "First").await;
        create_project(&app, "Second").await;

        let (status, json) = send_json(&app, "GET", "/api/v1/projects", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json
            .pointer("/data")
            .and_then(|v| v.as_array())
            .unwrap()
            .iter()
            .filter_map(|p| p.get("name").and_then(|v| v.as_str()))
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"First"));
        assert!(names.contains(&"Second"));
    }
}
