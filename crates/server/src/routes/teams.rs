use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::team::{CreateTeam, Team, UpdateTeam};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_team_middleware};

pub async fn get_teams(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Team>>>, ApiError> {
    let teams = Team::find_all(&state.db().conn).await?;
    Ok(ResponseJson(ApiResponse::success(teams)))
}

pub async fn get_team(
    Extension(team): Extension<Team>,
) -> Result<ResponseJson<ApiResponse<Team>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(team)))
}

pub async fn create_team(
    State(state): State<AppState>,
    Json(payload): Json<CreateTeam>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Team>>), ApiError> {
    let team = Team::create(&state.db().conn, &payload, Uuid::new_v4()).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(team))))
}

pub async fn update_team(
    Extension(existing_team): Extension<Team>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateTeam>,
) -> Result<ResponseJson<ApiResponse<Team>>, ApiError> {
    let team = Team::update(&state.db().conn, existing_team.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(team)))
}

pub async fn delete_team(
    Extension(team): Extension<Team>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let rows_affected = Team::delete(&state.db().conn, team.id).await?;

    if rows_affected == 0 {
        return Err(ApiError::NotFound("Team not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub fn router(state: &AppState) -> Router<AppState> {
    let team_id_router = Router::new()
        .route("/", get(get_team).put(update_team).delete(delete_team))
        .layer(from_fn_with_state(
            state.clone(),
            load_team_middleware::<AppState>,
        ));

    let teams_router = Router::new()
        .route("/", get(get_teams).post(create_team))
        .nest("/{id}", team_id_router);

    Router::new().nest("/teams", teams_router)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use uuid::Uuid;

    use crate::test_support::{create_project, send_json, test_app};

    #[tokio::test]
    async fn team_crud_over_http() {
        let (_guard, app) = test_app().await;
        let project_id = create_project(&app, "Airport").await;

        let (status, json) = send_json(
            &app,
            "POST",
            "/api/v1/teams",
            Some(serde_json::json!({
                "project_id": project_id,
                "name": "Electrical crew",
                "specialty": "wiring",
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
            &format!("/api/v1/teams/{id}"),
            Some(serde_json::json!({ "name": "Electrical crew A" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json.pointer("/data/name").and_then(|v| v.as_str()),
            Some("Electrical crew A")
        );
        assert_eq!(
            json.pointer("/data/specialty").and_then(|v| v.as_str()),
            Some("wiring")
        );

        let (status, _) = send_json(&app, "DELETE", &format!("/api/v1/teams/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send_json(&app, "GET", &format!("/api/v1/teams/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_team_with_unknown_project_is_bad_request() {
        let (_guard, app) = test_app().await;

        let (status, _) = send_json(
            &app,
            "POST",
            "/api/v1/teams",
            Some(serde_json::json!({
                "project_id": Uuid::new_v4(),
                "name": "Ghost crew",
                "specialty": null,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
