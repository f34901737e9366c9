use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utils::dates::{self, DateParseError};
use uuid::Uuid;

use crate::entities::project;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Project not found")]
    ProjectNotFound,
    #[error(transparent)]
    InvalidDate(#[from] DateParseError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(with = "utils::dates::day_month_year")]
    pub start_date: NaiveDate,
    #[serde(with = "utils::dates::day_month_year")]
    pub expected_end_date: NaiveDate,
    pub budget: f64,
    pub url_image: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload, also accepted verbatim on update: a PUT replaces
/// every field rather than patching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: String,
    pub location: String,
    pub start_date: String,
    pub expected_end_date: String,
    pub budget: f64,
    pub url_image: String,
    pub user_id: Uuid,
}

/// Composite the query side hands back; owns exactly one project and
/// carries no state of its own.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub project: Project,
}

impl Dashboard {
    pub fn into_project(self) -> Project {
        self.project
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let projects = Project::find_all(db).await?;
        Ok(projects
            .into_iter()
            .map(|project| Dashboard { project })
            .collect())
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let project = Project::find_by_id(db, id).await?;
        Ok(project.map(|project| Dashboard { project }))
    }
}

impl Project {
    fn from_model(model: project::Model) -> Self {
        Self {
            id: model.uuid,
            name: model.name,
            description: model.description,
            location: model.location,
            start_date: model.start_date,
            expected_end_date: model.expected_end_date,
            budget: model.budget,
            url_image: model.url_image,
            user_id: model.user_id,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = project::Entity::find()
            .order_by_desc(project::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = project::Entity::find()
            .filter(project::Column::Uuid.eq(id))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateProject,
        project_id: Uuid,
    ) -> Result<Self, ProjectError> {
        let start_date = dates::parse_day_month_year(&data.start_date)?;
        let expected_end_date = dates::parse_day_month_year(&data.expected_end_date)?;

        let now = Utc::now();
        let active = project::ActiveModel {
            uuid: Set(project_id),
            name: Set(data.name.clone()),
            description: Set(data.description.clone()),
            location: Set(data.location.clone()),
            start_date: Set(start_date),
            expected_end_date: Set(expected_end_date),
            budget: Set(data.budget),
            url_image: Set(data.url_image.clone()),
            user_id: Set(data.user_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        data: &CreateProject,
    ) -> Result<Self, ProjectError> {
        let start_date = dates::parse_day_month_year(&data.start_date)?;
        let expected_end_date = dates::parse_day_month_year(&data.expected_end_date)?;

        let record = project::Entity::find()
            .filter(project::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(ProjectError::ProjectNotFound)?;

        let mut active: project::ActiveModel = record.into();
        active.name = Set(data.name.clone());
        active.description = Set(data.description.clone());
        active.location = Set(data.location.clone());
        active.start_date = Set(start_date);
        active.expected_end_date = Set(expected_end_date);
        active.budget = Set(data.budget);
        active.url_image = Set(data.url_image.clone());
        active.user_id = Set(data.user_id);
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(db).await?;
        Ok(Self::from_model(updated))
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let record = project::Entity::find()
            .filter(project::Column::Uuid.eq(id))
            .one(db)
            .await?;

        if record.is_none() {
            return Ok(0);
        }

        let result = project::Entity::delete_many()
            .filter(project::Column::Uuid.eq(id))
            .exec(db)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    fn payload(name: &str) -> CreateProject {
        CreateProject {
            name: name.to_string(),
            description: "desc".to_string(),
            location: "Cusco".to_string(),
            start_date: "10-01-2025".to_string(),
            expected_end_date: "10-01-2026".to_string(),
            budget: 250_000.0,
            url_image: "https://example.com/p.png".to_string(),
            user_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn create_update_delete_lifecycle() {
        let db = setup_db().await;
        let id = Uuid::new_v4();

        let created = Project::create(&db, &payload("Bridge"), id).await.unwrap();
        assert_eq!(created.name, "Bridge");
        assert_eq!(
            created.start_date,
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
        );

        let updated = Project::update(&db, id, &payload("Bridge v2")).await.unwrap();
        assert_eq!(updated.name, "Bridge v2");
        assert_eq!(updated.id, id);

        assert_eq!(Project::delete(&db, id).await.unwrap(), 1);
        assert!(Project::find_by_id(&db, id).await.unwrap().is_none());
        assert_eq!(Project::delete(&db, id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_rejects_malformed_dates() {
        let db = setup_db().await;
        let mut data = payload("Bad dates");
        data.start_date = "2025-01-10".to_string();

        let err = Project::create(&db, &data, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ProjectError::InvalidDate(_)));
    }

    #[tokio::test]
    async fn update_missing_project_is_not_found() {
        let db = setup_db().await;
        let err = Project::update(&db, Uuid::new_v4(), &payload("Ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProjectError::ProjectNotFound));
    }

    #[tokio::test]
    async fn dashboard_wraps_exactly_one_project() {
        let db = setup_db().await;
        let id = Uuid::new_v4();
        Project::create(&db, &payload("Wrapped"), id).await.unwrap();

        let dashboard = Dashboard::find_by_id(&db, id).await.unwrap().unwrap();
        assert_eq!(dashboard.project.id, id);
        assert_eq!(dashboard.into_project().name, "Wrapped");

        let dashboards = Dashboard::find_all(&db).await.unwrap();
        assert_eq!(dashboards.len(), 1);
    }

    #[test]
    fn wire_dates_use_day_month_year() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "Wire",
            "description": "d",
            "location": "l",
            "start_date": "01-02-2024",
            "expected_end_date": "28-02-2024",
            "budget": 1.0,
            "url_image": "u",
            "user_id": Uuid::new_v4(),
            "created_at": "2024-02-01T00:00:00Z",
            "updated_at": "2024-02-01T00:00:00Z",
        });

        let project: Project = serde_json::from_value(json).unwrap();
        assert_eq!(
            project.start_date,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        let back = serde_json::to_value(&project).unwrap();
        assert_eq!(
            back.get("start_date").and_then(|v| v.as_str()),
            Some("01-02-2024")
        );
    }
}
