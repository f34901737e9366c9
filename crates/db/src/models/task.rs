use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utils::dates::{self, DateParseError};
use uuid::Uuid;

use crate::{entities::task, models::ids};

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Task not found")]
    TaskNotFound,
    #[error("Project not found")]
    ProjectNotFound,
    #[error("Team not found")]
    TeamNotFound,
    #[error(transparent)]
    InvalidDate(#[from] DateParseError),
    #[error("Start date {start} is after max end date {max_end}")]
    InvalidDateRange { start: String, max_end: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "utils::dates::day_month_year")]
    pub start_date: NaiveDate,
    #[serde(with = "utils::dates::day_month_year")]
    pub max_end_date: NaiveDate,
    pub team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub project_id: Uuid,
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub max_end_date: String,
    pub team_id: Option<Uuid>,
}

/// Replaces every mutable field. Dates are parsed with the same fixed
/// `dd-MM-yyyy` format as creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTask {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub max_end_date: String,
    pub team_id: Option<Uuid>,
}

fn parse_date_window(start: &str, max_end: &str) -> Result<(NaiveDate, NaiveDate), TaskError> {
    let start_date = dates::parse_day_month_year(start)?;
    let max_end_date = dates::parse_day_month_year(max_end)?;
    if start_date > max_end_date {
        return Err(TaskError::InvalidDateRange {
            start: dates::format_day_month_year(start_date),
            max_end: dates::format_day_month_year(max_end_date),
        });
    }
    Ok((start_date, max_end_date))
}

impl Task {
    async fn from_model<C: ConnectionTrait>(db: &C, model: task::Model) -> Result<Self, DbErr> {
        let project_id = ids::project_uuid_by_id(db, model.project_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Project not found".to_string()))?;
        let team_id = match model.team_id {
            Some(id) => ids::team_uuid_by_id(db, id)
                .await?
                .ok_or(DbErr::RecordNotFound("Team not found".to_string()))
                .map(Some)?,
            None => None,
        };

        Ok(Self {
            id: model.uuid,
            project_id,
            name: model.name,
            description: model.description,
            start_date: model.start_date,
            max_end_date: model.max_end_date,
            team_id,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let models = task::Entity::find()
            .order_by_desc(task::Column::CreatedAt)
            .all(db)
            .await?;

        let mut tasks = Vec::with_capacity(models.len());
        for model in models {
            tasks.push(Self::from_model(db, model).await?);
        }
        Ok(tasks)
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = task::Entity::find()
            .filter(task::Column::Uuid.eq(id))
            .one(db)
            .await?;

        match record {
            Some(model) => Ok(Some(Self::from_model(db, model).await?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_project_id<C: ConnectionTrait>(
        db: &C,
        project_id: Uuid,
    ) -> Result<Vec<Self>, DbErr> {
        let project_row_id = ids::project_id_by_uuid(db, project_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Project not found".to_string()))?;

        let models = task::Entity::find()
            .filter(task::Column::ProjectId.eq(project_row_id))
            .order_by_desc(task::Column::CreatedAt)
            .all(db)
            .await?;

        let mut tasks = Vec::with_capacity(models.len());
        for model in models {
            tasks.push(Self::from_model(db, model).await?);
        }
        Ok(tasks)
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateTask,
        task_id: Uuid,
    ) -> Result<Self, TaskError> {
        let (start_date, max_end_date) = parse_date_window(&data.start_date, &data.max_end_date)?;

        let project_row_id = ids::project_id_by_uuid(db, data.project_id)
            .await?
            .ok_or(TaskError::ProjectNotFound)?;
        let team_row_id = match data.team_id {
            Some(id) => Some(
                ids::team_id_by_uuid(db, id)
                    .await?
                    .ok_or(TaskError::TeamNotFound)?,
            ),
            None => None,
        };

        let now = Utc::now();
        let active = task::ActiveModel {
            uuid: Set(task_id),
            project_id: Set(project_row_id),
            name: Set(data.name.clone()),
            description: Set(data.description.clone()),
            start_date: Set(start_date),
            max_end_date: Set(max_end_date),
            team_id: Set(team_row_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let model = active.insert(db).await?;
        Ok(Self::from_model(db, model).await?)
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: Uuid,
        data: &UpdateTask,
    ) -> Result<Self, TaskError> {
        let (start_date, max_end_date) = parse_date_window(&data.start_date, &data.max_end_date)?;

        let record = task::Entity::find()
            .filter(task::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(TaskError::TaskNotFound)?;

        let team_row_id = match data.team_id {
            Some(id) => Some(
                ids::team_id_by_uuid(db, id)
                    .await?
                    .ok_or(TaskError::TeamNotFound)?,
            ),
            None => None,
        };

        let mut active: task::ActiveModel = record.into();
        active.name = Set(data.name.clone());
        active.description = Set(data.description.clone());
        active.start_date = Set(start_date);
        active.max_end_date = Set(max_end_date);
        active.team_id = Set(team_row_id);
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(db).await?;
        Ok(Self::from_model(db, updated).await?)
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let record = task::Entity::find()
            .filter(task::Column::Uuid.eq(id))
            .one(db)
            .await?;

        if record.is_none() {
            return Ok(0);
        }

        let result = task::Entity::delete_many()
            .filter(task::Column::Uuid.eq(id))
            .exec(db)
            .await?;

        Ok(result.rows_affected)
    }
}
