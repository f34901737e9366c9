use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{entities::worker, models::ids};

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Worker not found")]
    WorkerNotFound,
    #[error("Project not found")]
    ProjectNotFound,
    #[error("Team not found")]
    TeamNotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: Uuid,
    pub project_id: Uuid,
    pub team_id: Option<Uuid>,
    pub name: String,
    pub trade: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorker {
    pub project_id: Uuid,
    pub team_id: Option<Uuid>,
    pub name: String,
    pub trade: Option<String>,
}

/// Fields left out keep their current value. A present `team_id`
/// reassigns the worker to that team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWorker {
    pub name: Option<String>,
    pub trade: Option<String>,
    pub team_id: Option<Uuid>,
}

impl Worker {
    async fn from_model<C: ConnectionTrait>(db: &C, model: worker::Model) -> Result<Self, DbErr> {
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
            team_id,
            name: model.name,
            trade: model.trade,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let models = worker::Entity::find()
            .order_by_desc(worker::Column::CreatedAt)
            .all(db)
            .await?;

        let mut workers = Vec::with_capacity(models.len());
        for model in models {
            workers.push(Self::from_model(db, model).await?);
        }
        Ok(workers)
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = worker::Entity::find()
            .filter(worker::Column::Uuid.eq(id))
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

        let models = worker::Entity::find()
            .filter(worker::Column::ProjectId.eq(project_row_id))
            .order_by_desc(worker::Column::CreatedAt)
            .all(db)
            .await?;

        let mut workers = Vec::with_capacity(models.len());
        for model in models {
            workers.push(Self::from_model(db, model).await?);
        }
        Ok(workers)
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateWorker,
        worker_id: Uuid,
    ) -> Result<Self, WorkerError> {
        let project_row_id = ids::project_id_by_uuid(db, data.project_id)
            .await?
            .ok_or(WorkerError::ProjectNotFound)?;
        let team_row_id = match data.team_id {
            Some(id) => Some(
                ids::team_id_by_uuid(db, id)
                    .await?
                    .ok_or(WorkerError::TeamNotFound)?,
            ),
            None => None,
        };

        let now = Utc::now();
        let active = worker::ActiveModel {
            uuid: Set(worker_id),
            project_id: Set(project_row_id),
            team_id: Set(team_row_id),
            name: Set(data.name.clone()),
            trade: Set(data.trade.clone()),
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
        data: &UpdateWorker,
    ) -> Result<Self, WorkerError> {
        let record = worker::Entity::find()
            .filter(worker::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(WorkerError::WorkerNotFound)?;

        let mut active: worker::ActiveModel = record.into();
        if let Some(name) = &data.name {
            active.name = Set(name.clone());
        }
        if let Some(trade) = &data.trade {
            active.trade = Set(Some(trade.clone()));
        }
        if let Some(team_id) = data.team_id {
            let team_row_id = ids::team_id_by_uuid(db, team_id)
                .await?
                .ok_or(WorkerError::TeamNotFound)?;
            active.team_id = Set(Some(team_row_id));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(db).await?;
        Ok(Self::from_model(db, updated).await?)
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let record = worker::Entity::find()
            .filter(worker::Column::Uuid.eq(id))
            .one(db)
            .await?;

        if record.is_none() {
            return Ok(0);
        }

        let result = worker::Entity::delete_many()
            .filter(worker::Column::Uuid.eq(id))
            .exec(db)
            .await?;

        Ok(result.rows_affected)
    }
}
