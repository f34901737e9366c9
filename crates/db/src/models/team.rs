use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{entities::team, models::ids};

#[derive(Debug, Error)]
pub enum TeamError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Team not found")]
    TeamNotFound,
    #[error("Project not found")]
    ProjectNotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub specialty: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    pub project_id: Uuid,
    pub name: String,
    pub specialty: Option<String>,
}

/// Fields left out keep their current value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTeam {
    pub name: Option<String>,
    pub specialty: Option<String>,
}

impl Team {
    async fn from_model<C: ConnectionTrait>(db: &C, model: team::Model) -> Result<Self, DbErr> {
        let project_id = ids::project_uuid_by_id(db, model.project_id)
            .await?
            .ok_or(DbErr::RecordNotFound("Project not found".to_string()))?;

        Ok(Self {
            id: model.uuid,
            project_id,
            name: model.name,
            specialty: model.specialty,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let models = team::Entity::find()
            .order_by_desc(team::Column::CreatedAt)
            .all(db)
            .await?;

        let mut teams = Vec::with_capacity(models.len());
        for model in models {
            teams.push(Self::from_model(db, model).await?);
        }
        Ok(teams)
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = team::Entity::find()
            .filter(team::Column::Uuid.eq(id))
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

        let models = team::Entity::find()
            .filter(team::Column::ProjectId.eq(project_row_id))
            .order_by_desc(team::Column::CreatedAt)
            .all(db)
            .await?;

        let mut teams = Vec::with_capacity(models.len());
        for model in models {
            teams.push(Self::from_model(db, model).await?);
        }
        Ok(teams)
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateTeam,
        team_id: Uuid,
    ) -> Result<Self, TeamError> {
        let project_row_id = ids::project_id_by_uuid(db, data.project_id)
            .await?
            .ok_or(TeamError::ProjectNotFound)?;

        let now = Utc::now();
        let active = team::ActiveModel {
            uuid: Set(team_id),
            project_id: Set(project_row_id),
            name: Set(data.name.clone()),
            specialty: Set(data.specialty.clone()),
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
        data: &UpdateTeam,
    ) -> Result<Self, TeamError> {
        let record = team::Entity::find()
            .filter(team::Column::Uuid.eq(id))
            .one(db)
            .await?
            .ok_or(TeamError::TeamNotFound)?;

        let mut active: team::ActiveModel = record.into();
        if let Some(name) = &data.name {
            active.name = Set(name.clone());
        }
        if let Some(specialty) = &data.specialty {
            active.specialty = Set(Some(specialty.clone()));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(db).await?;
        Ok(Self::from_model(db, updated).await?)
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let record = team::Entity::find()
            .filter(team::Column::Uuid.eq(id))
            .one(db)
            .await?;

        if record.is_none() {
            return Ok(0);
        }

        let result = team::Entity::delete_many()
            .filter(team::Column::Uuid.eq(id))
            .exec(db)
            .await?;

        Ok(result.rows_affected)
    }
}
