use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, Iterable, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{entities::role, types::RoleName};

#[derive(Debug, Error)]
pub enum RoleError {
    #[error(transparent)]
    Database(#[from] DbErr),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: RoleName,
    pub created_at: DateTime<Utc>,
}

impl Role {
    fn from_model(model: role::Model) -> Self {
        Self {
            id: model.uuid,
            name: model.name,
            created_at: model.created_at.into(),
        }
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = role::Entity::find()
            .order_by_asc(role::Column::Name)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn exists_by_name<C: ConnectionTrait>(db: &C, name: RoleName) -> Result<bool, DbErr> {
        let count = role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    /// Inserts any role names not yet present. Safe to run on every
    /// startup; returns the number of rows inserted.
    pub async fn seed<C: ConnectionTrait>(db: &C) -> Result<u64, RoleError> {
        let mut inserted = 0;
        for name in RoleName::iter() {
            if Self::exists_by_name(db, name.clone()).await? {
                continue;
            }

            let now = Utc::now();
            let active = role::ActiveModel {
                uuid: Set(Uuid::new_v4()),
                name: Set(name),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            };
            active.insert(db).await?;
            inserted += 1;
        }
        Ok(inserted)
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

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let db = setup_db().await;

        assert_eq!(Role::seed(&db).await.unwrap(), 3);
        assert_eq!(Role::seed(&db).await.unwrap(), 0);

        let roles = Role::find_all(&db).await.unwrap();
        assert_eq!(roles.len(), 3);

        let names: Vec<RoleName> = roles.into_iter().map(|role| role.name).collect();
        assert!(names.contains(&RoleName::Admin));
        assert!(names.contains(&RoleName::SiteManager));
        assert!(names.contains(&RoleName::Worker));
    }

    #[tokio::test]
    async fn exists_by_name_tracks_seeding() {
        let db = setup_db().await;

        assert!(!Role::exists_by_name(&db, RoleName::Admin).await.unwrap());
        Role::seed(&db).await.unwrap();
        assert!(Role::exists_by_name(&db, RoleName::Admin).await.unwrap());
    }
}
