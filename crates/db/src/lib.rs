use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

pub use sea_orm::DbErr;

pub mod entities;
pub mod models;
pub mod types;

#[derive(Clone)]
pub struct DBService {
    pub conn: DatabaseConnection,
}

impl DBService {
    /// Connects and brings the schema up to date. `database_url` is
    /// whatever SeaORM accepts, e.g. `sqlite://buildsphere.sqlite?mode=rwc`.
    pub async fn new(database_url: &str) -> Result<DBService, DbErr> {
        let mut options = ConnectOptions::new(database_url.to_owned());
        options.sqlx_logging(false);
        let conn = Database::connect(options).await?;
        db_migration::Migrator::up(&conn, None).await?;
        tracing::debug!("Database ready at {database_url}");
        Ok(DBService { conn })
    }
}
