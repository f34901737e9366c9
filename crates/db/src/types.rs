use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Fixed set of platform roles. Seeded at startup and immutable after.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoleName {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "site_manager")]
    SiteManager,
    #[sea_orm(string_value = "worker")]
    Worker,
}
