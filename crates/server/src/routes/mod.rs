pub mod health;
pub mod projects;
pub mod roles;
pub mod tasks;
pub mod teams;
pub mod workers;
