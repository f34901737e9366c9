pub mod ids;
pub mod project;
pub mod role;
pub mod task;
pub mod team;
pub mod worker;
