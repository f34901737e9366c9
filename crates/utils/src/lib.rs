pub mod dates;
pub mod response;
