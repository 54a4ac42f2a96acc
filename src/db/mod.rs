pub mod client_repo;
pub mod connection;
pub mod migrations;
pub mod report_repo;
pub mod resource_repo;
pub mod task_repo;

pub use connection::*;
