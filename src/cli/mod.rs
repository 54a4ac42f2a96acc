pub mod annual;
pub mod board;
pub mod client;
pub mod commands;
pub mod init;
pub mod resource;
pub mod task;
pub mod week;
