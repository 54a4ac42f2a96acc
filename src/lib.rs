pub mod cli;
pub mod db;
pub mod error;
pub mod models;
pub mod output;
pub mod rollover;
pub mod undo;
pub mod week;
