pub mod client;
pub mod resource;
pub mod task;

pub use client::*;
pub use resource::*;
pub use task::*;
