pub mod config;
pub mod error;
pub mod model;
pub mod stake;
pub mod task_api;
pub mod wallet;
