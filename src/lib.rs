pub mod config;
pub mod machine;
pub mod repository;
pub mod service;
pub mod shell;

pub use machine::{execute, Machine, StepResult};
