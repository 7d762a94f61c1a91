pub mod config;
pub mod events;
pub mod macros;
pub mod stage;
pub mod sys;
