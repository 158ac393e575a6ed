pub mod config;
pub mod constants;
pub mod content;
pub mod engine;
pub mod gamification;
pub mod logging;
pub mod store;
