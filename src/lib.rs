pub mod cache;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod fetcher;
pub mod logging;
pub mod models;
pub mod panel;
pub mod retry;
pub mod scheduler;
pub mod task;
pub mod ticker;
pub mod widgets;
