pub mod action;
pub mod app;
pub mod config;
pub mod event;
pub mod format;
pub mod hierarchy;
pub mod logging;
pub mod report;
pub mod system;
pub mod ui;
pub mod visualize;
