pub mod analytics;
pub mod api;
pub mod charts;
pub mod cli;
pub mod config;
pub mod forms;
pub mod guard;
pub mod models;
pub mod reference;
pub mod view;
