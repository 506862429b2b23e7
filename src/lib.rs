pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod list_view;
pub mod location;
pub mod logging;
pub mod map_view;
pub mod runtime;
pub mod store;
pub mod ui;
pub mod workout;
