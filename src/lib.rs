// Library surface for the binary, headless runs and integration tests.
pub mod app;
pub mod app_dirs;
pub mod board;
pub mod celebration;
pub mod character;
pub mod config;
pub mod curriculum;
pub mod entry;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod metadata;
pub mod progress;
pub mod reward;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod ui;
pub mod widget;
