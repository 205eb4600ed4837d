pub mod app;
pub mod fetch;
pub mod filter;
pub mod ui;
