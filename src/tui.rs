//! Terminal host for the search palette.

mod app;
mod screens;

pub use app::run;
