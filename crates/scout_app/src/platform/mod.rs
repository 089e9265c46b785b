mod app;
mod cli;
mod logging;
mod render;
mod roots;
mod settings;

pub use app::run_app;
