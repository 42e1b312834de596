pub mod app;
pub mod command;
pub mod input;
pub mod message;
pub mod render;
pub mod text_input;
pub mod theme;
pub mod update;
pub mod viewport;

pub use app::run;
