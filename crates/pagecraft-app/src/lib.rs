//! Pagecraft Application
//!
//! Shells around the composition engine: they render the canvas, turn user
//! input into engine intents, pick files and provide the storage backend.

mod config;

pub use config::AppConfig;

#[cfg(not(target_arch = "wasm32"))]
mod command;
#[cfg(not(target_arch = "wasm32"))]
mod render;
#[cfg(not(target_arch = "wasm32"))]
mod shell;

#[cfg(not(target_arch = "wasm32"))]
pub use command::{Command, CommandError};
#[cfg(not(target_arch = "wasm32"))]
pub use render::render_canvas;
#[cfg(not(target_arch = "wasm32"))]
pub use shell::Shell;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
