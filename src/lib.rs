// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod game;
pub mod history;
pub mod input;
pub mod results;
pub mod runtime;
pub mod selector;
pub mod session;
pub mod stats;
pub mod util;
pub mod vocabulary;
