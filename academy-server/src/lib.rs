//! academy-server: ordered content collections for the academy CMS
//!
//! Team members, student projects and per-course module assignments all
//! carry a dense zero-based `sort_order` kept consistent by [`ordering`].

pub mod api;
pub mod config;
pub mod ordering;
pub mod roster;
pub mod state;
pub mod store;
pub mod utils;

pub use config::Config;
pub use state::{AppState, Backend};
