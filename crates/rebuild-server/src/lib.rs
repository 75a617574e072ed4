//! rebuild-server library
//!
//! HTTP facade over the persisted reproducibility index:
//! - shields.io endpoint badges for modules, projects, and dependency trees
//! - redirects from a coordinate to its rebuild overview page
//! - server lifecycle management

pub mod api;
pub mod badge;
pub mod config;
pub mod error;
pub mod server;

pub use api::{create_router, AppState};
pub use config::ServeConfig;
pub use error::{ApiError, ServerError};
pub use server::Server;
