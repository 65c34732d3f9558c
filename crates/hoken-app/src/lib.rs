//! Application layer - config, application state, session controller

pub mod config;
pub mod repository;
pub mod session;
pub mod state;

pub use config::Config;
pub use session::{Pending, Resolved, Session};
pub use state::{Action, AppState, Operation, RequestTicket, View};
