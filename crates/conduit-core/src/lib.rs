//! conduit-core - Core library for Conduit
//!
//! This crate contains the shared models, the action-driven store, the
//! persistence bridge, the REST client and its async action dispatchers, and
//! the pagination window used by the Conduit front ends.

pub mod actions;
pub mod api;
pub mod error;
pub mod models;
pub mod pagination;
pub mod persist;
pub mod render;
pub mod state;
pub mod store;
pub mod util;
pub mod validation;

pub use error::{Error, Result};
pub use models::{Article, AuthUser};
pub use state::{Action, ArticlesAction, ArticlesState, RootState, UserAction, UserState};
pub use store::Store;
