//! `roster` - A small registry of collaborator records
//!
//! This library provides record storage in a local `SQLite` file, input
//! validation, and an interactive session for registering, listing, filtering,
//! and deleting collaborators.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod cli;
pub mod collaborator;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod storage;
pub mod validate;

pub use app::{Action, App, ListFilter, View};
pub use collaborator::{Collaborator, CollaboratorForm, FieldError, NewCollaborator};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use session::Session;
pub use storage::Repository;
pub use validate::{is_valid_phone, is_valid_postal_code};
