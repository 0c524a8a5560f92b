//! Action dispatch for the registration front end.
//!
//! Every operator interaction is an [`Action`]. [`App::handle`] runs it
//! through validation and the [`Repository`] in one synchronous pass and
//! returns a [`View`] describing what to show. Views that display records
//! are always rebuilt from a fresh [`Repository::list_all`], never from
//! state kept between actions.
//!
//! Storage failures stop here: they are logged and turned into
//! [`View::Failure`], so callers only ever see views.

mod listing;
mod render;
mod stats;

use std::path::Path;

use chrono::{Local, NaiveDate};
use tracing::{error, info};

use crate::collaborator::{Collaborator, CollaboratorForm, FieldError};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::storage::Repository;

pub use listing::{ListFilter, Listing};
pub use stats::Statistics;

/// An operator interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Register a collaborator from a filled-in form.
    Submit(CollaboratorForm),
    /// Show the collaborator list with filters applied.
    List(ListFilter),
    /// Delete the collaborator with this id.
    Delete(i64),
    /// Show aggregate statistics.
    Statistics,
    /// Show the descriptive content.
    About,
}

/// The outcome of an action, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// A collaborator was registered.
    Created {
        /// Id assigned by the store.
        id: i64,
    },
    /// The form was rejected; nothing was stored.
    Rejected(Vec<FieldError>),
    /// The collaborator list.
    Listing(Listing),
    /// The store holds no collaborators to list.
    NoCollaborators,
    /// A collaborator was deleted.
    Deleted {
        /// Id of the removed collaborator.
        id: i64,
    },
    /// Nothing was deleted.
    DeleteFailed {
        /// Id that was requested.
        id: i64,
    },
    /// Aggregate statistics.
    Statistics(Statistics),
    /// The store holds no collaborators to summarize.
    NoStatistics,
    /// The descriptive content, verbatim.
    About(String),
    /// An operation could not reach the store.
    Failure(String),
}

/// The registration front end.
#[derive(Debug, Clone)]
pub struct App {
    repository: Repository,
    content: String,
}

impl App {
    /// Create an app over a repository and its descriptive content.
    #[must_use]
    pub fn new(repository: Repository, content: impl Into<String>) -> Self {
        Self {
            repository,
            content: content.into(),
        }
    }

    /// Create the app described by `config`.
    ///
    /// The content file is read before the database is opened, so a missing
    /// content file leaves the data directory untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContentLoad`] if the content file cannot be read, or
    /// a storage error if the database cannot be opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        let content = read_content(&config.content_path())?;
        let repository = Repository::open(config.database_path())?;
        Ok(Self::new(repository, content))
    }

    /// The descriptive content shown by [`Action::About`].
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Run a single action.
    pub fn handle(&self, action: Action) -> View {
        self.handle_on(action, Local::now().date_naive())
    }

    /// Run a single action, validating birth dates against `today`.
    pub fn handle_on(&self, action: Action, today: NaiveDate) -> View {
        match action {
            Action::Submit(form) => self.submit(&form, today),
            Action::List(filter) => self.list(&filter),
            Action::Delete(id) => self.delete(id),
            Action::Statistics => self.statistics(),
            Action::About => View::About(self.content.clone()),
        }
    }

    /// Look up a listed collaborator by id.
    ///
    /// Returns `None` if the id is not stored or the store is unreachable.
    #[must_use]
    pub fn find(&self, id: i64) -> Option<Collaborator> {
        match self.repository.list_all() {
            Ok(all) => all.into_iter().find(|c| c.id == id),
            Err(e) => {
                error!("Failed to look up collaborator {}: {}", id, e);
                None
            }
        }
    }

    fn submit(&self, form: &CollaboratorForm, today: NaiveDate) -> View {
        let record = match form.validate(today) {
            Ok(record) => record,
            Err(errors) => return View::Rejected(errors),
        };

        match self.repository.insert(&record) {
            Ok(id) => {
                info!("Registered collaborator {}", id);
                View::Created { id }
            }
            Err(e) => failure("register collaborator", &e),
        }
    }

    fn list(&self, filter: &ListFilter) -> View {
        match self.repository.list_all() {
            Ok(all) if all.is_empty() => View::NoCollaborators,
            Ok(all) => View::Listing(Listing::build(&all, filter)),
            Err(e) => failure("list collaborators", &e),
        }
    }

    fn delete(&self, id: i64) -> View {
        match self.repository.delete(id) {
            Ok(true) => {
                info!("Deleted collaborator {}", id);
                View::Deleted { id }
            }
            Ok(false) => View::DeleteFailed { id },
            Err(e) => failure("delete collaborator", &e),
        }
    }

    fn statistics(&self) -> View {
        match self.repository.list_all() {
            Ok(all) if all.is_empty() => View::NoStatistics,
            Ok(all) => View::Statistics(Statistics::from_records(&all)),
            Err(e) => failure("compute statistics", &e),
        }
    }
}

fn read_content(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::ContentLoad {
        path: path.to_path_buf(),
        source,
    })
}

fn failure(operation: &str, err: &Error) -> View {
    error!("Failed to {}: {}", operation, err);
    View::Failure(format!("Could not {operation}: {err}"))
}
