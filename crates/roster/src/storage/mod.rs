//! Storage layer for roster.
//!
//! This module provides `SQLite`-based persistent storage for collaborator
//! records. The [`Repository`] only remembers where the database lives:
//! every operation opens its own connection, runs a single statement, and
//! closes it again. Nothing is held between calls, so a record listed by one
//! call may already be gone when the next call runs.

pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::collaborator::{Collaborator, NewCollaborator, DATE_FORMAT};
use crate::error::{Error, Result};

use schema::{CREATE_COLLABORATORS_TABLE, SELECT_COLUMNS, TIMESTAMP_FORMAT};

/// Record repository for collaborators.
///
/// Provides:
/// - Idempotent schema creation
/// - Single-row inserts returning the assigned id
/// - Listing, newest first
/// - Delete by id, reporting whether a row was removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Path to the database file.
    path: PathBuf,
}

impl Repository {
    /// Create a repository handle for the database at `path`.
    ///
    /// No file is touched until the first operation.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a repository and make sure its table exists.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created, the database
    /// cannot be opened, or schema creation fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let repository = Self::new(path);

        if let Some(parent) = repository.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        repository.ensure_schema()?;
        info!("Database ready at {}", repository.path.display());
        Ok(repository)
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh connection for a single operation.
    fn connect(&self) -> Result<Connection> {
        debug!("Opening database at {}", self.path.display());
        Connection::open(&self.path).map_err(|source| Error::DatabaseOpen {
            path: self.path.clone(),
            source,
        })
    }

    /// Create the collaborators table if it does not exist.
    ///
    /// Safe to call any number of times; existing rows are never touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the statement fails.
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(CREATE_COLLABORATORS_TABLE, [])?;
        Ok(())
    }

    /// Insert a collaborator and return its assigned id.
    ///
    /// The store assigns both `id` and `created_at`. The record is expected
    /// to have been validated by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the insert fails.
    pub fn insert(&self, record: &NewCollaborator) -> Result<i64> {
        let conn = self.connect()?;
        let birth_date = record
            .birth_date
            .map(|date| date.format(DATE_FORMAT).to_string());

        conn.execute(
            r"
            INSERT INTO colaboradores
                (nome_completo, endereco, bairro, cidade, estado, cep, telefone, data_nascimento, cargo)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
            params![
                record.full_name,
                record.address,
                record.district,
                record.city,
                record.state_code,
                record.postal_code,
                record.phone,
                birth_date,
                record.role,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Inserted collaborator with id {}", id);
        Ok(id)
    }

    /// List every collaborator, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the query fails.
    pub fn list_all(&self) -> Result<Vec<Collaborator>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM colaboradores ORDER BY id DESC"
        ))?;

        let collaborators = stmt
            .query_map([], Self::row_to_collaborator)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Listed {} collaborators", collaborators.len());
        Ok(collaborators)
    }

    /// Delete a collaborator by id.
    ///
    /// Returns `true` if a row was deleted, `false` if no such id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the delete fails.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.connect()?;
        let affected = conn.execute("DELETE FROM colaboradores WHERE id = ?1", [id])?;
        debug!("Delete of collaborator {} removed {} rows", id, affected);
        Ok(affected > 0)
    }

    /// Convert a database row to a Collaborator struct.
    fn row_to_collaborator(row: &rusqlite::Row) -> rusqlite::Result<Collaborator> {
        let birth_date: Option<String> = row.get(8)?;
        let birth_date = birth_date
            .map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT))
            .transpose()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;

        let created_at: String = row.get(10)?;
        let created_at = NaiveDateTime::parse_from_str(&created_at, TIMESTAMP_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?;

        Ok(Collaborator {
            id: row.get(0)?,
            full_name: row.get(1)?,
            address: row.get(2)?,
            district: row.get(3)?,
            city: row.get(4)?,
            state_code: row.get(5)?,
            postal_code: row.get(6)?,
            phone: row.get(7)?,
            birth_date,
            role: row.get(9)?,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repository() -> (TempDir, Repository) {
        let dir = TempDir::new().expect("failed to create temp dir");
        let repository =
            Repository::open(dir.path().join("colaboradores.db")).expect("failed to open");
        (dir, repository)
    }

    fn jane() -> NewCollaborator {
        NewCollaborator {
            full_name: "Jane Doe".to_string(),
            address: Some("Av. Paulista, 1000".to_string()),
            district: Some("Bela Vista".to_string()),
            city: Some("São Paulo".to_string()),
            state_code: Some("SP".to_string()),
            postal_code: Some("01310-100".to_string()),
            phone: Some("(11) 98888-7777".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1990, 2, 1),
            role: Some("Analista".to_string()),
        }
    }

    #[test]
    fn test_new_does_not_touch_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lazy.db");

        let repository = Repository::new(&path);
        assert_eq!(repository.path(), path);
        assert!(!path.exists());
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested/deeper/colaboradores.db");

        let repository = Repository::open(&nested).unwrap();
        assert!(nested.exists());
        assert!(repository.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_ensure_schema_idempotent() {
        let (_dir, repository) = create_test_repository();
        repository.insert(&jane()).unwrap();

        repository.ensure_schema().unwrap();
        repository.ensure_schema().unwrap();

        assert_eq!(repository.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_list_all_empty() {
        let (_dir, repository) = create_test_repository();
        assert!(repository.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_insert_and_list() {
        let (_dir, repository) = create_test_repository();
        let record = jane();

        let id = repository.insert(&record).unwrap();
        assert_eq!(id, 1);

        let listed = repository.list_all().unwrap();
        assert_eq!(listed.len(), 1);

        let stored = &listed[0];
        assert_eq!(stored.id, id);
        assert_eq!(stored.full_name, record.full_name);
        assert_eq!(stored.address, record.address);
        assert_eq!(stored.district, record.district);
        assert_eq!(stored.city, record.city);
        assert_eq!(stored.state_code, record.state_code);
        assert_eq!(stored.postal_code, record.postal_code);
        assert_eq!(stored.phone, record.phone);
        assert_eq!(stored.birth_date, record.birth_date);
        assert_eq!(stored.role, record.role);
    }

    #[test]
    fn test_absent_fields_stored_as_null() {
        let (_dir, repository) = create_test_repository();
        repository.insert(&NewCollaborator::named("Ana")).unwrap();

        let conn = Connection::open(repository.path()).unwrap();
        let nulls: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM colaboradores WHERE endereco IS NULL AND cargo IS NULL \
                 AND data_nascimento IS NULL AND data_cadastro IS NOT NULL",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(nulls, 1);

        let stored = &repository.list_all().unwrap()[0];
        assert!(stored.address.is_none());
        assert!(stored.birth_date.is_none());
        assert!(stored.role.is_none());
    }

    #[test]
    fn test_created_at_assigned_by_store() {
        let (_dir, repository) = create_test_repository();
        let before = chrono::Utc::now().naive_utc() - chrono::Duration::seconds(5);

        repository.insert(&jane()).unwrap();

        let stored = &repository.list_all().unwrap()[0];
        let after = chrono::Utc::now().naive_utc() + chrono::Duration::seconds(5);
        assert!(stored.created_at >= before);
        assert!(stored.created_at <= after);
    }

    #[test]
    fn test_list_all_newest_first() {
        let (_dir, repository) = create_test_repository();

        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(
                repository
                    .insert(&NewCollaborator::named(format!("Person {i}")))
                    .unwrap(),
            );
        }

        let listed: Vec<i64> = repository.list_all().unwrap().iter().map(|c| c.id).collect();
        assert!(listed.windows(2).all(|pair| pair[0] > pair[1]));

        ids.reverse();
        assert_eq!(listed, ids);
    }

    #[test]
    fn test_ids_increase() {
        let (_dir, repository) = create_test_repository();

        let first = repository.insert(&NewCollaborator::named("First")).unwrap();
        let second = repository.insert(&NewCollaborator::named("Second")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let (_dir, repository) = create_test_repository();

        let first = repository.insert(&NewCollaborator::named("First")).unwrap();
        assert!(repository.delete(first).unwrap());

        let second = repository.insert(&NewCollaborator::named("Second")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_delete() {
        let (_dir, repository) = create_test_repository();
        let keep = repository.insert(&NewCollaborator::named("Keep")).unwrap();
        let id = repository.insert(&jane()).unwrap();

        assert!(repository.delete(id).unwrap());

        let listed = repository.list_all().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, keep);
    }

    #[test]
    fn test_delete_twice() {
        let (_dir, repository) = create_test_repository();
        let id = repository.insert(&jane()).unwrap();

        assert!(repository.delete(id).unwrap());
        assert!(!repository.delete(id).unwrap());
        assert!(repository.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete_nonexistent() {
        let (_dir, repository) = create_test_repository();
        repository.insert(&jane()).unwrap();

        assert!(!repository.delete(99_999).unwrap());
        assert_eq!(repository.list_all().unwrap().len(), 1);
    }

    #[test]
    fn test_insert_without_schema_fails() {
        let dir = TempDir::new().unwrap();
        let repository = Repository::new(dir.path().join("bare.db"));

        let err = repository.insert(&jane()).unwrap_err();
        assert!(matches!(err, Error::DatabaseQuery(_)));
    }

    #[test]
    fn test_open_failure_reports_database_open() {
        let dir = TempDir::new().unwrap();
        let repository = Repository::new(dir.path().join("missing/dir/colaboradores.db"));

        let err = repository.list_all().unwrap_err();
        assert!(matches!(err, Error::DatabaseOpen { .. }));
    }

    #[test]
    fn test_unicode_content() {
        let (_dir, repository) = create_test_repository();
        let id = repository
            .insert(&NewCollaborator::named("João Estagiário Ñandú"))
            .unwrap();

        let stored = &repository.list_all().unwrap()[0];
        assert_eq!(stored.id, id);
        assert_eq!(stored.full_name, "João Estagiário Ñandú");
    }

    #[test]
    fn test_repositories_share_the_file() {
        let (_dir, repository) = create_test_repository();
        let other = Repository::new(repository.path());

        let id = repository.insert(&jane()).unwrap();
        assert_eq!(other.list_all().unwrap()[0].id, id);
        assert!(other.delete(id).unwrap());
        assert!(!repository.delete(id).unwrap());
    }
}
