//! The static database catalog.
//!
//! Populated once at startup by the embedding application (which knows how
//! to discover formatted BLAST databases) and read-only afterwards, so it
//! can be shared across concurrent requests without synchronization.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bio::sequence::SequenceType;
use crate::error::Error;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub sequence_type: SequenceType,
    /// Path or identifier understood by the BLAST tools (`-db`).
    pub name: String,
    /// Human-readable title shown in the database picker.
    pub title: String,
}

/// A user's database choice: one type plus the keys (indices or names) of
/// the selected databases of that type.
#[derive(Debug, Clone)]
pub struct DatabaseSelection {
    pub sequence_type: SequenceType,
    pub keys: Vec<String>,
}

#[derive(Debug, Default)]
pub struct DatabaseCatalog {
    by_type: HashMap<SequenceType, Vec<Database>>,
}

impl DatabaseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one database. Only called during startup, before the
    /// catalog is shared.
    pub fn add(&mut self, sequence_type: SequenceType, name: &str, title: &str) {
        info!(%sequence_type, name, title, "registered database");
        self.by_type.entry(sequence_type).or_default().push(Database {
            sequence_type,
            name: name.to_string(),
            title: title.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.values().all(|dbs| dbs.is_empty())
    }

    /// Databases of one type, in registration order.
    pub fn get(&self, sequence_type: SequenceType) -> &[Database] {
        self.by_type
            .get(&sequence_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look a database up by positional index or by name.
    pub fn find(&self, sequence_type: SequenceType, key: &str) -> Option<&Database> {
        let dbs = self.get(sequence_type);
        if let Ok(index) = key.parse::<usize>() {
            return dbs.get(index);
        }
        dbs.iter().find(|db| db.name == key)
    }

    /// Resolve a selection into the space-joined file list handed to the
    /// external tool (`-db "a b c"`). Unknown keys fail validation; a
    /// selected database whose files have vanished from disk is reported
    /// as unreachable.
    pub fn resolve_selection(&self, selection: &DatabaseSelection) -> Result<String> {
        if selection.keys.is_empty() {
            return Err(Error::InvalidParameter {
                more_info: "no database selected".into(),
            });
        }
        let mut names = Vec::with_capacity(selection.keys.len());
        for key in &selection.keys {
            let db = self.find(selection.sequence_type, key).ok_or_else(|| {
                Error::InvalidParameter {
                    more_info: format!(
                        "unknown {} database: {}",
                        selection.sequence_type, key
                    ),
                }
            })?;
            if !database_reachable(&db.name) {
                return Err(Error::DatabaseUnreachable {
                    more_info: db.name.clone(),
                });
            }
            names.push(db.name.as_str());
        }
        Ok(names.join(" "))
    }
}

/// A formatted database `foo` exists as volume files like `foo.nin`,
/// `foo.pin`, `foo.nal`, ... so the bare name is checked against its parent
/// directory. Names without any path component (looked up via BLASTDB) are
/// assumed reachable.
fn database_reachable(name: &str) -> bool {
    let path = Path::new(name);
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            if !parent.is_dir() {
                return false;
            }
            let Some(stem) = path.file_name().and_then(|n| n.to_str()) else {
                return false;
            };
            match std::fs::read_dir(parent) {
                Ok(entries) => entries.filter_map(|e| e.ok()).any(|e| {
                    e.file_name()
                        .to_str()
                        .is_some_and(|n| n.starts_with(stem))
                }),
                Err(_) => false,
            }
        }
        _ => true,
    }
}
