//! Retrieval of original FASTA records via `blastdbcmd`.

use std::process::Command;

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::blast::invoker::BlastInvoker;
use crate::error::Error;
use crate::Result;

/// Ids come straight from the frontend; anything outside this pattern is
/// rejected before it can reach a subprocess argument.
static SAFE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._|-]+$").unwrap());

impl BlastInvoker {
    /// Fetch the original FASTA records for `ids` from `databases`.
    ///
    /// The alignment report does not say which database a hit came from,
    /// so when several databases were searched each one is asked for the
    /// full id set; a database containing none of them is expected and
    /// only logged. The concatenated result must hold exactly one record
    /// per requested id.
    pub fn retrieve(&self, ids: &[String], databases: &[String]) -> Result<String> {
        // A multi-query search can report the same hit more than once.
        let unique: IndexSet<&str> = ids.iter().map(String::as_str).collect();
        if unique.is_empty() {
            return Err(Error::InvalidParameter {
                more_info: "no sequence ids requested".into(),
            });
        }
        if databases.is_empty() {
            return Err(Error::InvalidParameter {
                more_info: "no retrieval databases given".into(),
            });
        }
        for id in &unique {
            if !SAFE_ID.is_match(id) {
                return Err(Error::InvalidSequenceId {
                    more_info: (*id).to_string(),
                });
            }
        }

        let entries = unique.iter().copied().collect::<Vec<_>>().join(",");
        info!(ids = %entries, "retrieving sequences");

        let mut found = String::new();
        for database in databases {
            let mut cmd = Command::new(self.blastdbcmd());
            cmd.arg("-db").arg(database).arg("-entry").arg(&entries);
            match self.execute(cmd, "blastdbcmd") {
                Ok(output) => {
                    found.push_str(&String::from_utf8_lossy(&output.stdout));
                }
                Err(err) => {
                    // Absence in one database is normal when several were
                    // searched; the count check below catches real losses.
                    debug!(
                        database,
                        error = %err,
                        "requested ids not found in database"
                    );
                }
            }
        }

        let record_count = found.matches('>').count();
        if record_count != unique.len() {
            return Err(Error::Integrity {
                more_info: format!(
                    "expected {} sequence(s) for ids [{}], found {}",
                    unique.len(),
                    entries,
                    record_count
                ),
            });
        }

        Ok(found)
    }
}
