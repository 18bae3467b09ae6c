//! End-to-end orchestration: the two entry points the web layer calls.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::bio::sequence::Query;
use crate::blast::invoker::BlastInvoker;
use crate::blast::{validate, Method};
use crate::config::Config;
use crate::db::{DatabaseCatalog, DatabaseSelection};
use crate::report::{parse_and_link, LinkedReport};
use crate::Result;

/// Owns the immutable database catalog and the invoker; one instance is
/// shared across requests (nothing here is mutated after construction).
pub struct SearchService {
    catalog: DatabaseCatalog,
    invoker: BlastInvoker,
    config: Config,
}

impl SearchService {
    pub fn new(catalog: DatabaseCatalog, invoker: BlastInvoker, config: Config) -> Self {
        let invoker = invoker.with_timeout(config.timeout());
        Self {
            catalog,
            invoker,
            config,
        }
    }

    pub fn catalog(&self) -> &DatabaseCatalog {
        &self.catalog
    }

    /// Run one search: classify, validate, invoke, link. Validation
    /// failures return before any external process is started. The result
    /// is an HTML fragment ready for the results template.
    pub fn search(
        &self,
        method_name: &str,
        selection: &DatabaseSelection,
        raw_query: &str,
        origin: &str,
        submitted_at: DateTime<Utc>,
    ) -> Result<LinkedReport> {
        let method: Method = method_name.parse()?;
        let query = Query::normalize(raw_query, origin, submitted_at)?;
        validate(
            method,
            selection.sequence_type,
            query.sequence_type(),
            &self.config,
        )?;
        let db_file_list = self.catalog.resolve_selection(selection)?;

        let raw = self.invoker.run(method, &db_file_list, &query)?;
        info!(%method, db = %db_file_list, "search finished");
        parse_and_link(&raw, &db_file_list)
    }

    /// Fetch original FASTA records for previously linked hits. Backs the
    /// legacy `/get_sequence/:<ids>/:<databases>` route; both segments are
    /// space-separated token packs.
    pub fn retrieve_sequences(&self, ids: &[String], databases: &[String]) -> Result<String> {
        self.invoker.retrieve(ids, databases)
    }
}
