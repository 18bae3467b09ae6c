//! Core of a BLAST search front-end: validates a submitted sequence against
//! the chosen method and databases, runs the external BLAST+ tool, rewrites
//! the textual report so every hit is a retrieval hyperlink, generates
//! cross-reference links into external genome browsers, and fetches original
//! FASTA records via `blastdbcmd`.
//!
//! The HTTP layer, templating, configuration loading, and executable
//! discovery live in the embedding application; this crate exposes
//! [`SearchService`] as the boundary they call.

pub mod bio;
pub mod blast;
pub mod config;
pub mod db;
pub mod error;
pub mod links;
pub mod report;
pub mod search;

pub use crate::bio::sequence::{Query, SequenceType};
pub use crate::blast::invoker::BlastInvoker;
pub use crate::blast::Method;
pub use crate::config::Config;
pub use crate::db::{Database, DatabaseCatalog, DatabaseSelection};
pub use crate::error::Error;
pub use crate::links::LinkDescriptor;
pub use crate::report::LinkedReport;
pub use crate::search::SearchService;

pub type Result<T> = std::result::Result<T, Error>;
