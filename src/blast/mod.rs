//! BLAST method enumeration and pre-flight compatibility validation.

pub mod invoker;
pub mod retrieval;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bio::sequence::SequenceType;
use crate::config::Config;
use crate::error::Error;
use crate::Result;

/// The search modes exposed by the external BLAST+ suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Blastn,
    Blastp,
    Blastx,
    Tblastn,
    Tblastx,
}

pub const ALL_METHODS: [Method; 5] = [
    Method::Blastn,
    Method::Blastp,
    Method::Blastx,
    Method::Tblastn,
    Method::Tblastx,
];

impl Method {
    pub fn name(&self) -> &'static str {
        match self {
            Method::Blastn => "blastn",
            Method::Blastp => "blastp",
            Method::Blastx => "blastx",
            Method::Tblastn => "tblastn",
            Method::Tblastx => "tblastx",
        }
    }

    /// The database type this method searches against.
    pub fn required_database_type(&self) -> SequenceType {
        match self {
            Method::Blastn | Method::Tblastn | Method::Tblastx => SequenceType::Nucleotide,
            Method::Blastp | Method::Blastx => SequenceType::Protein,
        }
    }

    /// The query type this method expects.
    pub fn expected_query_type(&self) -> SequenceType {
        match self {
            Method::Blastn | Method::Blastx | Method::Tblastx => SequenceType::Nucleotide,
            Method::Blastp | Method::Tblastn => SequenceType::Protein,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Method> {
        match s {
            "blastn" => Ok(Method::Blastn),
            "blastp" => Ok(Method::Blastp),
            "blastx" => Ok(Method::Blastx),
            "tblastn" => Ok(Method::Tblastn),
            "tblastx" => Ok(Method::Tblastx),
            other => Err(Error::InvalidParameter {
                more_info: format!("unknown method: {}", other),
            }),
        }
    }
}

/// Pre-flight check that the chosen method, database type, and submitted
/// sequence type go together. Runs before any process is spawned.
///
/// The sequence-type/method check is diagnostic only unless
/// `config.enforce_query_type` is set; the permissive behavior is
/// long-standing and some users rely on it for unusual queries.
pub fn validate(
    method: Method,
    database_type: SequenceType,
    sequence_type: SequenceType,
    config: &Config,
) -> Result<()> {
    debug!(%sequence_type, %database_type, %method, "validating search");

    let required = method.required_database_type();
    if required != database_type {
        return Err(Error::InvalidParameter {
            more_info: format!(
                "cannot {} against a {} database, need {}",
                method, database_type, required
            ),
        });
    }

    if method.expected_query_type() != sequence_type {
        warn!(
            %method,
            %sequence_type,
            "query type does not match the method's expected type"
        );
        if config.enforce_query_type {
            return Err(Error::InvalidParameter {
                more_info: format!("cannot {} a {} query", method, sequence_type),
            });
        }
    }

    Ok(())
}
