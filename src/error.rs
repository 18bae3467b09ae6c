//! Error taxonomy shared by every component.
//!
//! Each variant carries enough for the embedding application's error
//! template: an HTTP-style status, a short title, a human message, and
//! free-form `more_info` detail (program output, offending value, ...).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A selected database is missing from the filesystem, e.g. it was
    /// deleted after the catalog was built.
    #[error("Sequence database unreachable: {more_info}")]
    DatabaseUnreachable { more_info: String },

    /// A FASTA sequence id supplied for retrieval does not look like a
    /// sequence id. Checked before anything is handed to a subprocess.
    #[error("Sequence ID invalid: {more_info}")]
    InvalidSequenceId { more_info: String },

    /// A request parameter (method name, database key, ...) is not one of
    /// the accepted values.
    #[error("Invalid parameter: {more_info}")]
    InvalidParameter { more_info: String },

    /// Malformed or empty search input/output.
    #[error("Input error: {more_info}")]
    Input { more_info: String },

    /// External process or environment failure.
    #[error("System error: {more_info}")]
    System { more_info: String },

    /// Retrieval returned a different number of records than requested.
    #[error("Retrieval integrity error: {more_info}")]
    Integrity { more_info: String },

    #[error("Not found")]
    NotFound,
}

impl Error {
    pub fn http_status(&self) -> u16 {
        match self {
            Error::DatabaseUnreachable { .. }
            | Error::InvalidSequenceId { .. }
            | Error::InvalidParameter { .. } => 422,
            Error::Input { .. } => 400,
            Error::NotFound => 404,
            Error::System { .. } | Error::Integrity { .. } => 500,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Error::DatabaseUnreachable { .. } => "Sequence database unreachable",
            Error::InvalidSequenceId { .. } => "Sequence ID invalid",
            Error::InvalidParameter { .. } => "Invalid parameter",
            Error::Input { .. } => "Input error",
            Error::System { .. } => "System error",
            Error::Integrity { .. } => "Retrieval integrity error",
            Error::NotFound => "Not found",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Error::DatabaseUnreachable { .. } => {
                "The action you're trying to perform is not possible because \
                 the database is unreachable. This can happen if the database \
                 has been deleted or moved."
            }
            Error::InvalidSequenceId { .. } => {
                "The action you're trying to perform is not possible because \
                 one of the FASTA ids seems to be invalid."
            }
            Error::InvalidParameter { .. } => {
                "The action you're trying to perform is not possible because \
                 one of the provided parameters is invalid."
            }
            Error::Input { .. } => {
                "Looks like there's a problem with the query sequence or the \
                 selected databases. Details of the error are included below."
            }
            Error::System { .. } => {
                "Looks like there is a problem with the server. Try again \
                 after a while. If this message persists, please report it."
            }
            Error::Integrity { .. } => {
                "The number of sequences fetched does not match the number \
                 requested. Details of the mismatch are included below."
            }
            Error::NotFound => "The requested resource could not be found.",
        }
    }

    pub fn more_info(&self) -> &str {
        match self {
            Error::DatabaseUnreachable { more_info }
            | Error::InvalidSequenceId { more_info }
            | Error::InvalidParameter { more_info }
            | Error::Input { more_info }
            | Error::System { more_info }
            | Error::Integrity { more_info } => more_info,
            Error::NotFound => "",
        }
    }

    /// True for user-correctable errors (HTTP 422 class).
    pub fn is_validation(&self) -> bool {
        self.http_status() == 422
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::System {
            more_info: err.to_string(),
        }
    }
}
