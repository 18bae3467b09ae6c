//! Sequence classification and query normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::Result;

/// Fraction of residues that must look like nucleotide codes for a record
/// to be classified as nucleotide.
const NUCLEOTIDE_THRESHOLD: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceType {
    Nucleotide,
    Protein,
}

impl std::fmt::Display for SequenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceType::Nucleotide => write!(f, "nucleotide"),
            SequenceType::Protein => write!(f, "protein"),
        }
    }
}

impl SequenceType {
    /// Classify one residue body (no FASTA header) by character
    /// composition. Case and whitespace insensitive; gap (`-`) and stop
    /// (`*`) markers are ignored.
    pub fn detect(residues: &str) -> Result<SequenceType> {
        let mut total = 0usize;
        let mut nucleotide_like = 0usize;
        for c in residues.chars() {
            if !c.is_ascii_alphabetic() {
                continue;
            }
            total += 1;
            if matches!(c.to_ascii_uppercase(), 'A' | 'C' | 'G' | 'T' | 'U' | 'N') {
                nucleotide_like += 1;
            }
        }
        if total == 0 {
            return Err(Error::InvalidParameter {
                more_info: "sequence is empty or contains no recognizable residues".into(),
            });
        }
        let fraction = nucleotide_like as f64 / total as f64;
        if fraction > NUCLEOTIDE_THRESHOLD {
            Ok(SequenceType::Nucleotide)
        } else {
            Ok(SequenceType::Protein)
        }
    }

    /// Classify a whole submission, which may hold several FASTA records.
    /// Records of differing types in one submission are rejected.
    pub fn detect_fasta(text: &str) -> Result<SequenceType> {
        let mut detected: Option<SequenceType> = None;
        let mut record = String::new();

        let classify = |record: &mut String, detected: &mut Option<SequenceType>| -> Result<()> {
            if record.trim().is_empty() {
                record.clear();
                return Ok(());
            }
            let t = SequenceType::detect(record)?;
            record.clear();
            match *detected {
                None => *detected = Some(t),
                Some(prev) if prev != t => {
                    return Err(Error::InvalidParameter {
                        more_info: format!(
                            "submission mixes {} and {} sequences",
                            prev, t
                        ),
                    })
                }
                Some(_) => {}
            }
            Ok(())
        };

        for line in text.lines() {
            if line.starts_with('>') {
                classify(&mut record, &mut detected)?;
            } else {
                record.push_str(line);
            }
        }
        classify(&mut record, &mut detected)?;

        detected.ok_or_else(|| Error::InvalidParameter {
            more_info: "sequence is empty or contains no recognizable residues".into(),
        })
    }
}

/// A normalized query: guaranteed to start with a FASTA header and tagged
/// with its inferred sequence type.
#[derive(Debug, Clone)]
pub struct Query {
    text: String,
    sequence_type: SequenceType,
}

impl Query {
    /// Normalize raw submitted text. Headerless submissions get a
    /// synthesized header recording who submitted them and when, so the
    /// report does not show an anonymous empty query line.
    pub fn normalize(raw: &str, origin: &str, submitted_at: DateTime<Utc>) -> Result<Query> {
        let trimmed = raw.trim_start();
        if trimmed.trim().is_empty() {
            return Err(Error::InvalidParameter {
                more_info: "sequence is empty or contains no recognizable residues".into(),
            });
        }

        let sequence_type = SequenceType::detect_fasta(trimmed)?;
        debug!(%sequence_type, "classified query");

        let text = if trimmed.starts_with('>') {
            trimmed.to_string()
        } else {
            format!(
                ">Submitted_By_{}_at_{}\n{}",
                origin,
                submitted_at.format("%y%m%d-%H:%M:%S"),
                trimmed
            )
        };

        Ok(Query {
            text,
            sequence_type,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sequence_type(&self) -> SequenceType {
        self.sequence_type
    }
}
