//! Cross-reference link generation for alignment hits.
//!
//! A generator is a pure function of one hit (identifier plus HSPs) to an
//! optional [`LinkDescriptor`]; inapplicable hits yield `None`, never an
//! error. New targets plug in by implementing [`LinkGenerator`].

pub mod jbrowse;
pub mod lis;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::report::hsp::{aggregate_region, Hsp};

pub use jbrowse::JbrowseLinker;
pub use lis::LisLinkout;

/// Gene-annotation records follow the `...gnmN.annN...` naming
/// convention; everything else is a plain genomic region.
static GENE_RECORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"gnm.*\.ann").unwrap());

/// One outbound hyperlink, ready for the results template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDescriptor {
    pub title: String,
    pub url: String,
    /// Left-right ordering among a hit's links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// FontAwesome icon class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Gene,
    Region,
}

impl RecordKind {
    pub fn of(id: &str) -> RecordKind {
        if GENE_RECORD.is_match(id) {
            RecordKind::Gene
        } else {
            RecordKind::Region
        }
    }
}

/// One hit with everything a generator may need.
#[derive(Debug, Clone)]
pub struct Hit {
    pub id: String,
    pub query_id: String,
    pub hsps: Vec<Hsp>,
}

impl Hit {
    pub fn kind(&self) -> RecordKind {
        RecordKind::of(&self.id)
    }

    /// Hit-side min-start/max-end across all HSPs. `None` when the hit
    /// carries no HSPs.
    pub fn coordinates(&self) -> Option<(u64, u64)> {
        aggregate_region(&self.hsps)
    }
}

pub trait LinkGenerator {
    fn generate(&self, hit: &Hit) -> Option<LinkDescriptor>;
}

/// Run every registered generator against one hit and return the produced
/// links sorted by their declared order.
pub fn generate_all(hit: &Hit) -> Vec<LinkDescriptor> {
    let generators: [&dyn LinkGenerator; 2] = [&LisLinkout, &JbrowseLinker];
    let mut links: Vec<LinkDescriptor> = generators
        .iter()
        .filter_map(|g| g.generate(hit))
        .collect();
    links.sort_by_key(|link| link.order.unwrap_or(u32::MAX));
    links
}
