//! High-scoring pair data and the numeric formatting shared by link
//! generators.

use serde::{Deserialize, Serialize};

/// One high-scoring aligned segment between the query and a hit. A hit may
/// carry several of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hsp {
    pub number: u32,
    /// Hit-side start as reported by the tool; may exceed `send` on the
    /// reverse strand.
    pub sstart: u64,
    pub send: u64,
    pub sframe: i32,
    pub evalue: f64,
    pub bit_score: f64,
    pub score: u64,
    pub identity: u64,
    pub positives: u64,
    pub gaps: u64,
    pub length: u64,
}

impl Hsp {
    /// Hit-side coordinates with start guaranteed ≤ end.
    pub fn region(&self) -> (u64, u64) {
        if self.sstart > self.send {
            (self.send, self.sstart)
        } else {
            (self.sstart, self.send)
        }
    }

    /// Bit score rounded to two decimals.
    pub fn rounded_bit_score(&self) -> f64 {
        (self.bit_score * 100.0).round() / 100.0
    }

    /// E-value for display: the literal `0` when zero, scientific
    /// notation otherwise.
    pub fn formatted_evalue(&self) -> String {
        if self.evalue > 0.0 {
            format!("{:.2e}", self.evalue)
        } else {
            "0".to_string()
        }
    }

    pub fn formatted_identity(&self) -> String {
        ratio(self.identity, self.length)
    }

    pub fn formatted_positives(&self) -> String {
        ratio(self.positives, self.length)
    }

    pub fn formatted_gaps(&self) -> String {
        ratio(self.gaps, self.length)
    }
}

/// `"<count>/<total> (<percent>%)"` with the percentage rounded to one
/// decimal place.
fn ratio(count: u64, total: u64) -> String {
    let percent = if total == 0 {
        0.0
    } else {
        (1000.0 * count as f64 / total as f64).round() / 10.0
    };
    format!("{}/{} ({:.1}%)", count, total, percent)
}

/// Min-start/max-end across a hit's HSPs, each normalized first. `None`
/// for an empty list.
pub fn aggregate_region(hsps: &[Hsp]) -> Option<(u64, u64)> {
    let mut bounds: Option<(u64, u64)> = None;
    for hsp in hsps {
        let (start, end) = hsp.region();
        bounds = Some(match bounds {
            None => (start, end),
            Some((min, max)) => (min.min(start), max.max(end)),
        });
    }
    bounds
}
