//! Parsing of the raw alignment report and rewriting of hit lines into
//! retrieval hyperlinks.

pub mod hsp;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::Error;
use crate::Result;

/// A hit header as formatted by a database built with `-parse_seqids`:
/// '>' immediately followed by a non-space identifier. Databases built
/// without it put a space after '>', and those lines deliberately fall
/// through unlinked.
static HIT_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^>(\S+)").unwrap());

/// Database tags whose following field is the accession in composite
/// NCBI-style ids.
const DB_TAGS: [&str; 9] = ["ref", "gb", "emb", "dbj", "sp", "tr", "pir", "prf", "pdb"];

#[derive(Debug)]
pub struct LinkedReport {
    /// The report body with every hit identifier wrapped in a retrieval
    /// anchor, preceded by one aggregate link when any hit was found.
    pub html: String,
    /// Hit ids in first-seen order; duplicates are kept here and folded
    /// at the retrieval boundary.
    pub retrievable_ids: Vec<String>,
}

/// The retrievable part of a composite identifier. For NCBI-style ids the
/// accession follows a database tag (`gi|123|ref|ABC_1|` → `ABC_1`);
/// simple `db|id` pairs prefer the second field; plain ids pass through.
pub fn extract_accession(complete_id: &str) -> &str {
    if !complete_id.contains('|') {
        return complete_id;
    }
    let parts: Vec<&str> = complete_id.split('|').collect();
    for (i, part) in parts.iter().enumerate() {
        if DB_TAGS.contains(part) && i + 1 < parts.len() && !parts[i + 1].is_empty() {
            return parts[i + 1];
        }
    }
    if parts.len() >= 2 && !parts[1].is_empty() {
        parts[1]
    } else {
        parts[0]
    }
}

/// Colon-prefixed path segments pack several space-separated tokens into
/// one segment; existing links depend on this exact shape.
fn retrieval_url(ids: &str, databases_used: &str) -> String {
    format!("/get_sequence/:{}/:{}", ids, databases_used)
}

/// Scan the raw report line by line, rewriting each hit header so the bare
/// identifier becomes a retrieval anchor, and collect every linked id.
/// `databases_used` is the space-joined file list the search ran against.
pub fn parse_and_link(raw: &str, databases_used: &str) -> Result<LinkedReport> {
    if raw.trim().is_empty() {
        return Err(Error::Input {
            more_info: "empty result, maybe your query was invalid?".into(),
        });
    }

    let mut formatted = String::with_capacity(raw.len());
    let mut retrievable_ids: Vec<String> = Vec::new();

    for line in raw.split_inclusive('\n') {
        let Some(caps) = HIT_HEADER.captures(line) else {
            formatted.push_str(line);
            continue;
        };
        let id = extract_accession(&caps[1]).to_string();
        debug!(id, "linking hit");
        let anchor = format!(
            "<a href='{}' title='Full {} FASTA sequence'>{}</a>",
            retrieval_url(&id, databases_used),
            id,
            id
        );
        // One anchor per original identifier occurrence.
        formatted.push_str(&line.replacen(id.as_str(), &anchor, 1));
        retrievable_ids.push(id);
    }

    let mut html = String::new();
    if !retrievable_ids.is_empty() {
        let joined = retrievable_ids.join(" ");
        html.push_str(&format!(
            "<p><a href='{}'>FASTA of {} retrievable hit(s)</a></p>",
            retrieval_url(&joined, databases_used),
            retrievable_ids.len()
        ));
    }
    html.push_str("<pre><code>");
    html.push_str(&formatted);
    html.push_str("</code></pre>");

    Ok(LinkedReport {
        html,
        retrievable_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_output_is_an_input_error() {
        let err = parse_and_link("", "db").unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert!(err.more_info().contains("empty result"));

        assert!(parse_and_link("   \n  \n", "db").is_err());
    }

    #[test]
    fn accession_extraction_prefers_the_tagged_field() {
        assert_eq!(extract_accession("gi|123|ref|ABC_1|"), "ABC_1");
        assert_eq!(extract_accession("sp|P12345|PROT1_HUMAN"), "P12345");
        assert_eq!(extract_accession("lcl|Phvul.001G001100"), "Phvul.001G001100");
        assert_eq!(extract_accession("plain_id.1"), "plain_id.1");
        assert_eq!(extract_accession("odd|"), "odd");
    }

    #[test]
    fn hit_line_gains_a_retrieval_anchor() {
        let raw = ">gi|123|ref|ABC_1| hypothetical protein\nScore = 55.5\n";
        let report = parse_and_link(raw, "db_a db_b").unwrap();
        assert_eq!(report.retrievable_ids, vec!["ABC_1"]);
        assert!(report.html.contains(
            "<a href='/get_sequence/:ABC_1/:db_a db_b' title='Full ABC_1 FASTA sequence'>ABC_1</a>"
        ));
        // Non-id content is untouched.
        assert!(report.html.contains(" hypothetical protein"));
        assert!(report.html.contains("Score = 55.5"));
    }

    #[test]
    fn one_anchor_per_identifier_occurrence() {
        let raw = ">seq1 description of seq1\nACGT\n";
        let report = parse_and_link(raw, "db").unwrap();
        assert_eq!(report.html.matches("<a href='/get_sequence/:seq1/").count(), 1);
        // The second mention of seq1, in the description, is untouched.
        assert!(report.html.contains("description of seq1"));
    }

    #[test]
    fn degraded_headers_pass_through_silently() {
        // A space after '>' means the database lacked -parse_seqids.
        let raw = "> unparsed hit description\nScore = 10\n";
        let report = parse_and_link(raw, "db").unwrap();
        assert!(report.retrievable_ids.is_empty());
        assert!(!report.html.contains("<a "));
        assert!(report.html.contains("> unparsed hit description"));
    }

    #[test]
    fn aggregate_link_precedes_the_body_and_counts_hits() {
        let raw = ">hit1 one\nACGT\n>hit2 two\nACGT\n>hit1 again\n";
        let report = parse_and_link(raw, "db_a").unwrap();
        assert_eq!(report.retrievable_ids, vec!["hit1", "hit2", "hit1"]);

        let aggregate =
            "<p><a href='/get_sequence/:hit1 hit2 hit1/:db_a'>FASTA of 3 retrievable hit(s)</a></p>";
        assert!(report.html.starts_with(aggregate));
        assert!(report.html.find(aggregate).unwrap() < report.html.find("<pre><code>").unwrap());
    }

    #[test]
    fn reports_without_hits_have_no_aggregate_link() {
        let raw = "BLASTP 2.12.0+\nNo hits found\n";
        let report = parse_and_link(raw, "db").unwrap();
        assert!(report.retrievable_ids.is_empty());
        assert_eq!(
            report.html,
            "<pre><code>BLASTP 2.12.0+\nNo hits found\n</code></pre>"
        );
    }

    #[test]
    fn line_order_is_preserved() {
        let raw = "header\n>h1 a\nmiddle\n>h2 b\ntrailer";
        let report = parse_and_link(raw, "db").unwrap();
        let body = report.html.find("<pre><code>").unwrap();
        let p1 = report.html.find("header").unwrap();
        let p2 = report.html[body..].find(":h1/").unwrap() + body;
        let p3 = report.html.find("middle").unwrap();
        let p4 = report.html[body..].find(":h2/").unwrap() + body;
        let p5 = report.html.find("trailer").unwrap();
        assert!(p1 < p2 && p2 < p3 && p3 < p4 && p4 < p5);
    }
}
