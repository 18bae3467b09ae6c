//! JBrowse2 session links: one feature per HSP, embedded as a JSON
//! session-track payload on the viewer URL.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;
use url::Url;

use crate::links::{Hit, LinkDescriptor, LinkGenerator, RecordKind};

const VIEWER: &str = "https://dev.peanutbase.org/tools/jbrowse2/";
const TRACK_ID: &str = "sequenceserver_track";

/// The assembly a region belongs to is the id prefix up to and including
/// the `gnmN` component.
static ASSEMBLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.+gnm\d+").unwrap());

pub struct JbrowseLinker;

impl LinkGenerator for JbrowseLinker {
    fn generate(&self, hit: &Hit) -> Option<LinkDescriptor> {
        // Genomic regions only; gene records have no browser coordinates.
        if hit.kind() == RecordKind::Gene {
            return None;
        }
        // Ids outside the assembly naming scheme cannot be scoped to a
        // viewer session; skip them rather than fail.
        let assembly = ASSEMBLY.find(&hit.id)?.as_str();
        let (loc_start, loc_end) = hit.coordinates()?;

        let features: Vec<serde_json::Value> = hit
            .hsps
            .iter()
            .map(|hsp| {
                let uid = format!("{}-{}", hit.query_id, hsp.number);
                let (start, end) = hsp.region();
                json!({
                    "uniqueId": uid,
                    "refName": hit.id,
                    "start": start,
                    "end": end,
                    "name": uid,
                    "assembly": assembly,
                    "bit_score": hsp.rounded_bit_score(),
                    "score": hsp.score,
                    "evalue": hsp.formatted_evalue(),
                    "identity": hsp.formatted_identity(),
                    "positives": hsp.formatted_positives(),
                    "gaps": hsp.formatted_gaps(),
                    "hit_frame": hsp.sframe,
                })
            })
            .collect();

        let session_tracks = json!([{
            "type": "FeatureTrack",
            "trackId": TRACK_ID,
            "name": "Alignment Hits",
            "assemblyNames": [assembly],
            "adapter": {
                "type": "FromConfigAdapter",
                "features": features,
            },
        }]);

        let mut url = Url::parse(VIEWER).ok()?;
        url.query_pairs_mut()
            .append_pair("loc", &format!("{}:{}-{}", hit.id, loc_start, loc_end))
            .append_pair("assembly", assembly)
            .append_pair("tracks", TRACK_ID)
            .append_pair("sessionTracks", &session_tracks.to_string());

        Some(LinkDescriptor {
            title: "JBrowse2".to_string(),
            url: url.to_string(),
            order: Some(3),
            class: None,
            icon: Some("fa-external-link".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::hsp::Hsp;
    use pretty_assertions::assert_eq;

    fn hsp(number: u32, sstart: u64, send: u64, evalue: f64) -> Hsp {
        Hsp {
            number,
            sstart,
            send,
            sframe: -1,
            evalue,
            bit_score: 55.456,
            score: 120,
            identity: 98,
            positives: 99,
            gaps: 1,
            length: 100,
        }
    }

    fn region_hit(hsps: Vec<Hsp>) -> Hit {
        Hit {
            id: "aradu.V14167.gnm2.Chr03".into(),
            query_id: "query_1".into(),
            hsps,
        }
    }

    fn payload(link: &LinkDescriptor) -> serde_json::Value {
        let url = Url::parse(&link.url).unwrap();
        let raw = url
            .query_pairs()
            .find(|(k, _)| k == "sessionTracks")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn gene_records_are_skipped() {
        let hit = Hit {
            id: "phavu.G19833.gnm2.ann1.Phvul.001G001100".into(),
            query_id: "q".into(),
            hsps: vec![hsp(1, 1, 10, 1e-5)],
        };
        assert!(JbrowseLinker.generate(&hit).is_none());
    }

    #[test]
    fn ids_without_an_assembly_prefix_are_skipped_not_failed() {
        let hit = Hit {
            id: "scaffold_1234".into(),
            query_id: "q".into(),
            hsps: vec![hsp(1, 1, 10, 1e-5)],
        };
        assert!(JbrowseLinker.generate(&hit).is_none());
    }

    #[test]
    fn url_carries_locus_assembly_and_track() {
        let link = JbrowseLinker
            .generate(&region_hit(vec![hsp(1, 500, 100, 1.5e-20)]))
            .unwrap();
        assert_eq!(link.title, "JBrowse2");
        assert_eq!(link.order, Some(3));

        let url = Url::parse(&link.url).unwrap();
        let params: std::collections::HashMap<_, _> = url.query_pairs().collect();
        assert_eq!(params["loc"], "aradu.V14167.gnm2.Chr03:100-500");
        assert_eq!(params["assembly"], "aradu.V14167.gnm2");
        assert_eq!(params["tracks"], "sequenceserver_track");
    }

    #[test]
    fn payload_has_one_feature_per_hsp_with_normalized_coordinates() {
        let link = JbrowseLinker
            .generate(&region_hit(vec![
                hsp(1, 500, 100, 1.5e-20),
                hsp(2, 900, 1200, 0.0),
            ]))
            .unwrap();
        let tracks = payload(&link);
        let features = &tracks[0]["adapter"]["features"];
        assert_eq!(features.as_array().unwrap().len(), 2);

        let first = &features[0];
        assert_eq!(first["uniqueId"], "query_1-1");
        assert_eq!(first["name"], "query_1-1");
        assert_eq!(first["refName"], "aradu.V14167.gnm2.Chr03");
        assert_eq!(first["start"], 100);
        assert_eq!(first["end"], 500);
        assert_eq!(first["assembly"], "aradu.V14167.gnm2");
        assert_eq!(first["bit_score"], 55.46);
        assert_eq!(first["score"], 120);
        assert_eq!(first["evalue"], "1.50e-20");
        assert_eq!(first["identity"], "98/100 (98.0%)");
        assert_eq!(first["positives"], "99/100 (99.0%)");
        assert_eq!(first["gaps"], "1/100 (1.0%)");
        assert_eq!(first["hit_frame"], -1);

        // A zero e-value renders as the literal "0".
        let second = &features[1];
        assert_eq!(second["uniqueId"], "query_1-2");
        assert_eq!(second["evalue"], "0");

        assert_eq!(tracks[0]["trackId"], "sequenceserver_track");
        assert_eq!(tracks[0]["assemblyNames"][0], "aradu.V14167.gnm2");
    }
}
