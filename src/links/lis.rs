//! Legume Information System linkouts: gene-scoped for annotation
//! records, region-scoped (with aggregated hit coordinates) otherwise.

use url::Url;

use crate::links::{Hit, LinkDescriptor, LinkGenerator, RecordKind};

const LINKOUT_MGR: &str = "https://www.legumefederation.org/en/linkout_mgr/";

pub struct LisLinkout;

impl LinkGenerator for LisLinkout {
    fn generate(&self, hit: &Hit) -> Option<LinkDescriptor> {
        let mut url = Url::parse(LINKOUT_MGR).ok()?;
        let title = match hit.kind() {
            RecordKind::Gene => {
                url.query_pairs_mut().append_pair("gene", &hit.id);
                "LIS gene linkouts"
            }
            RecordKind::Region => {
                let (start, end) = hit.coordinates()?;
                url.query_pairs_mut()
                    .append_pair("seqname", &hit.id)
                    .append_pair("start", &start.to_string())
                    .append_pair("end", &end.to_string());
                "LIS region linkouts"
            }
        };
        Some(LinkDescriptor {
            title: title.to_string(),
            url: url.to_string(),
            order: Some(2),
            class: None,
            icon: Some("fa-link".to_string()),
        })
    }
}
