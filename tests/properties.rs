//! Property tests for the scan contract.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use dblp_delta::{
    Catalog, CatalogBuilder, InMemoryCatalog, KeyOrder, ModDate, ModificationScanner, ScanConfig,
    SnapshotWriter, WriterConfig,
};

fn day(offset: i64) -> ModDate {
    let base = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    ModDate::new(base + Duration::days(offset))
}

/// Per author: publication day offsets and an extra bump for stale aggregates.
type AuthorSpec = (Vec<(i64, String)>, i64);

fn build(authors: &[AuthorSpec]) -> InMemoryCatalog {
    let mut builder = CatalogBuilder::new();
    for (a, (pubs, bump)) in authors.iter().enumerate() {
        let mut ids = Vec::new();
        let mut latest = 0;
        for (p, (offset, payload)) in pubs.iter().enumerate() {
            let id = builder
                .add_publication(format!("rec/{a}/{p}"), day(*offset).to_string(), payload.clone())
                .unwrap();
            ids.push(id);
            latest = latest.max(*offset);
        }
        builder
            .add_author(format!("pid/{a}"), day(latest + bump).to_string(), ids)
            .unwrap();
    }
    builder.build()
}

fn author_specs() -> impl Strategy<Value = Vec<AuthorSpec>> {
    prop::collection::vec(
        (
            prop::collection::vec((0i64..3000, "\\PC{0,24}"), 1..6),
            prop_oneof![4 => Just(0i64), 1 => 1i64..400],
        ),
        0..24,
    )
}

proptest! {
    #[test]
    fn no_stale_publication_is_emitted(authors in author_specs(), cutoff in 0i64..3500) {
        let catalog = build(&authors);
        let cutoff = day(cutoff);
        let result = ModificationScanner::default().scan(&catalog, cutoff).unwrap();

        for entry in result.iter() {
            let author = catalog.authors().iter().find(|a| &a.id == entry.author).unwrap();
            let expected: Vec<&str> = author
                .publications
                .iter()
                .map(|id| catalog.publication(*id).unwrap())
                .filter(|p| ModDate::parse(&p.mdate).unwrap() >= cutoff)
                .map(|p| p.payload.as_str())
                .collect();
            prop_assert_eq!(&entry.payloads, &expected);
        }
    }

    #[test]
    fn authors_present_iff_aggregate_passes(authors in author_specs(), cutoff in 0i64..3500) {
        let catalog = build(&authors);
        let cutoff = day(cutoff);
        let result = ModificationScanner::default().scan(&catalog, cutoff).unwrap();

        for author in catalog.authors() {
            let passes = ModDate::parse(&author.aggregated_mdate).unwrap() >= cutoff;
            prop_assert_eq!(result.get(&author.id).is_some(), passes);
        }
    }

    #[test]
    fn payloads_round_trip_through_snapshot(authors in author_specs(), cutoff in 0i64..3500) {
        let catalog = build(&authors);
        let result = ModificationScanner::default().scan(&catalog, day(cutoff)).unwrap();
        let bytes = SnapshotWriter::default().encode(&result).unwrap();
        let decoded: BTreeMap<String, Vec<String>> = serde_json::from_slice(&bytes).unwrap();

        prop_assert_eq!(decoded.len(), result.len());
        for entry in result.iter() {
            let written = &decoded[entry.author.as_str()];
            let original: Vec<String> = entry.payloads.iter().map(|p| p.to_string()).collect();
            prop_assert_eq!(written, &original);
        }
    }

    #[test]
    fn output_is_deterministic(authors in author_specs(), cutoff in 0i64..3500, sorted in any::<bool>()) {
        let catalog = build(&authors);
        let writer = SnapshotWriter::new(WriterConfig {
            key_order: if sorted { KeyOrder::AuthorId } else { KeyOrder::ScanOrder },
            pretty: false,
        });
        let sequential = ModificationScanner::default();
        let parallel = ModificationScanner::new(ScanConfig { parallel: true, parallel_threshold: 0 });

        let a = writer.encode(&sequential.scan(&catalog, day(cutoff)).unwrap()).unwrap();
        let b = writer.encode(&sequential.scan(&catalog, day(cutoff)).unwrap()).unwrap();
        let c = writer.encode(&parallel.scan(&catalog, day(cutoff)).unwrap()).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a, &c);
    }
}
