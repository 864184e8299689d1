//! Property-based tests for checksum accumulation and catalog traversal.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;

use proptest::prelude::*;
use zipcheck_core::Verifier;
use zipcheck_core::VerifyConfig;
use zipcheck_core::catalog::CatalogStats;
use zipcheck_core::catalog::walk;
use zipcheck_core::checksum::Crc32;
use zipcheck_core::checksum::crc32;
use zipcheck_core::events::NoopSink;
use zipcheck_core::test_utils::MemorySource;

fn path_component() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

/// Unique relative paths where no path is a directory of another.
fn file_paths() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(
        prop::collection::vec(path_component(), 1..4).prop_map(|parts| parts.join("/")),
        0..12,
    )
    .prop_map(|paths| {
        let snapshot = paths.clone();
        paths
            .into_iter()
            .filter(|p| {
                !snapshot
                    .iter()
                    .any(|other| other.starts_with(&format!("{p}/")))
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_chunking_does_not_change_checksum(
        data in prop::collection::vec(any::<u8>(), 0..4096),
        chunk in 1usize..512,
    ) {
        let mut crc = Crc32::new();
        for piece in data.chunks(chunk) {
            crc.update(piece);
        }
        prop_assert_eq!(crc.finalize(), crc32(&data));
    }

    #[test]
    fn prop_chunk_size_does_not_change_result(
        data in prop::collection::vec(any::<u8>(), 0..2048),
        corrupt in any::<bool>(),
    ) {
        let stored = if corrupt { crc32(&data) ^ 1 } else { crc32(&data) };
        let source = MemorySource::new().with_corrupt_file("entry", &data, stored);
        let catalog = source.catalog();

        let results: Vec<_> = [1, 1024, data.len().max(1)]
            .into_iter()
            .map(|size| {
                Verifier::new(VerifyConfig::default().with_chunk_size(size))
                    .verify(&catalog, &source, &mut NoopSink)
                    .unwrap()
            })
            .collect();

        prop_assert_eq!(&results[0], &results[1]);
        prop_assert_eq!(&results[1], &results[2]);
        prop_assert_eq!(results[0].failed, usize::from(corrupt));
    }

    #[test]
    fn prop_walk_visits_every_file_once(paths in file_paths()) {
        let mut source = MemorySource::new();
        for path in &paths {
            source = source.with_file(path, path.as_bytes());
        }
        let catalog = source.catalog();

        let walked: Vec<String> = walk(&catalog, "").map(|(path, _)| path).collect();
        let unique: BTreeSet<String> = walked.iter().cloned().collect();

        prop_assert_eq!(walked.len(), unique.len());
        prop_assert_eq!(unique, paths.clone());
        prop_assert_eq!(CatalogStats::collect(&catalog).files, paths.len());
    }

    #[test]
    fn prop_every_checked_entry_is_counted(paths in file_paths(), mask in any::<u16>()) {
        let mut source = MemorySource::new();
        let mut expected_failures = Vec::new();
        for (i, path) in paths.iter().enumerate() {
            if mask & (1 << i) == 0 {
                source = source.with_file(path, path.as_bytes());
            } else {
                source = source.with_corrupt_file(path, path.as_bytes(), !crc32(path.as_bytes()));
                expected_failures.push(path.clone());
            }
        }
        let catalog = source.catalog();

        let result = Verifier::default().verify(&catalog, &source, &mut NoopSink).unwrap();

        prop_assert_eq!(result.total_checked(), paths.len());
        prop_assert_eq!(result.passed + expected_failures.len(), paths.len());
        let mut failures = result.failures.clone();
        failures.sort();
        prop_assert_eq!(failures, expected_failures);
    }

    #[test]
    fn prop_colliding_names_are_never_dropped(
        names in prop::collection::vec("(\\.\\.|[ab])(/(\\.\\.|[ab])){0,2}", 0..10),
    ) {
        let mut source = MemorySource::new();
        for name in &names {
            source = source.with_corrupt_file(name, name.as_bytes(), !crc32(name.as_bytes()));
        }
        let catalog = source.catalog();

        let walked: Vec<String> = walk(&catalog, "").map(|(path, _)| path).collect();
        let unique: BTreeSet<String> = walked.iter().cloned().collect();
        prop_assert_eq!(walked.len(), names.len());
        prop_assert_eq!(unique.len(), names.len());

        let result = Verifier::default().verify(&catalog, &source, &mut NoopSink).unwrap();
        prop_assert_eq!(result.failed, names.len());
        prop_assert_eq!(result.passed, 0);
    }
}
