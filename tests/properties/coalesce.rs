//! Property tests for watch event coalescing.

use std::collections::HashSet;
use std::path::PathBuf;

use proptest::prelude::*;

use tsrig::application::coalesce;
use tsrig::WatchEvent;

fn event() -> impl Strategy<Value = WatchEvent> {
    prop_oneof![
        1 => Just(WatchEvent::Ready),
        4 => (0u8..6).prop_map(|n| WatchEvent::Changed(PathBuf::from(format!("/p/src/{}.ts", n)))),
        2 => (0u8..6).prop_map(|n| WatchEvent::Removed(PathBuf::from(format!("/p/src/{}.ts", n)))),
    ]
}

fn path_of(event: &WatchEvent) -> Option<&PathBuf> {
    match event {
        WatchEvent::Changed(path) | WatchEvent::Removed(path) => Some(path),
        _ => None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: at most one event per path survives, and it is the newest one.
    #[test]
    fn property_newest_event_per_path_wins(events in proptest::collection::vec(event(), 0..32)) {
        let merged = coalesce(events.clone());

        let mut seen = HashSet::new();
        for event in &merged {
            if let Some(path) = path_of(event) {
                prop_assert!(seen.insert(path.clone()), "duplicate {}", path.display());
                let newest = events.iter().rev().find(|e| path_of(e) == Some(path));
                prop_assert_eq!(Some(event), newest);
            }
        }
    }

    /// PROPERTY: Ready is never dropped.
    #[test]
    fn property_ready_survives(events in proptest::collection::vec(event(), 0..32)) {
        let had_ready = events.contains(&WatchEvent::Ready);
        let merged = coalesce(events);
        prop_assert_eq!(had_ready, merged.contains(&WatchEvent::Ready));
    }
}
