//! Analysis window extraction.
//!
//! Pure functions over history snapshots; nothing here mutates state. The
//! extracted slice is what the external summarization collaborator consumes.

use std::str::FromStr;

use contracts::{Sample, SourceId, WindowBounds};

use crate::RelayStore;

/// Which histories feed the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSelector {
    /// A single source's history
    One(SourceId),
    /// Every known source, merged by ascending timestamp
    Both,
}

impl FromStr for SourceSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "both" => Ok(Self::Both),
            other => other
                .parse::<SourceId>()
                .map(Self::One)
                .map_err(|_| format!("invalid source selector '{other}'")),
        }
    }
}

/// Extract the most recent `size` samples for analysis.
///
/// `size` is clamped into `[bounds.min, bounds.max]`. Histories are filtered
/// to samples; a single source keeps acceptance order, merged sources are
/// stably sorted by ascending `ts` (ties keep their pre-sort order) before
/// the trailing `size` is taken.
pub fn analysis_window(
    store: &RelayStore,
    selector: SourceSelector,
    size: usize,
    bounds: &WindowBounds,
) -> Vec<Sample> {
    let size = size.clamp(bounds.min, bounds.max);

    let mut samples: Vec<Sample> = match selector {
        SourceSelector::One(source) => collect_samples(store, source),
        SourceSelector::Both => {
            let mut merged = Vec::new();
            for source in store.sources() {
                merged.extend(collect_samples(store, source));
            }
            merged.sort_by_key(|s| s.ts);
            merged
        }
    };

    if samples.len() > size {
        samples.drain(..samples.len() - size);
    }
    samples
}

fn collect_samples(store: &RelayStore, source: SourceId) -> Vec<Sample> {
    store
        .history(source)
        .iter()
        .filter_map(|r| r.as_sample().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Event, Record};
    use std::collections::BTreeMap;

    fn sample(source: u16, pitch: f64, ts: i64) -> Record {
        Record::Sample(Sample {
            source: SourceId::new(source),
            pitch,
            ax: None,
            ay: None,
            az: None,
            pitch_smooth: None,
            roll: None,
            a_mag: None,
            dpitch: None,
            baseline_pitch: None,
            button: None,
            button_click: None,
            ts,
        })
    }

    fn event(source: u16, name: &str, ts: i64) -> Record {
        Record::Event(Event {
            source: SourceId::new(source),
            event: name.to_string(),
            ts,
            extra: BTreeMap::new(),
        })
    }

    fn bounds() -> WindowBounds {
        WindowBounds { min: 2, max: 5 }
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!(
            "1".parse::<SourceSelector>().unwrap(),
            SourceSelector::One(SourceId::new(1))
        );
        assert_eq!("both".parse::<SourceSelector>().unwrap(), SourceSelector::Both);
        assert!("neither".parse::<SourceSelector>().is_err());
    }

    #[test]
    fn test_events_filtered_out() {
        let store = RelayStore::new(10);
        store.apply(sample(1, 1.0, 100));
        store.apply(event(1, "calibrate", 101));
        store.apply(sample(1, 2.0, 102));

        let window =
            analysis_window(&store, SourceSelector::One(SourceId::new(1)), 5, &bounds());
        let pitches: Vec<f64> = window.iter().map(|s| s.pitch).collect();
        assert_eq!(pitches, vec![1.0, 2.0]);
    }

    #[test]
    fn test_size_clamped() {
        let store = RelayStore::new(10);
        for i in 0..8 {
            store.apply(sample(1, i as f64, 100 + i));
        }

        // Requested 100, max 5: trailing five samples
        let window =
            analysis_window(&store, SourceSelector::One(SourceId::new(1)), 100, &bounds());
        assert_eq!(window.len(), 5);
        assert_eq!(window[0].pitch, 3.0);

        // Requested 0, min 2
        let window =
            analysis_window(&store, SourceSelector::One(SourceId::new(1)), 0, &bounds());
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].pitch, 6.0);
    }

    #[test]
    fn test_merge_ascending_ts() {
        let store = RelayStore::new(10);
        store.apply(sample(1, 1.0, 100));
        store.apply(sample(1, 2.0, 300));
        store.apply(sample(2, 3.0, 200));
        store.apply(sample(2, 4.0, 400));

        let window = analysis_window(&store, SourceSelector::Both, 5, &bounds());
        let ts: Vec<i64> = window.iter().map(|s| s.ts).collect();
        assert_eq!(ts, vec![100, 200, 300, 400]);
    }

    #[test]
    fn test_merge_ties_keep_presort_order() {
        let store = RelayStore::new(10);
        store.apply(sample(1, 1.0, 100));
        store.apply(sample(2, 2.0, 100));

        let window = analysis_window(&store, SourceSelector::Both, 5, &bounds());
        // Stable sort: equal timestamps stay in source-ascending concat order
        assert_eq!(window[0].source, SourceId::new(1));
        assert_eq!(window[1].source, SourceId::new(2));
    }

    #[test]
    fn test_merge_truncates_to_trailing_size() {
        let store = RelayStore::new(10);
        for i in 0..4 {
            store.apply(sample(1, i as f64, 100 + i * 10));
            store.apply(sample(2, 10.0 + i as f64, 105 + i * 10));
        }

        let window = analysis_window(&store, SourceSelector::Both, 3, &bounds());
        assert_eq!(window.len(), 3);
        let ts: Vec<i64> = window.iter().map(|s| s.ts).collect();
        assert_eq!(ts, vec![125, 130, 135]);
    }
}
