//! Property-based testing for detection invariants
//!
//! Invariants proven:
//! 1. Boundary exclusion: every extremum lies in `order..len - order`
//! 2. Dominance: no neighbour within `order` lies beyond an extremum
//! 3. Run shape: 1 ≤ len ≤ K, ascending, strictly monotonic in its direction
//! 4. Run disjointness: under strict seeding no extremum is in two runs
//! 5. Label provenance: every non-zero label sits `order` bars after a run end
//! 6. Event provenance: every event matches one row of the rule table
//! 7. Idempotence: the same input always yields the same report

use divergence::{
    build_runs, build_runs_with, classify, classify_tail, find_maxima, find_minima, label_peaks,
    AlignedSeries, DetectorConfig, DivergenceDetector, DivergenceKind, RunKind, RunSeeding,
    ScanMode, Signal,
};
use divergence_core::test_utils::hourly_dates;
use proptest::prelude::*;

/// Small integer levels so that plateaus and ties show up often
fn series_strategy(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0i32..12, 0..max_len)
        .prop_map(|v| v.into_iter().map(f64::from).collect())
}

fn rule_fires(kind: DivergenceKind, price: (i8, i8), rsi: (i8, i8)) -> bool {
    // (high, low) label pairs
    match kind {
        DivergenceKind::RegularBullish => price.1 == -1 && rsi.1 == 1,
        DivergenceKind::HiddenBullish => price.1 == 1 && rsi.1 == -1,
        DivergenceKind::HiddenBearish => price.0 == -1 && rsi.0 == 1,
        DivergenceKind::RegularBearish => price.0 == 1 && rsi.0 == -1,
    }
}

proptest! {
    /// Proves: extrema never sit within `order` of either end
    #[test]
    fn extrema_respect_boundaries(series in series_strategy(60), order in 1usize..6) {
        let len = series.len();
        for index in find_maxima(&series, order).unwrap()
            .into_iter()
            .chain(find_minima(&series, order).unwrap())
        {
            prop_assert!(index >= order, "index {} below order {}", index, order);
            prop_assert!(index + order < len, "index {} too close to end {}", index, len);
        }
    }

    /// Proves: a maximum is at least, a minimum at most, every neighbour in its window
    #[test]
    fn extrema_dominate_window(series in series_strategy(60), order in 1usize..6) {
        for i in find_maxima(&series, order).unwrap() {
            for j in i - order..=i + order {
                prop_assert!(series[i] >= series[j]);
            }
        }
        for i in find_minima(&series, order).unwrap() {
            for j in i - order..=i + order {
                prop_assert!(series[i] <= series[j]);
            }
        }
    }

    /// Proves: runs are non-empty, at most K long, ascending and strictly monotonic
    #[test]
    fn runs_are_bounded_and_monotonic(
        series in series_strategy(80),
        order in 1usize..4,
        k in 1usize..5,
        reseed in any::<bool>(),
    ) {
        let seeding = if reseed { RunSeeding::Reseed } else { RunSeeding::Strict };

        for kind in RunKind::ALL {
            let extrema = match kind.side() {
                divergence::ExtremumSide::High => find_maxima(&series, order).unwrap(),
                divergence::ExtremumSide::Low => find_minima(&series, order).unwrap(),
            };

            for run in build_runs_with(&series, order, k, kind, seeding).unwrap() {
                prop_assert!(!run.is_empty());
                prop_assert!(run.len() <= k);
                prop_assert_eq!(run.kind, kind);
                for pair in run.indices.windows(2) {
                    prop_assert!(pair[0] < pair[1]);
                    prop_assert!(kind.extends(series[pair[0]], series[pair[1]]));
                }
                for index in &run.indices {
                    prop_assert!(extrema.contains(index));
                }
            }
        }
    }

    /// Proves: under strict seeding every extremum belongs to at most one run of a kind
    #[test]
    fn strict_runs_are_disjoint(series in series_strategy(80), order in 1usize..4, k in 1usize..5) {
        for kind in RunKind::ALL {
            let mut seen: Vec<usize> = build_runs(&series, order, k, kind)
                .unwrap()
                .into_iter()
                .flat_map(|r| r.indices)
                .collect();
            let total = seen.len();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), total);
        }
    }

    /// Proves: labels are in {-1, 0, 1} and each non-zero label has a matching run end
    #[test]
    fn labels_trace_back_to_runs(series in series_strategy(80), order in 1usize..4, k in 1usize..4) {
        let labels = label_peaks(&series, order, k).unwrap();
        prop_assert_eq!(labels.len(), series.len());
        prop_assert_eq!(labels.dropped, 0);

        let confirmations = |kinds: [RunKind; 2]| -> Vec<(usize, i8)> {
            kinds
                .into_iter()
                .flat_map(|kind| {
                    build_runs(&series, order, k, kind)
                        .unwrap()
                        .into_iter()
                        .map(move |r| (r.last() + order, kind.label()))
                })
                .collect()
        };
        let high_sources = confirmations([RunKind::HigherHighs, RunKind::LowerHighs]);
        let low_sources = confirmations([RunKind::LowerLows, RunKind::HigherLows]);

        for (i, &label) in labels.highs.iter().enumerate() {
            prop_assert!((-1..=1).contains(&label));
            if label != 0 {
                prop_assert!(high_sources.contains(&(i, label)), "orphan high label {} at {}", label, i);
            }
        }
        for (i, &label) in labels.lows.iter().enumerate() {
            prop_assert!((-1..=1).contains(&label));
            if label != 0 {
                prop_assert!(low_sources.contains(&(i, label)), "orphan low label {} at {}", label, i);
            }
        }
    }

    /// Proves: full-scan events are exactly the rule-table matches, in ascending index order
    #[test]
    fn events_match_rule_table(
        price in series_strategy(70),
        rsi_levels in prop::collection::vec(0i32..12, 70),
        order in 1usize..3,
    ) {
        let rsi: Vec<f64> = rsi_levels[..price.len()].iter().map(|&v| f64::from(v)).collect();
        let price_labels = label_peaks(&price, order, 2).unwrap();
        let rsi_labels = label_peaks(&rsi, order, 2).unwrap();
        let dates = hourly_dates(price.len());

        let events = classify(&price_labels, &rsi_labels, &dates).unwrap();

        let mut expected = Vec::new();
        for i in 0..price.len() {
            let p = (price_labels.highs[i], price_labels.lows[i]);
            let r = (rsi_labels.highs[i], rsi_labels.lows[i]);
            for kind in DivergenceKind::ALL {
                if rule_fires(kind, p, r) {
                    expected.push((i, kind));
                }
            }
        }

        let actual: Vec<_> = events.iter().map(|e| (e.index, e.kind)).collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(events.windows(2).all(|w| w[0].index <= w[1].index));
    }

    /// Proves: a tail-gated signal is always backed by a matching rule inside the tail
    #[test]
    fn tail_signal_is_backed_by_tail_event(
        price in series_strategy(70).prop_filter("need a tail", |v| v.len() >= 5),
        rsi_seed in prop::collection::vec(0i32..12, 70),
        tail_size in 1usize..5,
        gate in any::<bool>(),
    ) {
        let rsi: Vec<f64> = rsi_seed[..price.len()].iter().map(|&v| f64::from(v)).collect();
        let price_labels = label_peaks(&price, 1, 2).unwrap();
        let rsi_labels = label_peaks(&rsi, 1, 2).unwrap();

        let signal = classify_tail(&price_labels, &rsi_labels, &price, tail_size, gate).unwrap();
        let events = classify(&price_labels, &rsi_labels, &hourly_dates(price.len())).unwrap();
        let tail_start = price.len() - tail_size;

        match signal {
            Signal::Neutral => {}
            Signal::Bullish | Signal::Bearish => {
                prop_assert!(events
                    .iter()
                    .any(|e| e.index >= tail_start && e.kind.signal() == signal));
            }
        }

        if gate {
            let trend = price[0] - price[price.len() - 1];
            if trend == 0.0 {
                prop_assert_eq!(signal, Signal::Neutral);
            } else if trend < 0.0 {
                prop_assert_ne!(signal, Signal::Bearish);
            } else {
                prop_assert_ne!(signal, Signal::Bullish);
            }
        }
    }

    /// Proves: detection is a pure function of its input
    #[test]
    fn detection_is_idempotent(
        price in series_strategy(60).prop_filter("need data", |v| v.len() >= 3),
        tail_gated in any::<bool>(),
    ) {
        let rsi: Vec<f64> = price.iter().rev().copied().collect();
        let dates = hourly_dates(price.len());
        let series = AlignedSeries::new(price, rsi, dates, 14).unwrap();

        let detector = DivergenceDetector::new(DetectorConfig {
            order: 1,
            tail_size: 3,
            scan_mode: if tail_gated { ScanMode::TailGated } else { ScanMode::Full },
            ..DetectorConfig::default()
        })
        .unwrap();

        let first = detector.detect(&series).unwrap();
        let second = detector.detect(&series).unwrap();
        prop_assert_eq!(&first, &second);
        for event in first.classification.events() {
            prop_assert_eq!(event.absolute_index, event.index + 14);
        }
    }
}
