//! Charger availability aggregation.
//!
//! Joins a station's static charger roster against the live status records
//! returned by one open-data lookup, producing availability counts per
//! charger class (fast vs. regular).
//!
//! The join is deliberately lossy: a static charger with no matching live
//! record contributes to neither `total` nor `available`. This reproduces
//! the behavior observed in production rather than counting unmatched
//! chargers as unavailable; see DESIGN.md before treating it as load-bearing.

use serde::Serialize;

use crate::domain::{Charger, LiveChargerStatus};

/// Upstream status code meaning "idle, ready to charge".
const AVAILABLE_STATUS: &str = "2";

/// Availability tally for one charger class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassAvailability {
    /// Chargers of this class that are currently available.
    pub available: u32,

    /// Chargers of this class with a matched live record.
    pub total: u32,
}

/// Aggregated availability for one station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    /// Fast-charger tally.
    pub fast_chargers: ClassAvailability,

    /// Regular-charger tally.
    pub regular_chargers: ClassAvailability,

    /// True when every matched class has zero availability.
    pub all_in_use: bool,
}

/// Merge a static charger roster with live status records.
///
/// For each static charger the first live record with the same charger id
/// is used (order of `live` breaks ties when the feed contains duplicates).
/// A matched charger increments its class `total`, and `available` too when
/// its status code is `"2"`. Chargers without a live record are skipped.
///
/// `all_in_use` is true when at least one class matched and every matched
/// class has zero available chargers; it is false when nothing matched.
///
/// Pure and deterministic; empty or mismatched inputs degrade to zero
/// totals rather than failing.
pub fn aggregate(chargers: &[Charger], live: &[LiveChargerStatus]) -> StatusSummary {
    let mut fast = ClassAvailability::default();
    let mut regular = ClassAvailability::default();

    for charger in chargers {
        let Some(record) = live.iter().find(|l| l.charger_id == charger.charger_id) else {
            continue;
        };

        let tally = if charger.is_fast { &mut fast } else { &mut regular };
        tally.total += 1;
        if record.status_code == AVAILABLE_STATUS {
            tally.available += 1;
        }
    }

    let all_in_use = (fast.total > 0 && fast.available == 0 && regular.total == 0)
        || (regular.total > 0 && regular.available == 0 && fast.total == 0)
        || (fast.total > 0
            && fast.available == 0
            && regular.total > 0
            && regular.available == 0);

    StatusSummary {
        fast_chargers: fast,
        regular_chargers: regular,
        all_in_use,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_charger() -> impl Strategy<Value = Charger> {
        ("[a-z][0-9]{1,2}", any::<bool>()).prop_map(|(id, is_fast)| Charger {
            charger_id: id,
            charger_type: "AC완속".to_string(),
            output_kw: 7.0,
            is_fast,
        })
    }

    fn arb_live() -> impl Strategy<Value = LiveChargerStatus> {
        ("[a-z][0-9]{1,2}", "[0-9]").prop_map(|(id, status)| LiveChargerStatus {
            charger_id: id,
            status_code: status,
        })
    }

    proptest! {
        /// Available never exceeds total, and total never exceeds the roster.
        #[test]
        fn tallies_are_bounded(
            chargers in proptest::collection::vec(arb_charger(), 0..12),
            live in proptest::collection::vec(arb_live(), 0..12),
        ) {
            let summary = aggregate(&chargers, &live);

            prop_assert!(summary.fast_chargers.available <= summary.fast_chargers.total);
            prop_assert!(summary.regular_chargers.available <= summary.regular_chargers.total);
            prop_assert!(
                (summary.fast_chargers.total + summary.regular_chargers.total) as usize
                    <= chargers.len()
            );
        }

        /// Aggregation is a pure function of its inputs.
        #[test]
        fn deterministic(
            chargers in proptest::collection::vec(arb_charger(), 0..12),
            live in proptest::collection::vec(arb_live(), 0..12),
        ) {
            prop_assert_eq!(aggregate(&chargers, &live), aggregate(&chargers, &live));
        }

        /// When no live id matches any roster id, every tally is zero.
        #[test]
        fn disjoint_inputs_count_nothing(
            chargers in proptest::collection::vec(arb_charger(), 0..8),
            live in proptest::collection::vec(arb_live(), 0..8),
        ) {
            let live: Vec<LiveChargerStatus> = live
                .into_iter()
                .map(|mut l| {
                    l.charger_id = format!("X{}", l.charger_id);
                    l
                })
                .collect();

            let summary = aggregate(&chargers, &live);

            prop_assert_eq!(summary.fast_chargers.total, 0);
            prop_assert_eq!(summary.regular_chargers.total, 0);
            prop_assert!(!summary.all_in_use);
        }

        /// all_in_use implies something matched and nothing is available.
        #[test]
        fn all_in_use_consistent(
            chargers in proptest::collection::vec(arb_charger(), 0..12),
            live in proptest::collection::vec(arb_live(), 0..12),
        ) {
            let summary = aggregate(&chargers, &live);

            if summary.all_in_use {
                prop_assert!(
                    summary.fast_chargers.total > 0 || summary.regular_chargers.total > 0
                );
                prop_assert_eq!(summary.fast_chargers.available, 0);
                prop_assert_eq!(summary.regular_chargers.available, 0);
            }
        }
    }
}
