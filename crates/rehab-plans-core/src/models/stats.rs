//! Aggregate statistics over stored plans.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Usage statistics for the plan store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatsSummary {
    /// Number of stored plans
    pub total_plans: u64,
    /// Plan count per identified procedure
    pub procedures: BTreeMap<String, u64>,
    /// Mean of the numeric patient ages, `None` when there are none
    pub average_age: Option<f64>,
    /// Plans whose age was not numeric and was left out of the mean
    pub ages_excluded: u64,
}

/// Single-pass accumulator for [`StatsSummary`].
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    total_plans: u64,
    procedures: BTreeMap<String, u64>,
    age_sum: f64,
    age_count: u64,
    ages_excluded: u64,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one stored plan into the running totals.
    pub fn add(&mut self, procedure: String, patient_age: &str) {
        self.total_plans += 1;
        *self.procedures.entry(procedure).or_insert(0) += 1;

        match parse_age(patient_age) {
            Some(age) => {
                self.age_sum += age;
                self.age_count += 1;
            }
            None => self.ages_excluded += 1,
        }
    }

    pub fn finish(self) -> StatsSummary {
        let average_age = if self.age_count == 0 {
            None
        } else {
            Some(self.age_sum / self.age_count as f64)
        };

        StatsSummary {
            total_plans: self.total_plans,
            procedures: self.procedures,
            average_age,
            ages_excluded: self.ages_excluded,
        }
    }
}

/// Parse a free-form age into a number.
///
/// Surrounding whitespace is ignored. Non-numeric text (including the `N/A`
/// placeholder) and non-finite values yield `None`.
pub fn parse_age(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|age| age.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age("42"), Some(42.0));
        assert_eq!(parse_age(" 37.5 "), Some(37.5));
        assert_eq!(parse_age("N/A"), None);
        assert_eq!(parse_age(""), None);
        assert_eq!(parse_age("forty"), None);
        assert_eq!(parse_age("NaN"), None);
        assert_eq!(parse_age("inf"), None);
    }

    #[test]
    fn test_empty_accumulator() {
        let stats = StatsAccumulator::new().finish();
        assert_eq!(stats.total_plans, 0);
        assert!(stats.procedures.is_empty());
        assert_eq!(stats.average_age, None);
        assert_eq!(stats.ages_excluded, 0);
    }

    #[test]
    fn test_non_numeric_ages_excluded() {
        let mut acc = StatsAccumulator::new();
        acc.add("Knee Replacement".into(), "40");
        acc.add("Knee Replacement".into(), "abc");
        acc.add("Hip Replacement".into(), "60");
        let stats = acc.finish();

        assert_eq!(stats.total_plans, 3);
        assert_eq!(stats.procedures.get("Knee Replacement"), Some(&2));
        assert_eq!(stats.procedures.get("Hip Replacement"), Some(&1));
        assert_eq!(stats.average_age, Some(50.0));
        assert_eq!(stats.ages_excluded, 1);
    }

    #[test]
    fn test_only_placeholder_ages() {
        let mut acc = StatsAccumulator::new();
        acc.add("Rotator Cuff Repair".into(), "N/A");
        let stats = acc.finish();
        assert_eq!(stats.total_plans, 1);
        assert_eq!(stats.average_age, None);
        assert_eq!(stats.ages_excluded, 1);
    }

    proptest! {
        #[test]
        fn prop_average_of_integer_ages(ages in prop::collection::vec(0u32..120, 1..50)) {
            let mut acc = StatsAccumulator::new();
            for age in &ages {
                acc.add("P".into(), &age.to_string());
            }
            let stats = acc.finish();

            let expected = ages.iter().map(|a| *a as f64).sum::<f64>() / ages.len() as f64;
            let average = stats.average_age.unwrap();
            prop_assert!((average - expected).abs() < 1e-9);
            prop_assert_eq!(stats.total_plans, ages.len() as u64);
            prop_assert_eq!(stats.ages_excluded, 0);
        }

        #[test]
        fn prop_counts_partition_total(procs in prop::collection::vec("[A-C]", 0..40)) {
            let mut acc = StatsAccumulator::new();
            for p in &procs {
                acc.add(p.clone(), "N/A");
            }
            let stats = acc.finish();
            prop_assert_eq!(stats.procedures.values().sum::<u64>(), stats.total_plans);
            prop_assert_eq!(stats.total_plans, procs.len() as u64);
        }
    }
}
