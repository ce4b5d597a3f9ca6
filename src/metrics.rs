// Derived metrics over monthly collection series.
//
// Everything here is a pure function of its arguments: the view mode and
// pivot index are passed in explicitly, nothing is cached between calls.
use crate::types::{MonthlySeries, ViewMode};
use crate::util::round_to;

/// Shown in place of a growth figure when the prior total is zero.
pub const GROWTH_SENTINEL: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MetricsError {
    #[error("prior fiscal year total is zero, growth is undefined")]
    DivisionByZero,
}

/// Index of the pivot month within the fiscal month order.
pub fn pivot_index(months: &[String], pivot_month: &str) -> Option<usize> {
    months.iter().position(|m| m == pivot_month)
}

/// Running total: element `i` is the sum of `series[0..=i]`.
///
/// The loader rejects series whose yearly total does not fit in a `u64`.
pub fn cumulative_sum(series: &[u64]) -> Vec<u64> {
    series
        .iter()
        .scan(0u64, |total, value| {
            *total += value;
            Some(*total)
        })
        .collect()
}

/// The sequence a chart displays for `series` under `mode`.
///
/// Panics if `pivot` is not a valid month index; the month table and every
/// series share the same fixed length, so this is a caller bug.
pub fn project(series: &MonthlySeries, mode: ViewMode, pivot: usize) -> Vec<u64> {
    let values = series.as_slice();
    assert!(
        pivot < values.len(),
        "pivot index {} out of range for {} months",
        pivot,
        values.len()
    );
    match mode {
        ViewMode::Raw => cumulative_sum(values),
        ViewMode::CumulativeToPivot => cumulative_sum(&values[..=pivot]),
        ViewMode::PivotOnly => vec![values[pivot]],
    }
}

/// Last element of the projection, i.e. the figure two years are compared on.
pub fn projected_total(series: &MonthlySeries, mode: ViewMode, pivot: usize) -> u64 {
    project(series, mode, pivot)
        .last()
        .copied()
        .unwrap_or_default()
}

/// Percentage change from `prior` to `current` with exactly two decimals.
pub fn growth_percent(
    current: &MonthlySeries,
    prior: &MonthlySeries,
    mode: ViewMode,
    pivot: usize,
) -> Result<String, MetricsError> {
    let current_total = projected_total(current, mode, pivot);
    let prior_total = projected_total(prior, mode, pivot);
    if prior_total == 0 {
        return Err(MetricsError::DivisionByZero);
    }
    let growth = (current_total as f64 - prior_total as f64) / prior_total as f64 * 100.0;
    Ok(format!("{:.2}", growth))
}

/// `growth_percent`, with the undefined case replaced by [`GROWTH_SENTINEL`].
pub fn growth_display(
    current: &MonthlySeries,
    prior: &MonthlySeries,
    mode: ViewMode,
    pivot: usize,
) -> String {
    growth_percent(current, prior, mode, pivot).unwrap_or_else(|err| {
        log::debug!("growth unavailable: {}", err);
        GROWTH_SENTINEL.to_string()
    })
}

/// Percentage share of each team in the total, rounded to one decimal.
///
/// Output order follows input order. An all-zero input yields all-zero shares.
pub fn pie_shares(values: &[(String, u64)]) -> Vec<(String, f64)> {
    let total: u128 = values.iter().map(|(_, v)| u128::from(*v)).sum();
    values
        .iter()
        .map(|(team, value)| {
            let share = if total == 0 {
                0.0
            } else {
                round_to(*value as f64 / total as f64 * 100.0, 1)
            };
            (team.clone(), share)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const JANUARY: usize = 9;

    fn series(values: [u64; 12]) -> MonthlySeries {
        MonthlySeries::new(values)
    }

    fn sample() -> MonthlySeries {
        series([10, 20, 0, 5, 15, 30, 25, 40, 35, 100, 60, 70])
    }

    fn shares(pairs: &[(&str, u64)]) -> Vec<(String, f64)> {
        let input: Vec<(String, u64)> = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        pie_shares(&input)
    }

    #[test]
    fn cumulative_sum_is_running_total() {
        let s = sample();
        let cumulative = cumulative_sum(s.as_slice());
        assert_eq!(cumulative.len(), 12);
        for i in 0..12 {
            let expected: u64 = s.as_slice()[..=i].iter().sum();
            assert_eq!(cumulative[i], expected);
        }
        assert!(cumulative.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn cumulative_sum_of_empty_is_empty() {
        assert!(cumulative_sum(&[]).is_empty());
    }

    #[test]
    fn raw_mode_projects_full_year_cumulative() {
        let s = sample();
        assert_eq!(project(&s, ViewMode::Raw, JANUARY), cumulative_sum(s.as_slice()));
    }

    #[test]
    fn cumulative_to_pivot_truncates_running_total() {
        let s = sample();
        let full = cumulative_sum(s.as_slice());
        for p in 0..12 {
            assert_eq!(project(&s, ViewMode::CumulativeToPivot, p), full[..=p].to_vec());
        }
    }

    #[test]
    fn pivot_only_is_the_raw_month_value() {
        let s = sample();
        for p in 0..12 {
            assert_eq!(project(&s, ViewMode::PivotOnly, p), vec![s.value_at(p)]);
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_pivot_panics() {
        project(&sample(), ViewMode::PivotOnly, 12);
    }

    #[test]
    fn identical_series_have_zero_growth() {
        let s = sample();
        for mode in [ViewMode::Raw, ViewMode::CumulativeToPivot, ViewMode::PivotOnly] {
            for p in 0..12 {
                assert_eq!(growth_percent(&s, &s, mode, p).unwrap(), "0.00");
            }
        }
    }

    #[test]
    fn pivot_only_growth_compares_single_month() {
        let mut current = [1; 12];
        let mut prior = [999; 12];
        current[JANUARY] = 150;
        prior[JANUARY] = 100;
        let g = growth_percent(&series(current), &series(prior), ViewMode::PivotOnly, JANUARY);
        assert_eq!(g.unwrap(), "50.00");
    }

    #[test]
    fn growth_can_be_negative() {
        let current = series([25; 12]);
        let prior = series([100; 12]);
        let g = growth_percent(&current, &prior, ViewMode::CumulativeToPivot, JANUARY);
        assert_eq!(g.unwrap(), "-75.00");
    }

    #[test]
    fn growth_rounds_to_two_decimals() {
        let mut current = [0; 12];
        let mut prior = [0; 12];
        current[0] = 2;
        prior[0] = 3;
        let g = growth_percent(&series(current), &series(prior), ViewMode::Raw, JANUARY);
        assert_eq!(g.unwrap(), "-33.33");
    }

    #[test]
    fn zero_prior_total_is_an_error_and_displays_sentinel() {
        let current = series([5; 12]);
        let prior = series([0; 12]);
        assert_eq!(
            growth_percent(&current, &prior, ViewMode::CumulativeToPivot, JANUARY),
            Err(MetricsError::DivisionByZero)
        );
        assert_eq!(
            growth_display(&current, &prior, ViewMode::CumulativeToPivot, JANUARY),
            GROWTH_SENTINEL
        );
    }

    #[test]
    fn zero_pivot_month_only_affects_pivot_mode() {
        let current = series([5; 12]);
        let mut prior = [5; 12];
        prior[JANUARY] = 0;
        let prior = series(prior);
        assert_eq!(growth_display(&current, &prior, ViewMode::PivotOnly, JANUARY), "N/A");
        assert_eq!(
            growth_display(&current, &prior, ViewMode::CumulativeToPivot, JANUARY),
            "11.11"
        );
    }

    #[test]
    fn even_split_pie_shares() {
        assert_eq!(
            shares(&[("A", 50), ("B", 50)]),
            vec![("A".to_string(), 50.0), ("B".to_string(), 50.0)]
        );
    }

    #[test]
    fn single_contributor_takes_whole_pie() {
        assert_eq!(
            shares(&[("A", 100), ("B", 0), ("C", 0)]),
            vec![
                ("A".to_string(), 100.0),
                ("B".to_string(), 0.0),
                ("C".to_string(), 0.0)
            ]
        );
    }

    #[test]
    fn pie_shares_round_to_one_decimal() {
        let s = shares(&[("A", 1), ("B", 1), ("C", 1)]);
        assert!(s.iter().all(|(_, v)| *v == 33.3));
    }

    #[test]
    fn pie_total_may_exceed_u64() {
        let s = shares(&[("A", u64::MAX), ("B", u64::MAX)]);
        assert_eq!(s, vec![("A".to_string(), 50.0), ("B".to_string(), 50.0)]);
    }

    #[test]
    fn all_zero_pie_has_zero_shares() {
        let s = shares(&[("A", 0), ("B", 0)]);
        assert!(s.iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let current = sample();
        let prior = series([7; 12]);
        for mode in [ViewMode::Raw, ViewMode::CumulativeToPivot, ViewMode::PivotOnly] {
            assert_eq!(project(&current, mode, JANUARY), project(&current, mode, JANUARY));
            assert_eq!(
                growth_display(&current, &prior, mode, JANUARY),
                growth_display(&current, &prior, mode, JANUARY)
            );
        }
        assert_eq!(shares(&[("A", 3), ("B", 7)]), shares(&[("A", 3), ("B", 7)]));
    }

    #[test]
    fn pivot_index_finds_month() {
        let months: Vec<String> = ["April", "May", "January"].iter().map(|m| m.to_string()).collect();
        assert_eq!(pivot_index(&months, "January"), Some(2));
        assert_eq!(pivot_index(&months, "March"), None);
    }
}
