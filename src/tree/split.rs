use super::*;
use super::impurity::{ChildImpurities, ImpurityCalculator};

/// A candidate split produced by a split searcher.
///
/// # Fields
///
/// - `split_index` - Position in the feature-ordered node rows; rows `[from, split_index)` go left
/// - `threshold` - Feature value threshold; rows with `value <= threshold` go left
/// - `impurities` - Left and right child impurities at the split
/// - `gain` - Information gain of the split
#[derive(Debug, Clone, Copy)]
pub struct Split {
    pub split_index: usize,
    pub threshold: f64,
    pub impurities: ChildImpurities,
    pub gain: f64,
}

/// Finds the best threshold to split one feature on, or `None` when no
/// candidate satisfies the size and gain constraints.
///
/// `values` and `targets` are the node's rows ordered ascending by the feature
/// under consideration; `interval` addresses the sub-range to search.
pub trait SplitSearcher {
    fn find_best_split(
        &self,
        calculator: &mut dyn ImpurityCalculator,
        values: &[f64],
        targets: &[f64],
        interval: Interval,
        rng: &mut StdRng,
    ) -> Option<Split>;
}

/// Exhaustive split search over every distinct-value boundary.
///
/// Sweeps the impurity calculator incrementally across the interval and keeps
/// the first boundary achieving the maximum gain (strict `>` comparison, so
/// scan order breaks ties left to right). Thresholds are midpoints between
/// adjacent distinct values.
///
/// # Fields
///
/// - `min_split_size` - Minimum number of rows required on each side of a split
/// - `min_information_gain` - Minimum gain for a split to qualify
#[derive(Debug, Clone, Copy)]
pub struct ExhaustiveSplitSearcher {
    min_split_size: usize,
    min_information_gain: f64,
}

impl ExhaustiveSplitSearcher {
    /// Creates an exhaustive split searcher with the given constraints.
    pub fn new(min_split_size: usize, min_information_gain: f64) -> Self {
        Self {
            min_split_size,
            min_information_gain,
        }
    }

    // Getters
    get_field!(get_min_split_size, min_split_size, usize);
    get_field!(get_min_information_gain, min_information_gain, f64);
}

impl SplitSearcher for ExhaustiveSplitSearcher {
    fn find_best_split(
        &self,
        calculator: &mut dyn ImpurityCalculator,
        values: &[f64],
        targets: &[f64],
        interval: Interval,
        _rng: &mut StdRng,
    ) -> Option<Split> {
        if interval.get_length() < 2 * self.min_split_size {
            return None;
        }

        calculator.init(targets, interval);
        let total_impurity = calculator.node_impurity();

        let from = interval.get_from();
        let to = interval.get_to();

        let mut best: Option<Split> = None;
        for index in (from + self.min_split_size)..=(to - self.min_split_size) {
            // Only boundaries between distinct feature values are valid splits.
            if values[index - 1] == values[index] {
                continue;
            }

            calculator.update_split_index(index);
            let gain = calculator.impurity_improvement(total_impurity);

            if gain < self.min_information_gain {
                continue;
            }

            if best.map_or(true, |b| gain > b.gain) {
                best = Some(Split {
                    split_index: index,
                    threshold: (values[index - 1] + values[index]) * 0.5,
                    impurities: calculator.child_impurities(),
                    gain,
                });
            }
        }

        best
    }
}

/// Randomized split search for extremely randomized trees.
///
/// Draws one uniform threshold within the feature's observed value range from
/// the injected per-tree generator instead of searching exhaustively, trading
/// split optimality for speed and ensemble diversity. The same size and gain
/// constraints as the exhaustive searcher apply.
///
/// # Fields
///
/// - `min_split_size` - Minimum number of rows required on each side of a split
/// - `min_information_gain` - Minimum gain for a split to qualify
#[derive(Debug, Clone, Copy)]
pub struct RandomSplitSearcher {
    min_split_size: usize,
    min_information_gain: f64,
}

impl RandomSplitSearcher {
    /// Creates a randomized split searcher with the given constraints.
    pub fn new(min_split_size: usize, min_information_gain: f64) -> Self {
        Self {
            min_split_size,
            min_information_gain,
        }
    }

    // Getters
    get_field!(get_min_split_size, min_split_size, usize);
    get_field!(get_min_information_gain, min_information_gain, f64);
}

impl SplitSearcher for RandomSplitSearcher {
    fn find_best_split(
        &self,
        calculator: &mut dyn ImpurityCalculator,
        values: &[f64],
        targets: &[f64],
        interval: Interval,
        rng: &mut StdRng,
    ) -> Option<Split> {
        if interval.get_length() < 2 * self.min_split_size {
            return None;
        }

        let from = interval.get_from();
        let to = interval.get_to();

        // Values are ordered, so the range is just the ends.
        let min_value = values[from];
        let max_value = values[to - 1];
        if (max_value - min_value).abs() < 1e-10 {
            return None;
        }

        let threshold = rng.random_range(min_value..max_value);

        // First position whose value exceeds the threshold.
        let mut index = from;
        while index < to && values[index] <= threshold {
            index += 1;
        }

        if index - from < self.min_split_size || to - index < self.min_split_size {
            return None;
        }

        calculator.init(targets, interval);
        let total_impurity = calculator.node_impurity();
        calculator.update_split_index(index);

        let gain = calculator.impurity_improvement(total_impurity);
        if gain < self.min_information_gain {
            return None;
        }

        Some(Split {
            split_index: index,
            threshold,
            impurities: calculator.child_impurities(),
            gain,
        })
    }
}
