use super::*;

/// Relative tolerance used when comparing accumulated impurity values.
///
/// Impurities are built from incremental sums and are subject to floating
/// point accumulation noise, so equality checks must not be exact.
const IMPURITY_TOLERANCE: f64 = 1e-5;

/// Compares two impurity values with relative tolerance.
fn tolerance_equal(a: f64, b: f64) -> bool {
    let diff = (a * IMPURITY_TOLERANCE).abs();
    (a - b).abs() <= diff
}

/// Left and right child impurities of a candidate split.
///
/// Values are compared with relative tolerance (`approx_eq`) rather than exact
/// floating equality, because both sides are accumulated incrementally while
/// the split point sweeps across the node.
///
/// # Fields
///
/// - `left` - Impurity of the left child partition
/// - `right` - Impurity of the right child partition
#[derive(Debug, Clone, Copy)]
pub struct ChildImpurities {
    pub left: f64,
    pub right: f64,
}

impl ChildImpurities {
    /// Creates a new impurity pair.
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Compares two impurity pairs with relative tolerance on each side.
    ///
    /// # Parameters
    ///
    /// * `other` - The pair to compare against
    ///
    /// # Returns
    ///
    /// * `bool` - `true` when both sides agree within tolerance
    pub fn approx_eq(&self, other: &ChildImpurities) -> bool {
        tolerance_equal(self.left, other.left) && tolerance_equal(self.right, other.right)
    }
}

/// Incremental impurity computation over a partition of target values.
///
/// A calculator is initialized over a node's targets (ordered by the feature
/// under consideration) and then repositioned with `update_split_index` as the
/// candidate split point sweeps left to right. Each reposition transfers only
/// the boundary elements between the two sides, so a full sweep over a node of
/// `n` rows costs O(n) rather than O(n^2).
pub trait ImpurityCalculator {
    /// Establishes the working partition over `targets[interval]`.
    ///
    /// The split position starts at `interval.get_from()`, i.e. the left side
    /// is empty and the right side holds the whole interval.
    fn init(&mut self, targets: &[f64], interval: Interval);

    /// Moves the left/right boundary to `index`, which must not decrease
    /// between calls on the same partition.
    ///
    /// After the call the left side covers `[from, index)` and the right side
    /// covers `[index, to)`.
    fn update_split_index(&mut self, index: usize);

    /// Impurity of the whole working partition.
    fn node_impurity(&self) -> f64;

    /// Impurities of the current left and right sides.
    fn child_impurities(&self) -> ChildImpurities;

    /// Number of elements currently on the left side.
    fn left_count(&self) -> usize;

    /// Number of elements currently on the right side.
    fn right_count(&self) -> usize;

    /// Prediction for a leaf covering the whole working partition
    /// (mean for regression, majority class for classification).
    fn leaf_value(&self) -> f64;

    /// Class probability distribution for a leaf, when the calculator
    /// tracks classes. `None` for regression.
    fn leaf_probabilities(&self) -> Option<Vec<f64>>;

    /// Information gain of the current split position.
    ///
    /// # Parameters
    ///
    /// * `total_impurity` - Impurity of the unsplit partition
    ///
    /// # Returns
    ///
    /// * `f64` - `total_impurity` minus the count-weighted average of the child impurities
    fn impurity_improvement(&self, total_impurity: f64) -> f64 {
        let n = (self.left_count() + self.right_count()) as f64;
        if n == 0.0 {
            return 0.0;
        }

        let children = self.child_impurities();
        let weighted = (self.left_count() as f64 / n) * children.left
            + (self.right_count() as f64 / n) * children.right;

        total_impurity - weighted
    }
}

/// Variance-reduction impurity for regression targets.
///
/// Tracks running sums and sums of squares for the whole partition and for the
/// left side, so impurities are available in O(1) after each incremental
/// update. The leaf value is the mean of the partition's targets.
///
/// # Example
/// ```rust
/// use grove::tree::{ImpurityCalculator, Interval, RegressionImpurityCalculator};
///
/// let targets = [1.0, 1.0, 5.0, 5.0];
/// let mut calculator = RegressionImpurityCalculator::new();
/// calculator.init(&targets, Interval::new(0, 4).unwrap());
/// calculator.update_split_index(2);
///
/// let children = calculator.child_impurities();
/// assert!(children.left.abs() < 1e-12);
/// assert!(children.right.abs() < 1e-12);
/// assert_eq!(calculator.leaf_value(), 3.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegressionImpurityCalculator {
    targets: Vec<f64>,
    from: usize,
    to: usize,
    split_index: usize,
    total_sum: f64,
    total_sum_squares: f64,
    left_sum: f64,
    left_sum_squares: f64,
}

impl RegressionImpurityCalculator {
    /// Creates an uninitialized regression impurity calculator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Population variance from a sum, sum of squares and count.
    fn variance(sum: f64, sum_squares: f64, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }

        let n = count as f64;
        let mean = sum / n;
        // Guard against small negative values from floating cancellation.
        (sum_squares / n - mean * mean).max(0.0)
    }
}

impl ImpurityCalculator for RegressionImpurityCalculator {
    fn init(&mut self, targets: &[f64], interval: Interval) {
        self.targets = targets.to_vec();
        self.from = interval.get_from();
        self.to = interval.get_to();
        self.split_index = self.from;

        self.total_sum = 0.0;
        self.total_sum_squares = 0.0;
        self.left_sum = 0.0;
        self.left_sum_squares = 0.0;

        for &value in &self.targets[self.from..self.to] {
            self.total_sum += value;
            self.total_sum_squares += value * value;
        }
    }

    fn update_split_index(&mut self, index: usize) {
        debug_assert!(index >= self.split_index, "split index must not decrease");
        debug_assert!(index <= self.to);

        for &value in &self.targets[self.split_index..index] {
            self.left_sum += value;
            self.left_sum_squares += value * value;
        }
        self.split_index = index;
    }

    fn node_impurity(&self) -> f64 {
        Self::variance(self.total_sum, self.total_sum_squares, self.to - self.from)
    }

    fn child_impurities(&self) -> ChildImpurities {
        let left = Self::variance(self.left_sum, self.left_sum_squares, self.left_count());
        let right = Self::variance(
            self.total_sum - self.left_sum,
            self.total_sum_squares - self.left_sum_squares,
            self.right_count(),
        );
        ChildImpurities::new(left, right)
    }

    fn left_count(&self) -> usize {
        self.split_index - self.from
    }

    fn right_count(&self) -> usize {
        self.to - self.split_index
    }

    fn leaf_value(&self) -> f64 {
        let count = self.to - self.from;
        if count == 0 {
            return 0.0;
        }
        self.total_sum / count as f64
    }

    fn leaf_probabilities(&self) -> Option<Vec<f64>> {
        None
    }
}

/// Gini impurity for classification targets.
///
/// Class labels are non-negative integers encoded as `f64`. The calculator
/// tracks per-class counts for the whole partition and for the left side. The
/// leaf value is the majority class; `leaf_probabilities` exposes the full
/// class distribution.
#[derive(Debug, Clone)]
pub struct GiniImpurityCalculator {
    n_classes: usize,
    targets: Vec<f64>,
    from: usize,
    to: usize,
    split_index: usize,
    total_counts: Vec<f64>,
    left_counts: Vec<f64>,
}

impl GiniImpurityCalculator {
    /// Creates an uninitialized Gini impurity calculator for `n_classes` classes.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            targets: Vec::new(),
            from: 0,
            to: 0,
            split_index: 0,
            total_counts: vec![0.0; n_classes],
            left_counts: vec![0.0; n_classes],
        }
    }

    // Getters
    get_field!(get_n_classes, n_classes, usize);

    /// Gini impurity from class counts and their total.
    fn gini(counts: &[f64], total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }

        let n = total as f64;
        let mut gini = 1.0;
        for &count in counts {
            let p = count / n;
            gini -= p * p;
        }
        gini
    }
}

impl ImpurityCalculator for GiniImpurityCalculator {
    fn init(&mut self, targets: &[f64], interval: Interval) {
        self.targets = targets.to_vec();
        self.from = interval.get_from();
        self.to = interval.get_to();
        self.split_index = self.from;

        self.total_counts.iter_mut().for_each(|c| *c = 0.0);
        self.left_counts.iter_mut().for_each(|c| *c = 0.0);

        for &value in &self.targets[self.from..self.to] {
            self.total_counts[value as usize] += 1.0;
        }
    }

    fn update_split_index(&mut self, index: usize) {
        debug_assert!(index >= self.split_index, "split index must not decrease");
        debug_assert!(index <= self.to);

        for &value in &self.targets[self.split_index..index] {
            self.left_counts[value as usize] += 1.0;
        }
        self.split_index = index;
    }

    fn node_impurity(&self) -> f64 {
        Self::gini(&self.total_counts, self.to - self.from)
    }

    fn child_impurities(&self) -> ChildImpurities {
        let right_counts: Vec<f64> = self
            .total_counts
            .iter()
            .zip(self.left_counts.iter())
            .map(|(&total, &left)| total - left)
            .collect();

        ChildImpurities::new(
            Self::gini(&self.left_counts, self.left_count()),
            Self::gini(&right_counts, self.right_count()),
        )
    }

    fn left_count(&self) -> usize {
        self.split_index - self.from
    }

    fn right_count(&self) -> usize {
        self.to - self.split_index
    }

    fn leaf_value(&self) -> f64 {
        let majority_class = self
            .total_counts
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(class, _)| class)
            .unwrap_or(0);

        majority_class as f64
    }

    fn leaf_probabilities(&self) -> Option<Vec<f64>> {
        let total = (self.to - self.from) as f64;
        if total == 0.0 {
            return Some(vec![0.0; self.n_classes]);
        }

        Some(self.total_counts.iter().map(|&c| c / total).collect())
    }
}
