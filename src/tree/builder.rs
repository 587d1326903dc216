use super::*;
use super::impurity::ImpurityCalculator;
use super::model::{Node, Tree};
use super::split::{Split, SplitSearcher};

/// Grows one decision tree depth-first into a flat node arena.
///
/// The builder combines an impurity calculator and a split searcher (both
/// selected at learner-construction time) with the stopping rules that turn an
/// interval of rows into a leaf: maximum depth reached, too few rows for a
/// split, all targets identical, or no candidate split with sufficient gain.
///
/// Per-feature ordered row indices are computed once by the learner against
/// the full matrix; the builder restricts them to the current node's rows via
/// membership filtering instead of re-sorting, so bootstrap subsets (with
/// repeats) reuse the same shared ordering.
///
/// Each builder owns its dedicated random generator, used for per-split
/// feature subsets and for randomized thresholds. No state is shared between
/// builders, which is what makes parallel ensemble construction deterministic.
#[derive(Debug)]
pub struct DepthFirstTreeBuilder<S, C>
where
    S: SplitSearcher,
    C: ImpurityCalculator,
{
    max_depth: Option<usize>,
    features_per_split: Option<usize>,
    searcher: S,
    calculator: C,
    rng: StdRng,
}

/// Borrowed training data plus the growth state accumulated while building.
struct GrowContext<'a> {
    x: ArrayView2<'a, f64>,
    y: ArrayView1<'a, f64>,
    ordered: &'a [Vec<usize>],
    nodes: Vec<Node>,
    variable_importance: Array1<f64>,
    // Scratch: per-row membership multiplicity of the current node.
    membership: Vec<usize>,
    // Scratch: feature indices shuffled when drawing per-split subsets.
    feature_pool: Vec<usize>,
}

impl<S, C> DepthFirstTreeBuilder<S, C>
where
    S: SplitSearcher,
    C: ImpurityCalculator,
{
    /// Creates a tree builder.
    ///
    /// # Parameters
    ///
    /// - `max_depth` - Maximum node depth; `None` grows until other stopping rules fire, `Some(0)` yields a single leaf
    /// - `features_per_split` - Number of features drawn without replacement per split; `None` uses all columns in order
    /// - `searcher` - Split searcher variant
    /// - `calculator` - Impurity calculator variant
    /// - `rng` - The tree's dedicated random generator
    ///
    /// # Returns
    ///
    /// * `DepthFirstTreeBuilder` - A builder ready to grow one tree
    pub fn new(
        max_depth: Option<usize>,
        features_per_split: Option<usize>,
        searcher: S,
        calculator: C,
        rng: StdRng,
    ) -> Self {
        Self {
            max_depth,
            features_per_split,
            searcher,
            calculator,
            rng,
        }
    }

    /// Grows a tree over the given row subset.
    ///
    /// # Parameters
    ///
    /// - `x` - Feature matrix, shape (n_samples, n_features), never mutated
    /// - `y` - Targets aligned to the matrix rows
    /// - `rows` - Row indices to grow on; repeats are allowed for bootstrap samples
    /// - `ordered` - Per-feature row-index permutations sorted ascending by that feature, computed against the full matrix
    ///
    /// # Returns
    ///
    /// * `Result<Tree, ModelError>` - The immutable tree model, or an error on malformed inputs
    pub fn build(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        rows: &[usize],
        ordered: &[Vec<usize>],
    ) -> Result<Tree, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::InputValidationError(
                "Cannot grow a tree over an empty row subset".to_string(),
            ));
        }

        let n_features = x.ncols();
        let mut context = GrowContext {
            x: x.view(),
            y: y.view(),
            ordered,
            nodes: Vec::new(),
            variable_importance: Array1::zeros(n_features),
            membership: vec![0; x.nrows()],
            feature_pool: (0..n_features).collect(),
        };

        let root = self.split_node(&mut context, rows, 0)?;
        debug_assert_eq!(root, 0);

        Ok(Tree::new(context.nodes, context.variable_importance))
    }

    /// Recursive split state: emits a leaf or an internal node plus two
    /// recursive calls on the partitioned row sets.
    fn split_node(
        &mut self,
        context: &mut GrowContext,
        rows: &[usize],
        depth: usize,
    ) -> Result<usize, ModelError> {
        let depth_reached = self.max_depth.is_some_and(|limit| depth >= limit);
        if depth_reached || rows.len() < 2 || self.targets_identical(context, rows) {
            return self.create_leaf(context, rows);
        }

        let best = self.find_node_split(context, rows)?;

        let Some((feature_index, split, ordered_rows)) = best else {
            return self.create_leaf(context, rows);
        };

        context.variable_importance[feature_index] += split.gain;

        let left_rows = ordered_rows[..split.split_index].to_vec();
        let right_rows = ordered_rows[split.split_index..].to_vec();

        // Children land after the parent in the arena, so the root stays at 0.
        let node_index = context.nodes.len();
        context.nodes.push(Node::Split {
            feature_index,
            threshold: split.threshold,
            left: 0,
            right: 0,
        });

        let left_index = self.split_node(context, &left_rows, depth + 1)?;
        let right_index = self.split_node(context, &right_rows, depth + 1)?;

        if let Node::Split { left, right, .. } = &mut context.nodes[node_index] {
            *left = left_index;
            *right = right_index;
        }

        Ok(node_index)
    }

    /// Searches the candidate features for the best split of the given rows.
    ///
    /// Returns the winning feature, its split and the node's rows ordered by
    /// that feature, or `None` when no candidate qualifies.
    fn find_node_split(
        &mut self,
        context: &mut GrowContext,
        rows: &[usize],
    ) -> Result<Option<(usize, Split, Vec<usize>)>, ModelError> {
        let n_features = context.x.ncols();
        let candidate_count = self.candidate_feature_count(n_features);
        self.draw_candidate_features(context, candidate_count, n_features);

        for &row in rows {
            context.membership[row] += 1;
        }

        let interval = Interval::new(0, rows.len())?;

        let mut ordered_rows = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len());
        let mut targets = Vec::with_capacity(rows.len());

        let mut best: Option<(usize, Split, Vec<usize>)> = None;

        for position in 0..candidate_count {
            let feature_index = context.feature_pool[position];

            ordered_rows.clear();
            values.clear();
            targets.clear();

            // Restrict the shared feature ordering to this node's rows,
            // honoring bootstrap multiplicity.
            for &row in &context.ordered[feature_index] {
                for _ in 0..context.membership[row] {
                    ordered_rows.push(row);
                    values.push(context.x[[row, feature_index]]);
                    targets.push(context.y[row]);
                }
            }

            let split = self.searcher.find_best_split(
                &mut self.calculator,
                &values,
                &targets,
                interval,
                &mut self.rng,
            );

            if let Some(split) = split {
                // Strict comparison keeps the first feature on equal gain.
                if best.as_ref().is_none_or(|(_, b, _)| split.gain > b.gain) {
                    best = Some((feature_index, split, ordered_rows.clone()));
                }
            }
        }

        for &row in rows {
            context.membership[row] = 0;
        }

        Ok(best)
    }

    /// Number of features examined per split.
    fn candidate_feature_count(&self, n_features: usize) -> usize {
        self.features_per_split
            .unwrap_or(n_features)
            .clamp(1, n_features)
    }

    /// Places a random feature subset of the requested size at the front of
    /// the feature pool (partial Fisher-Yates). When all features are used the
    /// pool keeps its natural order and no random numbers are drawn.
    fn draw_candidate_features(
        &mut self,
        context: &mut GrowContext,
        candidate_count: usize,
        n_features: usize,
    ) {
        if candidate_count >= n_features {
            context.feature_pool.clear();
            context.feature_pool.extend(0..n_features);
            return;
        }

        for i in 0..candidate_count {
            let j = self.rng.random_range(i..n_features);
            context.feature_pool.swap(i, j);
        }
    }

    /// Checks whether every target in the row set carries the same value.
    fn targets_identical(&self, context: &GrowContext, rows: &[usize]) -> bool {
        let first = context.y[rows[0]];
        rows.iter().all(|&row| (context.y[row] - first).abs() < 1e-10)
    }

    /// Emits a leaf node whose value comes from the impurity calculator's
    /// leaf-value formula over the row set.
    fn create_leaf(&mut self, context: &mut GrowContext, rows: &[usize]) -> Result<usize, ModelError> {
        let targets: Vec<f64> = rows.iter().map(|&row| context.y[row]).collect();
        self.calculator
            .init(&targets, Interval::new(0, targets.len())?);

        let node_index = context.nodes.len();
        context.nodes.push(Node::Leaf {
            value: self.calculator.leaf_value(),
            probabilities: self.calculator.leaf_probabilities(),
        });

        Ok(node_index)
    }
}
