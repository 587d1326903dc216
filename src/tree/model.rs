use super::*;

/// A node in the tree arena.
///
/// Children are arena indices rather than owned pointers, which keeps the
/// structure acyclic and singly owned by construction.
///
/// # Variants
///
/// - `Split` - An internal decision node.
///   - `feature_index`: Index of the feature used for splitting.
///   - `threshold`: Threshold value (rows with feature value ≤ threshold go left).
///   - `left`/`right`: Arena indices of the child nodes.
/// - `Leaf` - A terminal node that produces a prediction.
///   - `value`: The predicted value (class label for classification, continuous value for regression).
///   - `probabilities`: For classification, probability distribution over all classes.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Split {
        feature_index: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
        probabilities: Option<Vec<f64>>,
    },
}

/// An immutable fitted decision tree.
///
/// Owns its node arena (root at index 0) and a per-feature raw
/// variable-importance vector holding the sum of information gain attributable
/// to each feature across all splits in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
    raw_variable_importance: Array1<f64>,
}

impl Tree {
    /// Wraps a grown node arena and its importance vector into a tree model.
    pub(crate) fn new(nodes: Vec<Node>, raw_variable_importance: Array1<f64>) -> Self {
        debug_assert!(!nodes.is_empty());
        Self {
            nodes,
            raw_variable_importance,
        }
    }

    /// Routes a single row from the root to a leaf and returns the leaf value.
    ///
    /// # Parameters
    ///
    /// * `row` - Feature values for one sample, length equal to the training column count
    ///
    /// # Returns
    ///
    /// * `f64` - The leaf's predicted value
    pub fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value, .. } => return *value,
                Node::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature_index] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Routes a single row to a leaf and returns its class distribution.
    ///
    /// # Parameters
    ///
    /// * `row` - Feature values for one sample
    ///
    /// # Returns
    ///
    /// * `Result<Vec<f64>, ModelError>` - The leaf's class probabilities, or a `TreeError` when the tree was grown for regression
    pub fn predict_proba_row(&self, row: ArrayView1<f64>) -> Result<Vec<f64>, ModelError> {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { probabilities, .. } => {
                    return probabilities
                        .clone()
                        .ok_or(ModelError::TreeError("No probabilities in leaf node"));
                }
                Node::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature_index] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Returns the tree's per-feature raw variable importance.
    pub fn get_raw_variable_importance(&self) -> &Array1<f64> {
        &self.raw_variable_importance
    }

    /// Returns the node arena.
    pub fn get_nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }
}
