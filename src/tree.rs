pub(crate) use crate::error::ModelError;
pub(crate) use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
pub(crate) use rand::prelude::*;
pub(crate) use rayon::prelude::*;

/// Depth-first tree growth into a flat node arena
pub mod builder;
/// Public decision tree learner for classification and regression
pub mod decision_tree;
/// This module provides shared input validation helpers
pub(crate) mod helper_functions;
/// Impurity calculators for classification (Gini) and regression (variance)
pub mod impurity;
/// Immutable half-open index interval
pub mod interval;
/// Node arena and fitted tree model
pub mod model;
/// Split searchers: exhaustive boundary scan and randomized thresholds
pub mod split;

pub use builder::*;
pub use decision_tree::*;
pub use impurity::*;
pub use interval::*;
pub use model::*;
pub use split::*;
