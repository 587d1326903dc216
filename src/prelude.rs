pub use crate::error::ModelError;

pub use crate::tree::decision_tree::{DecisionTree, DecisionTreeParams};
pub use crate::tree::impurity::{
    ChildImpurities,
    GiniImpurityCalculator,
    ImpurityCalculator,
    RegressionImpurityCalculator,
};
pub use crate::tree::interval::Interval;
pub use crate::tree::model::{Node, Tree};
pub use crate::tree::split::{
    ExhaustiveSplitSearcher,
    RandomSplitSearcher,
    Split,
    SplitSearcher,
};

pub use crate::ensemble::{
    ExtraTrees,
    ForestParams,
    GradientBoosting,
    GradientBoostingParams,
    Loss,
    RandomForest,
};

pub use crate::metric::{
    accuracy,
    mean_absolute_error,
    mean_squared_error,
    r2_score,
    root_mean_squared_error,
};
