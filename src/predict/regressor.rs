use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

use super::features::{FEATURE_COUNT, Feature, FeatureVector};

/// A fitted price model. Shared read-only across every prediction.
pub trait Regressor: Send + Sync {
    /// Predict the price of a single car.
    fn predict_one(&self, features: &FeatureVector) -> f64;

    /// Short description for the status bar.
    fn describe(&self) -> String;
}

pub const MODEL_FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Regression tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Go left when `x[feature] <= threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf { value: f64 },
}

impl TreeNode {
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Leaf nodes have depth 0.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn max_feature(&self) -> Option<usize> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature,
                left,
                right,
                ..
            } => Some(*feature)
                .into_iter()
                .chain(left.max_feature())
                .chain(right.max_feature())
                .max(),
        }
    }
}

// ---------------------------------------------------------------------------
// Gradient-boosted ensemble
// ---------------------------------------------------------------------------

/// Least-squares gradient boosting: `init + learning_rate * Σ tree(x)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    pub format_version: u32,
    pub n_features: usize,
    /// Training column names; checked against [`Feature::ORDER`] when present.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub init: f64,
    pub learning_rate: f64,
    pub trees: Vec<TreeNode>,
}

impl GradientBoostedTrees {
    /// Read and check a JSON model file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).context("reading model file")?;
        let model: Self = serde_json::from_str(&text).context("parsing model JSON")?;
        model.check()?;
        Ok(model)
    }

    /// Reject models whose input layout differs from the assembled vector.
    pub fn check(&self) -> Result<()> {
        if self.format_version != MODEL_FORMAT_VERSION {
            bail!(
                "unsupported model format version {} (expected {MODEL_FORMAT_VERSION})",
                self.format_version
            );
        }
        ensure!(
            self.n_features == FEATURE_COUNT,
            "model expects {} features, the form produces {FEATURE_COUNT}",
            self.n_features
        );
        if let Some(names) = &self.feature_names {
            let expected: Vec<&str> = Feature::ORDER.iter().map(|f| f.name()).collect();
            ensure!(
                names.iter().map(String::as_str).eq(expected.iter().copied()),
                "model feature order {names:?} does not match {expected:?}"
            );
        }
        for (i, tree) in self.trees.iter().enumerate() {
            if let Some(feature) = tree.max_feature() {
                ensure!(
                    feature < FEATURE_COUNT,
                    "tree {i} splits on feature {feature}, only {FEATURE_COUNT} exist"
                );
            }
        }
        Ok(())
    }
}

impl Regressor for GradientBoostedTrees {
    fn predict_one(&self, features: &FeatureVector) -> f64 {
        let x = features.as_slice();
        let boost: f64 = self.trees.iter().map(|t| t.evaluate(x)).sum();
        self.init + self.learning_rate * boost
    }

    fn describe(&self) -> String {
        let depth = self.trees.iter().map(TreeNode::depth).max().unwrap_or(0);
        format!("gradient boosting, {} trees, depth ≤ {depth}", self.trees.len())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Returns a fixed price and counts how often it was asked.
    pub(crate) struct FixedRegressor {
        pub price: f64,
        pub calls: AtomicUsize,
    }

    impl FixedRegressor {
        pub(crate) fn new(price: f64) -> Self {
            Self {
                price,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Regressor for FixedRegressor {
        fn predict_one(&self, _features: &FeatureVector) -> f64 {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.price
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    fn leaf(value: f64) -> Box<TreeNode> {
        Box::new(TreeNode::Leaf { value })
    }

    fn year_stump() -> TreeNode {
        TreeNode::Split {
            feature: Feature::ModelYear.position(),
            threshold: 2015.5,
            left: leaf(-100_000.0),
            right: leaf(150_000.0),
        }
    }

    fn model(trees: Vec<TreeNode>) -> GradientBoostedTrees {
        GradientBoostedTrees {
            format_version: MODEL_FORMAT_VERSION,
            n_features: FEATURE_COUNT,
            feature_names: None,
            init: 500_000.0,
            learning_rate: 0.5,
            trees,
        }
    }

    fn vector_with_year(year: f64) -> FeatureVector {
        let mut x = [1.0; FEATURE_COUNT];
        x[Feature::ModelYear.position()] = year;
        FeatureVector::from_array(x)
    }

    #[test]
    fn sums_scaled_tree_outputs() {
        let m = model(vec![year_stump(), *leaf(20_000.0)]);
        assert_eq!(m.predict_one(&vector_with_year(2012.0)), 500_000.0 + 0.5 * -80_000.0);
        assert_eq!(m.predict_one(&vector_with_year(2019.0)), 500_000.0 + 0.5 * 170_000.0);
    }

    #[test]
    fn threshold_goes_left() {
        assert_eq!(year_stump().evaluate(vector_with_year(2015.5).as_slice()), -100_000.0);
        assert_eq!(year_stump().depth(), 1);
    }

    #[test]
    fn check_rejects_wrong_layout() {
        let mut m = model(vec![year_stump()]);
        assert!(m.check().is_ok());

        m.n_features = 10;
        assert!(m.check().is_err());

        let mut m = model(vec![TreeNode::Split {
            feature: 11,
            threshold: 0.0,
            left: leaf(0.0),
            right: leaf(0.0),
        }]);
        assert!(m.check().is_err());

        m.trees.clear();
        let mut names: Vec<String> = Feature::ORDER.iter().map(|f| f.name().to_string()).collect();
        m.feature_names = Some(names.clone());
        assert!(m.check().is_ok());
        names.swap(0, 1);
        m.feature_names = Some(names);
        assert!(m.check().is_err());
    }

    #[test]
    fn loads_json_model() {
        let body = r#"{
            "format_version": 1,
            "n_features": 11,
            "init": 400000.0,
            "learning_rate": 0.1,
            "trees": [
                {"split": {"feature": 3, "threshold": 2015.5,
                           "left": {"leaf": {"value": -50000.0}},
                           "right": {"leaf": {"value": 90000.0}}}}
            ]
        }"#;
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();

        let m = GradientBoostedTrees::load(file.path()).unwrap();
        assert_eq!(m.trees.len(), 1);
        assert_eq!(m.predict_one(&vector_with_year(2020.0)), 400_000.0 + 0.1 * 90_000.0);
    }

    #[test]
    fn missing_model_file_fails() {
        let err = GradientBoostedTrees::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading model file"));
    }
}
