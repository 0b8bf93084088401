//! Decision tree ensembles in flattened node-array form
//!
//! Node `i` is described by `feature[i]`, `threshold[i]`, `left[i]`,
//! `right[i]` and `value[i]` (per-class sample weights). A node whose `left`
//! child is [`TREE_LEAF`] is a leaf. Rows with `x[feature] <= threshold`
//! descend left.

use super::{argmax, check_input};
use crate::classifier::Classifier;
use crate::error::{Error, Result};
use crate::vector::FeatureMatrix;
use serde::{Deserialize, Serialize};

/// Child index marking a leaf node
pub const TREE_LEAF: i32 = -1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionTree {
    pub feature: Vec<i32>,
    pub threshold: Vec<f64>,
    pub left: Vec<i32>,
    pub right: Vec<i32>,
    pub value: Vec<[f64; 2]>,
}

impl DecisionTree {
    /// A tree with a single leaf holding `value`
    pub fn leaf(value: [f64; 2]) -> Self {
        Self {
            feature: vec![TREE_LEAF],
            threshold: vec![0.0],
            left: vec![TREE_LEAF],
            right: vec![TREE_LEAF],
            value: vec![value],
        }
    }

    pub fn node_count(&self) -> usize {
        self.value.len()
    }

    /// Check node arrays agree in length and every reference is in range
    pub fn validate(&self, n_features: usize) -> Result<()> {
        let n = self.value.len();
        if n == 0 {
            return Err(Error::InvalidModel("decision tree has no nodes".to_string()));
        }
        if self.feature.len() != n
            || self.threshold.len() != n
            || self.left.len() != n
            || self.right.len() != n
        {
            return Err(Error::InvalidModel(
                "decision tree node arrays differ in length".to_string(),
            ));
        }

        for i in 0..n {
            let [n0, n1] = self.value[i];
            if !(n0.is_finite() && n1.is_finite()) || n0 < 0.0 || n1 < 0.0 {
                return Err(Error::InvalidModel(format!(
                    "node {} has class weights that are negative or not finite",
                    i
                )));
            }
            if self.left[i] == TREE_LEAF {
                continue;
            }
            if !self.threshold[i].is_finite() {
                return Err(Error::InvalidModel(format!(
                    "node {} has a non-finite threshold",
                    i
                )));
            }
            let in_range = |child: i32| child > i as i32 && (child as usize) < n;
            if !in_range(self.left[i]) || !in_range(self.right[i]) {
                return Err(Error::InvalidModel(format!(
                    "node {} has a child index out of range",
                    i
                )));
            }
            if self.feature[i] < 0 || self.feature[i] as usize >= n_features {
                return Err(Error::InvalidModel(format!(
                    "node {} splits on feature {} of {}",
                    i, self.feature[i], n_features
                )));
            }
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf `row` falls into
    ///
    /// Each split must name a feature present in `row` and a child further
    /// down the arrays; otherwise the walk stops with `InvalidModel`.
    pub fn leaf_proba(&self, row: &[f64]) -> Result<[f64; 2]> {
        let n = self.node_count();
        let mut node = 0usize;
        loop {
            if node >= n || node >= self.left.len() {
                return Err(Error::InvalidModel(format!("node {} out of range", node)));
            }
            if self.left[node] == TREE_LEAF {
                break;
            }

            let feature = self.feature.get(node).copied().unwrap_or(TREE_LEAF);
            let x = usize::try_from(feature)
                .ok()
                .and_then(|f| row.get(f))
                .ok_or_else(|| {
                    Error::InvalidModel(format!(
                        "node {} splits on feature {} of {}",
                        node,
                        feature,
                        row.len()
                    ))
                })?;
            let threshold = self.threshold.get(node).copied().unwrap_or(f64::NAN);
            let child = if *x <= threshold {
                self.left[node]
            } else {
                self.right.get(node).copied().unwrap_or(TREE_LEAF)
            };
            if child <= node as i32 {
                return Err(Error::InvalidModel(format!(
                    "node {} has a child index out of range",
                    node
                )));
            }
            node = child as usize;
        }

        let [n0, n1] = self.value[node];
        let total = n0 + n1;
        Ok(if total > 0.0 {
            [n0 / total, n1 / total]
        } else {
            [0.5, 0.5]
        })
    }
}

/// Averaging ensemble of decision trees
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(n_features: usize, trees: Vec<DecisionTree>) -> Self {
        Self { n_features, trees }
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_features == 0 {
            return Err(Error::InvalidModel("forest declares zero features".to_string()));
        }
        if self.trees.is_empty() {
            return Err(Error::InvalidModel("forest has no trees".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features).map_err(|e| match e {
                Error::InvalidModel(msg) => Error::InvalidModel(format!("tree {}: {}", i, msg)),
                other => other,
            })?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<u8>> {
        Ok(self.predict_proba(x)?.iter().map(argmax).collect())
    }

    fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<[f64; 2]>> {
        check_input(x, self.n_features)?;
        if self.trees.is_empty() {
            return Err(Error::InvalidModel("forest has no trees".to_string()));
        }
        let n_trees = self.trees.len() as f64;

        x.iter_rows()
            .map(|row| {
                let mut sum = [0.0, 0.0];
                for tree in &self.trees {
                    let p = tree.leaf_proba(row)?;
                    sum[0] += p[0];
                    sum[1] += p[1];
                }
                Ok([sum[0] / n_trees, sum[1] / n_trees])
            })
            .collect()
    }
}
