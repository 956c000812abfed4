//! Decision tree ensembles
//!
//! Trees use the flat array layout scikit-learn exports: node `i` is a leaf
//! when `children_left[i] == -1`, otherwise a row goes left when
//! `x[feature[i]] <= threshold[i]`. Leaf `value`s hold per-class weights
//! (counts or fractions); each tree's leaf is normalized before averaging.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

use super::{check_row, Classifier};

const LEAF: i64 = -1;

/// One fitted tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNodes {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl TreeNodes {
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<()> {
        let n = self.children_left.len();
        if n == 0 {
            bail!("tree has no nodes");
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            bail!("tree node arrays have mismatched lengths");
        }

        for i in 0..n {
            let (left, right) = (self.children_left[i], self.children_right[i]);
            if left == LEAF {
                let value = &self.value[i];
                if value.len() != n_classes {
                    bail!(
                        "leaf {} has {} class weights, expected {}",
                        i,
                        value.len(),
                        n_classes
                    );
                }
                if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                    bail!("leaf {} has invalid class weights", i);
                }
                continue;
            }
            // children always come after their parent in exported trees,
            // which also rules out cycles
            for child in [left, right] {
                if child <= i as i64 || child >= n as i64 {
                    bail!("node {} has out-of-range child {}", i, child);
                }
            }
            let feature = self.feature[i];
            if feature < 0 || feature as usize >= n_features {
                bail!("node {} splits on unknown feature {}", i, feature);
            }
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf a row lands in
    fn leaf_distribution(&self, features: &[f64]) -> Result<Vec<f64>> {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let x = features[self.feature[node] as usize];
            let next = if x <= self.threshold[node] {
                self.children_left[node]
            } else {
                self.children_right[node]
            };
            node = next as usize;
        }

        let value = &self.value[node];
        let total: f64 = value.iter().sum();
        if total <= 0.0 {
            return Err(anyhow!("leaf {} has zero total weight", node));
        }
        Ok(value.iter().map(|v| v / total).collect())
    }
}

/// Averaged ensemble of decision trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub trees: Vec<TreeNodes>,
}

impl RandomForest {
    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            bail!("forest has no classes");
        }
        if self.trees.is_empty() {
            bail!("forest has no trees");
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|e| anyhow!("tree {}: {}", i, e))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>> {
        check_row(features, self.n_features)?;

        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.leaf_distribution(features)?) {
                *acc += p;
            }
        }

        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // x[0] <= 0.5 -> [3, 1], else -> [0, 4]
    fn stump() -> TreeNodes {
        TreeNodes {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![0, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![vec![3.0, 5.0], vec![3.0, 1.0], vec![0.0, 4.0]],
        }
    }

    fn forest() -> RandomForest {
        RandomForest {
            n_features: 2,
            classes: vec![0, 1],
            trees: vec![stump()],
        }
    }

    #[test]
    fn test_single_tree() {
        let f = forest();
        f.validate().unwrap();
        assert_eq!(f.predict_proba(&[0.0, 9.0]).unwrap(), vec![0.75, 0.25]);
        assert_eq!(f.predict_proba(&[1.0, 9.0]).unwrap(), vec![0.0, 1.0]);
        assert_eq!(f.predict(&[0.0, 9.0]).unwrap(), 0);
        assert_eq!(f.predict(&[1.0, 9.0]).unwrap(), 1);
    }

    #[test]
    fn test_threshold_is_inclusive_on_the_left() {
        assert_eq!(forest().predict(&[0.5, 0.0]).unwrap(), 0);
    }

    #[test]
    fn test_trees_are_averaged() {
        let mut f = forest();
        let mut leaf_only = stump();
        leaf_only.children_left = vec![-1];
        leaf_only.children_right = vec![-1];
        leaf_only.feature = vec![-2];
        leaf_only.threshold = vec![-2.0];
        leaf_only.value = vec![vec![1.0, 1.0]];
        f.trees.push(leaf_only);
        f.validate().unwrap();

        let proba = f.predict_proba(&[1.0, 0.0]).unwrap();
        assert!((proba[0] - 0.25).abs() < 1e-12);
        assert!((proba[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_validate_rejects_bad_children() {
        let mut f = forest();
        f.trees[0].children_left[0] = 7;
        assert!(f.validate().is_err());

        let mut f = forest();
        f.trees[0].children_right[0] = 0;
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_feature() {
        let mut f = forest();
        f.trees[0].feature[0] = 5;
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_leaf_width() {
        let mut f = forest();
        f.trees[0].value[1] = vec![1.0];
        assert!(f.validate().is_err());
    }
}
