//! Random-forest classifier loaded from a JSON tree export.
//!
//! Each tree is a flat node list rooted at index 0. Splits send a row left when
//! `x[feature] <= threshold`. Leaves carry per-class weights (sample counts or
//! fractions); the forest averages the per-tree normalized distributions and returns the
//! class with the highest mean, first class winning ties.

use super::{ModelError, Scorer, ScoringError};
use crate::features::FeatureFrame;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    fn leaf(&self, row: ArrayView1<'_, f64>) -> &[f64] {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => i = if row[*feature] <= *threshold { *left } else { *right },
                Node::Leaf { value } => return value,
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestScorer {
    classes: Vec<String>,
    n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feature_names: Option<Vec<String>>,
    trees: Vec<Tree>,
}

impl ForestScorer {
    pub fn new(
        classes: Vec<String>,
        n_features: usize,
        feature_names: Option<Vec<String>>,
        trees: Vec<Tree>,
    ) -> Result<Self, ModelError> {
        let forest = Self {
            classes,
            n_features,
            feature_names,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let forest: ForestScorer = serde_json::from_slice(bytes)?;
        forest.validate()?;
        Ok(forest)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Children must come after their parent, which also rules out cycles.
    fn validate(&self) -> Result<(), ModelError> {
        let invalid = |msg: String| Err(ModelError::Invalid(msg));
        if self.classes.is_empty() {
            return invalid("no classes".into());
        }
        if self.trees.is_empty() {
            return invalid("no trees".into());
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return invalid(format!(
                    "{} feature names for {} features",
                    names.len(),
                    self.n_features
                ));
            }
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return invalid(format!("tree {t} has no nodes"));
            }
            let len = tree.nodes.len();
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= self.n_features {
                            return invalid(format!("tree {t} node {i}: feature {feature} out of range"));
                        }
                        if threshold.is_nan() {
                            return invalid(format!("tree {t} node {i}: NaN threshold"));
                        }
                        if *left <= i || *right <= i || *left >= len || *right >= len {
                            return invalid(format!("tree {t} node {i}: bad child index"));
                        }
                    }
                    Node::Leaf { value } => {
                        if value.len() != self.classes.len() {
                            return invalid(format!(
                                "tree {t} node {i}: {} leaf weights for {} classes",
                                value.len(),
                                self.classes.len()
                            ));
                        }
                        let total: f64 = value.iter().sum();
                        if value.iter().any(|v| !v.is_finite() || *v < 0.0) || total <= 0.0 {
                            return invalid(format!("tree {t} node {i}: bad leaf weights"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn check_frame(&self, features: &FeatureFrame) -> Result<(), ScoringError> {
        if features.n_cols() != self.n_features {
            return Err(ScoringError::SchemaMismatch {
                expected: self.n_features,
                actual: features.n_cols(),
            });
        }
        if let Some(names) = &self.feature_names {
            for (index, (expected, actual)) in names.iter().zip(features.columns()).enumerate() {
                if expected != actual {
                    return Err(ScoringError::FeatureName {
                        index,
                        expected: expected.clone(),
                        actual: actual.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Mean normalized class distribution for one row.
    pub fn class_distribution(&self, row: ArrayView1<'_, f64>) -> Vec<f64> {
        let mut acc = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf(row);
            let total: f64 = leaf.iter().sum();
            for (a, v) in acc.iter_mut().zip(leaf) {
                *a += v / total;
            }
        }
        let n = self.trees.len() as f64;
        acc.iter_mut().for_each(|a| *a /= n);
        acc
    }
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

impl Scorer for ForestScorer {
    fn predict(&self, features: &FeatureFrame) -> Result<Vec<String>, ScoringError> {
        self.check_frame(features)?;
        Ok((0..features.n_rows())
            .map(|r| {
                let dist = self.class_distribution(features.row(r));
                self.classes[argmax(&dist)].clone()
            })
            .collect())
    }

    fn name(&self) -> &str {
        "forest"
    }
}
