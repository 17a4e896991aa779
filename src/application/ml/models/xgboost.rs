//! Second-order gradient-boosted trees with the XGBoost objective.
//!
//! Squared-error loss gives g = prediction - target and h = 1 per row. Trees
//! are grown greedily (exact split enumeration) using the regularised gain
//!
//! ```text
//! gain = ½ [G_L²/(H_L+λ) + G_R²/(H_R+λ) − G²/(H+λ)] − γ
//! ```
//!
//! and every leaf stores `−η · G/(H+λ)`.

use super::{check_fit_input, mean};
use crate::domain::errors::ModelError;
use crate::domain::ml::{Algorithm, FeatureRow, LAG_COUNT};
use serde::{Deserialize, Serialize};

const MIN_GAIN: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XgBoostParams {
    pub n_estimators: usize,
    /// Shrinkage applied to every leaf weight
    pub eta: f64,
    pub max_depth: usize,
    /// L2 regularisation on leaf weights
    pub lambda: f64,
    /// Minimum loss reduction required to split
    pub gamma: f64,
    /// Minimum hessian sum in each child
    pub min_child_weight: f64,
}

impl Default for XgBoostParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            eta: 0.3,
            max_depth: 6,
            lambda: 1.0,
            gamma: 0.0,
            min_child_weight: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        weight: f64,
    },
    Split {
        feature: usize,
        /// Rows with `x[feature] < threshold` go left
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BoostedTree {
    nodes: Vec<Node>,
}

impl BoostedTree {
    fn predict_row(&self, lags: &[f64; LAG_COUNT]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { weight }) => return *weight,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    idx = if lags[*feature] < *threshold { *left } else { *right };
                }
                None => return 0.0,
            }
        }
    }
}

struct SplitCandidate {
    gain: f64,
    feature: usize,
    threshold: f64,
}

struct TreeBuilder<'a> {
    rows: &'a [FeatureRow],
    grad: &'a [f64],
    params: &'a XgBoostParams,
    nodes: Vec<Node>,
}

impl<'a> TreeBuilder<'a> {
    fn build(mut self, indices: Vec<usize>) -> BoostedTree {
        self.grow(indices, 0);
        BoostedTree { nodes: self.nodes }
    }

    /// Appends the subtree for `indices` and returns its root position.
    fn grow(&mut self, indices: Vec<usize>, depth: usize) -> usize {
        let g: f64 = indices.iter().map(|&i| self.grad[i]).sum();
        let h = indices.len() as f64;
        let position = self.nodes.len();

        let split = if depth < self.params.max_depth {
            self.best_split(&indices, g, h)
        } else {
            None
        };

        let Some(split) = split else {
            let weight = -self.params.eta * g / (h + self.params.lambda);
            self.nodes.push(Node::Leaf { weight });
            return position;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.rows[i].lags[split.feature] < split.threshold);

        // Placeholder, patched once both children exist
        self.nodes.push(Node::Leaf { weight: 0.0 });
        let left = self.grow(left_idx, depth + 1);
        let right = self.grow(right_idx, depth + 1);
        self.nodes[position] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        position
    }

    fn best_split(&self, indices: &[usize], g: f64, h: f64) -> Option<SplitCandidate> {
        let lambda = self.params.lambda;
        let parent_score = g * g / (h + lambda);
        let mut best: Option<SplitCandidate> = None;

        for feature in 0..LAG_COUNT {
            let mut sorted = indices.to_vec();
            sorted.sort_by(|&a, &b| {
                self.rows[a].lags[feature]
                    .partial_cmp(&self.rows[b].lags[feature])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let mut g_left = 0.0;
            let mut h_left = 0.0;
            for pair in sorted.windows(2) {
                let (cur, next) = (pair[0], pair[1]);
                g_left += self.grad[cur];
                h_left += 1.0;

                let value = self.rows[cur].lags[feature];
                let next_value = self.rows[next].lags[feature];
                if next_value <= value {
                    continue;
                }

                let g_right = g - g_left;
                let h_right = h - h_left;
                if h_left < self.params.min_child_weight || h_right < self.params.min_child_weight {
                    continue;
                }

                let gain = 0.5
                    * (g_left * g_left / (h_left + lambda) + g_right * g_right / (h_right + lambda)
                        - parent_score)
                    - self.params.gamma;

                if gain > MIN_GAIN && best.as_ref().is_none_or(|b| gain > b.gain) {
                    best = Some(SplitCandidate {
                        gain,
                        feature,
                        threshold: value + (next_value - value) / 2.0,
                    });
                }
            }
        }

        best
    }
}

/// Boosted tree ensemble trained on the squared-error objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XgBoostModel {
    params: XgBoostParams,
    base_score: f64,
    trees: Vec<BoostedTree>,
}

impl XgBoostModel {
    const ALGORITHM: Algorithm = Algorithm::XgBoost;

    pub fn fit(rows: &[FeatureRow], targets: &[f64]) -> Result<Self, ModelError> {
        Self::fit_with(rows, targets, XgBoostParams::default())
    }

    pub fn fit_with(
        rows: &[FeatureRow],
        targets: &[f64],
        params: XgBoostParams,
    ) -> Result<Self, ModelError> {
        check_fit_input(rows, targets, Self::ALGORITHM)?;
        if targets.iter().any(|y| !y.is_finite()) {
            return Err(ModelError::FitFailed {
                algorithm: Self::ALGORITHM,
                reason: "non-finite target".to_string(),
            });
        }

        let base_score = mean(targets);
        let mut current = vec![base_score; rows.len()];
        let mut trees = Vec::with_capacity(params.n_estimators);

        for _ in 0..params.n_estimators {
            let grad: Vec<f64> = current.iter().zip(targets).map(|(f, y)| f - y).collect();
            let tree = TreeBuilder {
                rows,
                grad: &grad,
                params: &params,
                nodes: Vec::new(),
            }
            .build((0..rows.len()).collect());

            for (f, row) in current.iter_mut().zip(rows) {
                *f += tree.predict_row(&row.lags);
            }
            trees.push(tree);
        }

        Ok(Self {
            params,
            base_score,
            trees,
        })
    }

    pub fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        Ok(rows
            .iter()
            .map(|row| {
                self.base_score
                    + self
                        .trees
                        .iter()
                        .map(|tree| tree.predict_row(&row.lags))
                        .sum::<f64>()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::models::fixtures::{lagged_series, rmse};

    #[test]
    fn test_single_split_on_step_function() {
        // Target jumps when lag_1 crosses 10
        let rows: Vec<FeatureRow> = (0..20)
            .map(|i| FeatureRow::new([i as f64, 0.0, 0.0, 0.0, 0.0]))
            .collect();
        let targets: Vec<f64> = (0..20).map(|i| if i < 10 { 0.0 } else { 10.0 }).collect();
        let params = XgBoostParams {
            n_estimators: 1,
            eta: 1.0,
            max_depth: 1,
            lambda: 0.0,
            ..Default::default()
        };

        let model = XgBoostModel::fit_with(&rows, &targets, params).unwrap();
        let tree = &model.trees[0];
        match &tree.nodes[0] {
            Node::Split {
                feature, threshold, ..
            } => {
                assert_eq!(*feature, 0);
                assert!((threshold - 9.5).abs() < 1e-12);
            }
            other => panic!("expected a split at the root, got {:?}", other),
        }

        let predictions = model.predict(&rows).unwrap();
        for (p, t) in predictions.iter().zip(&targets) {
            assert!((p - t).abs() < 1e-9);
        }
    }

    #[test]
    fn test_lambda_shrinks_leaf_weights() {
        let rows = vec![FeatureRow::replicated(1.0); 4];
        let targets = vec![2.0, 2.0, 2.0, 2.0];
        let params = XgBoostParams {
            n_estimators: 1,
            eta: 1.0,
            lambda: 4.0,
            ..Default::default()
        };

        // Base score already equals the target, so the leaf is zero
        let model = XgBoostModel::fit_with(&rows, &targets, params).unwrap();
        assert_eq!(model.predict(&rows[..1]).unwrap(), vec![2.0]);
        assert_eq!(model.trees[0].nodes.len(), 1);
    }

    #[test]
    fn test_boosting_reduces_training_error() {
        let (rows, targets) = lagged_series(50, |t| (t * 0.25).sin() * 30.0 + 200.0);
        let model = XgBoostModel::fit(&rows, &targets).unwrap();

        let baseline = vec![mean(&targets); targets.len()];
        let fitted = model.predict(&rows).unwrap();
        assert!(rmse(&fitted, &targets) < 0.1 * rmse(&baseline, &targets));
    }
}
