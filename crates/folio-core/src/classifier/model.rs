//! Multinomial logistic regression trained by full-batch gradient descent.

use ndarray::{Array1, Array2, Axis};

/// Scores closer than this are treated as equal.
const TIE_TOLERANCE: f64 = 1e-9;

/// Linear softmax model over dense feature rows.
///
/// Weights start at zero and training has no random component, so the same
/// data and parameters always produce the same model.
#[derive(Debug, Clone)]
pub struct SoftmaxRegression {
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl SoftmaxRegression {
    /// Fit on `features` (one row per sample) and class indices `targets`.
    ///
    /// Minimizes summed cross-entropy plus `regularization / 2 * |W|^2`.
    pub fn fit(
        features: &Array2<f64>,
        targets: &[usize],
        n_classes: usize,
        epochs: usize,
        learning_rate: f64,
        regularization: f64,
    ) -> Self {
        let (n_samples, n_features) = features.dim();

        let mut one_hot = Array2::<f64>::zeros((n_samples, n_classes));
        for (i, &class) in targets.iter().enumerate() {
            one_hot[[i, class]] = 1.0;
        }

        let mut model = Self {
            weights: Array2::zeros((n_classes, n_features)),
            bias: Array1::zeros(n_classes),
        };

        for _ in 0..epochs {
            let mut residual = model.probabilities(features);
            residual -= &one_hot;

            let mut grad_weights = residual.t().dot(features);
            grad_weights.scaled_add(regularization, &model.weights);
            let grad_bias = residual.sum_axis(Axis(0));

            model.weights.scaled_add(-learning_rate, &grad_weights);
            model.bias.scaled_add(-learning_rate, &grad_bias);
        }

        model
    }

    /// Raw class scores for one feature row.
    pub fn scores(&self, features: &Array1<f64>) -> Array1<f64> {
        self.weights.dot(features) + &self.bias
    }

    /// Index of the highest scoring class; ties (within `TIE_TOLERANCE`)
    /// go to the lowest index.
    pub fn predict(&self, features: &Array1<f64>) -> usize {
        let scores = self.scores(features);
        let mut best = 0;
        for (class, &score) in scores.iter().enumerate() {
            if score > scores[best] + TIE_TOLERANCE {
                best = class;
            }
        }
        best
    }

    /// Row-wise softmax of the scores for a feature matrix.
    fn probabilities(&self, features: &Array2<f64>) -> Array2<f64> {
        let mut logits = features.dot(&self.weights.t()) + &self.bias;
        for mut row in logits.axis_iter_mut(Axis(0)) {
            let max = row.fold(f64::NEG_INFINITY, |m, &x| m.max(x));
            row.mapv_inplace(|x| (x - max).exp());
            let sum = row.sum();
            row /= sum;
        }
        logits
    }
}
