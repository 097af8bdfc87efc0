//! Logistic regression for binary classification

use crate::error::{LifeboatError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Binary logistic regression fitted by gradient descent with L2 penalty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Option<Array1<f64>>,
    bias: f64,
    /// L2 regularization strength
    pub l2: f64,
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Maximum iterations
    pub max_iter: usize,
    /// Convergence tolerance on the gradient norm
    pub tol: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            weights: None,
            bias: 0.0,
            l2: 0.01,
            learning_rate: 0.1,
            max_iter: 1000,
            tol: 1e-6,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Fit weights and bias by gradient descent
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(LifeboatError::Shape {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(LifeboatError::EmptyCorpus);
        }

        let mut weights: Array1<f64> = Array1::zeros(n_features);
        let mut bias = 0.0;

        for _ in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let predictions = Self::sigmoid(&linear);
            let errors = &predictions - y;

            let dw = (x.t().dot(&errors) / n_samples as f64) + (self.l2 * &weights);
            let db = errors.mean().unwrap_or(0.0);

            let grad_norm = (dw.mapv(|v| v * v).sum() + db * db).sqrt();
            if grad_norm < self.tol {
                break;
            }

            weights = weights - self.learning_rate * dw;
            bias -= self.learning_rate * db;
        }

        self.weights = Some(weights);
        self.bias = bias;
        Ok(self)
    }

    /// Probability of the positive class for each row
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let weights = self
            .weights
            .as_ref()
            .ok_or(LifeboatError::ModelNotFitted)?;

        if x.ncols() != weights.len() {
            return Err(LifeboatError::Shape {
                expected: format!("{} columns", weights.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let linear = x.dot(weights) + self.bias;
        Ok(Self::sigmoid(&linear))
    }

    /// Class labels (0.0 / 1.0) at the 0.5 threshold
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    /// Fraction of rows classified correctly
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        if y.is_empty() {
            return Ok(0.0);
        }
        let y_pred = self.predict(x)?;
        let correct = y_pred
            .iter()
            .zip(y.iter())
            .filter(|(pred, actual)| (*pred - *actual).abs() < 0.5)
            .count();
        Ok(correct as f64 / y.len() as f64)
    }

    pub fn is_fitted(&self) -> bool {
        self.weights.is_some()
    }
}
