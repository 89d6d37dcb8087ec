use serde::{Deserialize, Serialize};

use crate::error::ModelLoadError;
use crate::models::WasteCategory;

/// Probabilities are kept this far away from 0 and 1
pub const MIN_PROBABILITY: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Kernel {
    Linear,
    Rbf { gamma: f32 },
}

impl Kernel {
    pub fn eval(&self, a: &[f32], b: &[f32]) -> f64 {
        match *self {
            Kernel::Linear => a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum(),
            Kernel::Rbf { gamma } => {
                let dist2: f64 = a
                    .iter()
                    .zip(b)
                    .map(|(x, y)| {
                        let d = *x as f64 - *y as f64;
                        d * d
                    })
                    .sum();
                (-(gamma as f64) * dist2).exp()
            }
        }
    }
}

/// Sigmoid parameters mapping a decision value to a probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlattScaling {
    pub a: f64,
    pub b: f64,
}

impl PlattScaling {
    /// `1 / (1 + exp(a * decision + b))`, clamped to [MIN_PROBABILITY, 1 - MIN_PROBABILITY]
    pub fn probability(&self, decision: f64) -> f64 {
        let f_apb = decision * self.a + self.b;
        let p = if f_apb >= 0.0 {
            (-f_apb).exp() / (1.0 + (-f_apb).exp())
        } else {
            1.0 / (1.0 + f_apb.exp())
        };
        p.clamp(MIN_PROBABILITY, 1.0 - MIN_PROBABILITY)
    }
}

/// Binary kernel support vector machine with Platt-scaled probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvmModel {
    kernel: Kernel,
    support_vectors: Vec<Vec<f32>>,
    /// Signed dual coefficients, one per support vector
    dual_coef: Vec<f64>,
    intercept: f64,
    platt: PlattScaling,
    /// Category whose probability `platt` estimates
    positive: WasteCategory,
}

impl SvmModel {
    pub fn new(
        kernel: Kernel,
        support_vectors: Vec<Vec<f32>>,
        dual_coef: Vec<f64>,
        intercept: f64,
        platt: PlattScaling,
        positive: WasteCategory,
    ) -> Result<Self, ModelLoadError> {
        let model = Self {
            kernel,
            support_vectors,
            dual_coef,
            intercept,
            platt,
            positive,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check internal consistency; deserialized models go through this too
    pub fn validate(&self) -> Result<(), ModelLoadError> {
        let Some(first) = self.support_vectors.first() else {
            return Err(ModelLoadError::Invalid("model has no support vectors".into()));
        };
        let dim = first.len();
        if dim == 0 {
            return Err(ModelLoadError::Invalid("support vectors are empty".into()));
        }
        if let Some((i, sv)) = self
            .support_vectors
            .iter()
            .enumerate()
            .find(|(_, sv)| sv.len() != dim)
        {
            return Err(ModelLoadError::Invalid(format!(
                "support vector {} has {} features, expected {}",
                i,
                sv.len(),
                dim
            )));
        }
        if self.dual_coef.len() != self.support_vectors.len() {
            return Err(ModelLoadError::Invalid(format!(
                "{} dual coefficients for {} support vectors",
                self.dual_coef.len(),
                self.support_vectors.len()
            )));
        }
        if let Kernel::Rbf { gamma } = self.kernel {
            if !gamma.is_finite() || gamma <= 0.0 {
                return Err(ModelLoadError::Invalid(format!(
                    "RBF gamma must be positive, got {}",
                    gamma
                )));
            }
        }

        let finite = self.support_vectors.iter().flatten().all(|v| v.is_finite())
            && self.dual_coef.iter().all(|c| c.is_finite())
            && self.intercept.is_finite()
            && self.platt.a.is_finite()
            && self.platt.b.is_finite();
        if !finite {
            return Err(ModelLoadError::Invalid("model contains non-finite values".into()));
        }
        Ok(())
    }

    /// Number of features every input must have
    pub fn dimension(&self) -> usize {
        self.support_vectors.first().map_or(0, Vec::len)
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    pub fn support_vector_count(&self) -> usize {
        self.support_vectors.len()
    }

    pub fn positive(&self) -> WasteCategory {
        self.positive
    }

    /// Raw SVM score; with a negative Platt `a`, larger scores favour `positive`
    pub fn decision_value(&self, x: &[f32]) -> f64 {
        self.support_vectors
            .iter()
            .zip(&self.dual_coef)
            .map(|(sv, coef)| coef * self.kernel.eval(sv, x))
            .sum::<f64>()
            + self.intercept
    }

    /// Probability of the positive category
    pub fn positive_probability(&self, x: &[f32]) -> f64 {
        self.platt.probability(self.decision_value(x))
    }
}
