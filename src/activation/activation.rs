use serde::{Serialize, Deserialize};
use std::f64::consts::E;

use crate::error::{EngineError, Result};
use crate::math::matrix::Matrix;

/// Inputs to Sigmoid are clamped to this magnitude before exponentiation;
/// exp(709) is the largest power of e representable as a finite f64.
const SIGMOID_CLAMP: f64 = 709.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationKind {
    /// Pass-through; used when a layer declares no nonlinearity.
    Identity,
    ReLU,
    Sigmoid,
    Tanh,
}

impl ActivationKind {
    /// Resolves the activation name carried by a layer descriptor.
    ///
    /// `None` (a layer without a nonlinearity) resolves to no activation at
    /// all rather than `Identity`, matching the layer/activation pairing
    /// rule in [`crate::model::Model`]. Unrecognized names are rejected.
    pub fn resolve(name: Option<&str>) -> Result<Option<ActivationKind>> {
        match name {
            None => Ok(None),
            Some("Sigmoid") => Ok(Some(ActivationKind::Sigmoid)),
            Some("Relu") => Ok(Some(ActivationKind::ReLU)),
            Some("Tanh") => Ok(Some(ActivationKind::Tanh)),
            Some(other) => Err(EngineError::Config(format!(
                "unknown activation '{other}'; expected one of Sigmoid, Relu, Tanh"
            ))),
        }
    }
}

/// An elementwise nonlinearity with the cached output of its last forward
/// call. The cache is load-bearing: Sigmoid's and Tanh's derivatives are
/// functions of their own output, and ReLU's derivative is a mask over it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activation {
    pub kind: ActivationKind,
    #[serde(skip)]
    output: Matrix,
}

impl Activation {
    pub fn new(kind: ActivationKind) -> Activation {
        Activation { kind, output: Matrix::default() }
    }

    pub fn forward(&mut self, input: &Matrix) -> Matrix {
        let output = match self.kind {
            ActivationKind::Identity => input.clone(),
            ActivationKind::ReLU => input.map(|x| if x > 0.0 { x } else { 0.0 }),
            ActivationKind::Sigmoid => input.map(|x| {
                let z = x.clamp(-SIGMOID_CLAMP, SIGMOID_CLAMP);
                1.0 / (1.0 + E.powf(-z))
            }),
            ActivationKind::Tanh => input.map(|x| x.tanh()),
        };
        self.output = output.clone();
        output
    }

    /// Chains `dvalues` (∂L/∂output) through this activation using the
    /// cached output of the matching forward call.
    pub fn backward(&self, dvalues: &Matrix) -> Matrix {
        match self.kind {
            ActivationKind::Identity => dvalues.clone(),
            ActivationKind::ReLU => {
                dvalues.zip_map(&self.output, |d, out| if out > 0.0 { d } else { 0.0 })
            }
            ActivationKind::Sigmoid => {
                dvalues.zip_map(&self.output, |d, out| d * out * (1.0 - out))
            }
            ActivationKind::Tanh => {
                dvalues.zip_map(&self.output, |d, out| d * (1.0 - out * out))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward_scalar(kind: ActivationKind, x: f64) -> f64 {
        Activation::new(kind).forward(&Matrix::from_data(vec![vec![x]])).data[0][0]
    }

    #[test]
    fn relu_output_is_never_negative() {
        for &x in &[-1e6, -3.5, -0.0, 0.0, 2.5, 1e6] {
            assert!(forward_scalar(ActivationKind::ReLU, x) >= 0.0);
        }
    }

    #[test]
    fn sigmoid_is_bounded_and_finite_at_extreme_magnitudes() {
        for &x in &[-1e6, -709.0, -5.0, 0.0, 5.0, 709.0, 1e6] {
            let y = forward_scalar(ActivationKind::Sigmoid, x);
            assert!(y.is_finite(), "sigmoid({x}) not finite");
            assert!((0.0..=1.0).contains(&y));
        }
        // The clamp keeps the negative tail strictly positive.
        assert!(forward_scalar(ActivationKind::Sigmoid, -1e6) > 0.0);
        assert_eq!(forward_scalar(ActivationKind::Sigmoid, 0.0), 0.5);
    }

    #[test]
    fn tanh_is_bounded_and_finite_at_extreme_magnitudes() {
        for &x in &[-1e6, -4.0, 0.0, 4.0, 1e6] {
            let y = forward_scalar(ActivationKind::Tanh, x);
            assert!(y.is_finite());
            assert!((-1.0..=1.0).contains(&y));
        }
        assert!(forward_scalar(ActivationKind::Tanh, -4.0) > -1.0);
        assert!(forward_scalar(ActivationKind::Tanh, 4.0) < 1.0);
    }

    #[test]
    fn relu_backward_masks_where_output_is_zero() {
        let mut act = Activation::new(ActivationKind::ReLU);
        act.forward(&Matrix::from_data(vec![vec![-2.0, 3.0]]));
        let grad = act.backward(&Matrix::from_data(vec![vec![5.0, 5.0]]));
        assert_eq!(grad.data[0], vec![0.0, 5.0]);
    }

    #[test]
    fn sigmoid_backward_uses_cached_output() {
        let mut act = Activation::new(ActivationKind::Sigmoid);
        act.forward(&Matrix::from_data(vec![vec![0.0]]));
        // d/dx sigmoid at 0 is 0.25
        let grad = act.backward(&Matrix::from_data(vec![vec![1.0]]));
        assert!((grad.data[0][0] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn resolve_accepts_known_names_and_rejects_the_rest() {
        assert_eq!(ActivationKind::resolve(Some("Sigmoid")).unwrap(), Some(ActivationKind::Sigmoid));
        assert_eq!(ActivationKind::resolve(Some("Relu")).unwrap(), Some(ActivationKind::ReLU));
        assert_eq!(ActivationKind::resolve(Some("Tanh")).unwrap(), Some(ActivationKind::Tanh));
        assert_eq!(ActivationKind::resolve(None).unwrap(), None);
        assert!(matches!(
            ActivationKind::resolve(Some("Softmax")),
            Err(EngineError::Config(_))
        ));
    }
}
