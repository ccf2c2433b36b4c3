//! Element types accepted by the kernels.

use std::fmt::{Debug, Display};

use ndarray::LinalgScalar;
use num::{traits::NumAssignOps, Float};
use rand::distr::uniform::SampleUniform;

/// A floating-point matrix element.
///
/// Only `f32` and `f64` implement this trait, so asking a kernel to multiply
/// integer or complex matrices is rejected at compile time.
pub trait Element:
    Float + NumAssignOps + LinalgScalar + SampleUniform + Send + Sync + Debug + Display + 'static
{
    /// Short type name used in reports (`"f32"` / `"f64"`).
    const NAME: &'static str;

    /// Relative tolerance used by the oracle when two kernels do not share
    /// a summation order.
    const RELATIVE_TOLERANCE: Self;
}

impl Element for f32 {
    const NAME: &'static str = "f32";
    const RELATIVE_TOLERANCE: Self = 1e-4;
}

impl Element for f64 {
    const NAME: &'static str = "f64";
    const RELATIVE_TOLERANCE: Self = 1e-10;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_of<T: Element>() -> &'static str {
        T::NAME
    }

    #[test]
    fn test_names() {
        assert_eq!(name_of::<f32>(), "f32");
        assert_eq!(name_of::<f64>(), "f64");
    }

    #[test]
    fn test_tolerance_above_epsilon() {
        assert!(f32::RELATIVE_TOLERANCE > f32::EPSILON);
        assert!(f64::RELATIVE_TOLERANCE > f64::EPSILON);
    }
}
