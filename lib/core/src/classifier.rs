//! Binary classifier boundary
//!
//! A classifier is an opaque, pre-trained estimator. The encoder only relies
//! on the two batch-oriented calls below; everything about how the model was
//! trained stays with the training toolchain.

use crate::error::Result;
use crate::vector::FeatureMatrix;

/// Index of the positive ("default") class in a probability pair
pub const POSITIVE_CLASS: usize = 1;

/// A pre-trained binary classifier over fixed-width feature rows
pub trait Classifier: Send + Sync {
    /// Input width the model was trained on, when the artifact records it.
    ///
    /// `None` means the width is unknown and rows are passed through unchecked.
    fn n_features(&self) -> Option<usize> {
        None
    }

    /// Class label (`0` or `1`) for every row
    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<u8>>;

    /// `[p0, p1]` for every row
    fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<[f64; 2]>>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn n_features(&self) -> Option<usize> {
        (**self).n_features()
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<u8>> {
        (**self).predict(x)
    }

    fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<[f64; 2]>> {
        (**self).predict_proba(x)
    }
}
