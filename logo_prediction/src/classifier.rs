use ndarray::{Array, Ix4};
use thiserror::Error;

/// Opaque failure from the inference backend. The pipeline logs it and
/// skips the frame; a fresher frame arrives shortly, so there is no retry.
#[derive(Error, Debug)]
#[error("inference failed: {0}")]
pub struct InferenceError(pub String);

/// Seam to the model runtime.
///
/// Takes the preprocessed input tensor and returns one score per class,
/// index-aligned with the label table. Implementations are synchronous and
/// CPU/accelerator-bound; the pipeline decides where they run.
pub trait Classifier: Send + Sync + 'static {
    fn classify(&self, input: &Array<f32, Ix4>) -> Result<Vec<f32>, InferenceError>;
}
