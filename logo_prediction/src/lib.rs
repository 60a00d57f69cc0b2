mod classifier;
mod frame;
mod labels;
mod onnx;
mod postprocess;
mod preprocess;

pub mod config;

pub use classifier::{Classifier, InferenceError};
pub use frame::{PixelFormat, RawFrame};
pub use labels::LabelTable;
pub use onnx::OnnxClassifier;
pub use postprocess::{postprocess, Classification, LabelScore, OutputMode, PostprocessError};
pub use preprocess::{preprocess, PreprocessError, INPUT_HEIGHT, INPUT_WIDTH};
