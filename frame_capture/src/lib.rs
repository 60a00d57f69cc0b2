mod pipeline;
mod source;

pub mod app;
pub mod config;
pub mod telemetry;

pub use app::start_app;
pub use pipeline::{ClassificationPipeline, FrameOutcome};
pub use source::TestPatternSource;
