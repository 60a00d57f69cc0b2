use logo_prediction::{
    postprocess, preprocess, Classification, Classifier, LabelTable, OutputMode, PreprocessError,
    RawFrame, INPUT_HEIGHT, INPUT_WIDTH,
};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::watch;

/// What happened to a delivered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Preprocessed and handed to the classifier.
    Submitted,
    /// Discarded because the previous frame is still in flight.
    Dropped,
}

/// Per-frame classification pipeline with drop-newest backpressure.
///
/// One frame at a time: while an inference is in flight, newly delivered
/// frames are dropped rather than queued, which bounds both memory and
/// staleness under load. Results go out on a watch channel, so subscribers
/// always observe the latest classification and nothing else.
pub struct ClassificationPipeline<C: Classifier> {
    classifier: Arc<C>,
    labels: Arc<LabelTable>,
    mode: OutputMode,
    busy: Arc<AtomicBool>,
    active: Arc<AtomicBool>,
    results: watch::Sender<Option<Classification>>,
}

impl<C: Classifier> ClassificationPipeline<C> {
    pub fn new(classifier: C, labels: LabelTable, mode: OutputMode) -> Self {
        let (results, _) = watch::channel(None);
        Self {
            classifier: Arc::new(classifier),
            labels: Arc::new(labels),
            mode,
            busy: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicBool::new(true)),
            results,
        }
    }

    /// Latest-result subscription for the display layer.
    pub fn subscribe(&self) -> watch::Receiver<Option<Classification>> {
        self.results.subscribe()
    }

    /// Handles one delivered frame.
    ///
    /// All reads of the frame buffer finish before this returns, so the
    /// capture layer may recycle the buffer immediately. Inference and
    /// postprocessing continue on a blocking task; their failures are logged
    /// and the frame's result is simply never published.
    pub fn process_frame(&self, frame: &RawFrame<'_>) -> Result<FrameOutcome, PreprocessError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(FrameOutcome::Dropped);
        }

        let input = match preprocess(frame, INPUT_WIDTH, INPUT_HEIGHT) {
            Ok(input) => input,
            Err(e) => {
                self.busy.store(false, Ordering::Release);
                return Err(e);
            }
        };

        let classifier = Arc::clone(&self.classifier);
        let labels = Arc::clone(&self.labels);
        let mode = self.mode;
        let busy = Arc::clone(&self.busy);
        let active = Arc::clone(&self.active);
        let results = self.results.clone();

        tokio::task::spawn_blocking(move || {
            match classifier.classify(&input) {
                Ok(scores) => match postprocess(&scores, &labels, mode) {
                    Ok(classification) => {
                        if active.load(Ordering::Acquire) {
                            let _ = results.send(Some(classification));
                        } else {
                            tracing::debug!("Pipeline stopped, discarding in-flight result");
                        }
                    }
                    Err(e) => tracing::error!("Skipping frame result: {}", e),
                },
                Err(e) => tracing::error!("Skipping frame: {}", e),
            }
            busy.store(false, Ordering::Release);
        });

        Ok(FrameOutcome::Submitted)
    }

    /// Stops publication. In-flight work still drains, but its result is
    /// never applied. Idempotent.
    pub fn shutdown(&self) {
        self.active.store(false, Ordering::Release);
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}
