use crate::{
    classifier::{Classifier, InferenceError},
    config::ModelSettings,
};
use ndarray::{Array, Ix4};
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::TensorRef,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

/// ONNX Runtime backed classifier.
///
/// Holds a pool of sessions over the same model file and hands requests out
/// round-robin, so several frames' worth of work never serialize on one
/// session lock. Model loading, graph compilation and accelerator placement
/// all belong to the runtime.
#[derive(Clone)]
pub struct OnnxClassifier {
    sessions: Arc<Vec<Arc<Mutex<Session>>>>,
    counter: Arc<AtomicUsize>,
    output_name: String,
}

impl OnnxClassifier {
    pub fn new(settings: &ModelSettings) -> Result<Self, Box<dyn std::error::Error>> {
        ort::init().commit()?;

        let num_instances = settings.num_instances.max(1);
        let sessions = (0..num_instances)
            .map(|_| {
                let session = Session::builder()?
                    .with_optimization_level(GraphOptimizationLevel::Level3)?
                    .commit_from_file(settings.get_model_path())?;
                Ok(Arc::new(Mutex::new(session)))
            })
            .collect::<Result<Vec<_>, ort::Error>>()?;

        let output_name = {
            let session = sessions[0].lock().map_err(|e| e.to_string())?;
            let output = session
                .outputs
                .first()
                .ok_or("model exposes no output tensor")?;
            output.name.clone()
        };

        tracing::info!(
            "Created {} ONNX sessions, reading output `{}`",
            num_instances,
            output_name
        );

        Ok(Self {
            sessions: Arc::new(sessions),
            counter: Arc::new(AtomicUsize::new(0)),
            output_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, input: &Array<f32, Ix4>) -> Result<Vec<f32>, InferenceError> {
        let index = self.counter.fetch_add(1, Ordering::SeqCst) % self.sessions.len();
        let mut session = self.sessions[index]
            .lock()
            .map_err(|e| InferenceError(format!("session mutex poisoned: {}", e)))?;

        tracing::debug!("Running inference on session {}", index);
        let owned_buffer;
        let input_view = if input.view().is_standard_layout() {
            input.view()
        } else {
            owned_buffer = input.to_owned();
            owned_buffer.view()
        };

        let tensor_ref = TensorRef::from_array_view(input_view)
            .map_err(|e| InferenceError(format!("failed to build tensor: {}", e)))?;

        let outputs = session
            .run(ort::inputs![tensor_ref])
            .map_err(|e| InferenceError(format!("session run failed: {}", e)))?;

        let (_, data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError(format!("failed to extract scores: {}", e)))?;

        // The score tensor is [1, N] or [N]; either way the flat data is the
        // per-class vector.
        Ok(data.to_vec())
    }
}
