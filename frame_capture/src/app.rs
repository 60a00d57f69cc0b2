use crate::config::{CameraConfig, Config};
use crate::pipeline::{ClassificationPipeline, FrameOutcome};
use crate::source::TestPatternSource;

use logo_prediction::{Classification, Classifier, LabelTable, OnnxClassifier, RawFrame};
use std::{error::Error, sync::Arc};
use tokio::{
    signal,
    sync::{broadcast, watch},
    task::JoinHandle,
    time::{sleep, Duration},
};

pub async fn start_app(config: Config) -> Result<(), Box<dyn Error>> {
    let labels = match LabelTable::load(&config.labels.get_path()) {
        Ok(labels) => labels,
        Err(e) => {
            tracing::error!("Failed to load labels: {:?}", e);
            return Err(Box::new(e));
        }
    };
    tracing::info!("Loaded {} class labels", labels.len());

    let classifier = match OnnxClassifier::new(&config.model) {
        Ok(classifier) => classifier,
        Err(e) => {
            tracing::error!("Failed to initialize classifier: {:?}", e);
            return Err(e);
        }
    };

    let pipeline = Arc::new(ClassificationPipeline::new(
        classifier,
        labels,
        config.classifier.mode,
    ));

    let (shutdown_tx, _) = broadcast::channel(1);
    let capture_shutdown_rx = shutdown_tx.subscribe();
    let display_shutdown_rx = shutdown_tx.subscribe();

    let capture_handle = spawn_capture_loop(pipeline.clone(), config.camera, capture_shutdown_rx);
    let display_handle = spawn_display_loop(pipeline.subscribe(), display_shutdown_rx);

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown");

    pipeline.shutdown();
    let _ = shutdown_tx.send(());
    let _ = capture_handle.await;
    let _ = display_handle.await;

    Ok(())
}

/// Generates frames at the capture rate and feeds them to the pipeline,
/// reusing one delivery buffer the way a camera recycles its own.
fn spawn_capture_loop<C: Classifier>(
    pipeline: Arc<ClassificationPipeline<C>>,
    camera_config: CameraConfig,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut source = TestPatternSource::new(camera_config.width, camera_config.height);
        let mut buffer = Vec::new();
        let frame_delay = Duration::from_millis(camera_config.get_frame_delay_ms());

        loop {
            tokio::select! {
                _ = sleep(frame_delay) => {
                    source.fill(&mut buffer);
                    let frame = RawFrame::tightly_packed(
                        source.width(),
                        source.height(),
                        TestPatternSource::FORMAT,
                        &buffer,
                    );
                    match pipeline.process_frame(&frame) {
                        Ok(FrameOutcome::Submitted) => {}
                        Ok(FrameOutcome::Dropped) => {
                            tracing::debug!("Dropping frame, previous inference still in flight");
                        }
                        Err(e) => {
                            tracing::error!("Skipping frame: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Frame capture received shutdown signal");
                    break;
                }
            }
        }
        tracing::info!("Frame capture stopped");
    })
}

/// Stand-in for the display layer: logs every published classification.
fn spawn_display_loop(
    mut results_rx: watch::Receiver<Option<Classification>>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = results_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    match results_rx.borrow_and_update().clone() {
                        Some(Classification::Top1 { label, confidence }) => {
                            tracing::info!("Prediction: {} ({:.2}%)", label, confidence * 100.0);
                        }
                        Some(Classification::AllClasses(scores)) => {
                            for entry in &scores {
                                tracing::info!("{}: {:.4}", entry.label, entry.score);
                            }
                        }
                        None => {}
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Display loop received shutdown signal");
                    break;
                }
            }
        }
        tracing::info!("Display loop stopped");
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
