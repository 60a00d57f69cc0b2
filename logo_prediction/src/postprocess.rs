use crate::labels::LabelTable;
use serde::Deserialize;
use thiserror::Error;

/// How raw model scores are turned into a display-ready result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Only the highest-scoring class.
    Top1,
    /// Every class with its score, in label-table order.
    AllClasses,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// Result of one classified frame. Produced fresh per frame; the display
/// layer holds it for at most one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Top1 { label: String, confidence: f32 },
    AllClasses(Vec<LabelScore>),
}

#[derive(Error, Debug)]
pub enum PostprocessError {
    #[error("model returned an empty score vector")]
    EmptyOutput,
    #[error("model returned {scores} scores for {labels} labels")]
    ShapeMismatch { scores: usize, labels: usize },
}

/// Maps the model's flat score vector onto the label table.
///
/// `Top1` scans once with a strict `>` comparison, so the first index wins
/// ties. `AllClasses` keeps label-table order rather than sorting by score;
/// a rank-sorted list reshuffles every frame and is unreadable on screen.
pub fn postprocess(
    output: &[f32],
    labels: &LabelTable,
    mode: OutputMode,
) -> Result<Classification, PostprocessError> {
    if output.is_empty() {
        return Err(PostprocessError::EmptyOutput);
    }
    if output.len() != labels.len() {
        return Err(PostprocessError::ShapeMismatch {
            scores: output.len(),
            labels: labels.len(),
        });
    }

    match mode {
        OutputMode::Top1 => {
            let mut best = 0;
            for (index, &score) in output.iter().enumerate() {
                if score > output[best] {
                    best = index;
                }
            }
            Ok(Classification::Top1 {
                label: labels.names()[best].clone(),
                confidence: output[best],
            })
        }
        OutputMode::AllClasses => {
            let scored = labels
                .names()
                .iter()
                .zip(output)
                .map(|(label, &score)| LabelScore {
                    label: label.clone(),
                    score,
                })
                .collect();
            Ok(Classification::AllClasses(scored))
        }
    }
}
