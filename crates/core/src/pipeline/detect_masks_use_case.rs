use std::time::Instant;

use crate::classification::domain::mask_classifier::MaskClassifier;
use crate::detection::domain::face_locator::FaceLocator;
use crate::shared::frame::Frame;
use crate::shared::prediction::Detection;

use super::pipeline_logger::PipelineLogger;

/// Locates faces in a frame and classifies each one for a mask.
///
/// Boxes that crop to zero pixels are dropped before classification, and the
/// classifier is skipped entirely when no face survives.
pub struct DetectMasksUseCase {
    locator: Box<dyn FaceLocator>,
    classifier: Box<dyn MaskClassifier>,
    logger: Box<dyn PipelineLogger>,
}

impl DetectMasksUseCase {
    pub fn new(
        locator: Box<dyn FaceLocator>,
        classifier: Box<dyn MaskClassifier>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            locator,
            classifier,
            logger,
        }
    }

    pub fn execute(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        let t0 = Instant::now();
        let boxes = self.locator.locate(frame)?;
        self.logger.timing("locate", elapsed_ms(t0));

        let mut kept = Vec::with_capacity(boxes.len());
        let mut crops = Vec::with_capacity(boxes.len());
        for face_box in boxes {
            if let Some(crop) = frame.crop(&face_box) {
                kept.push(face_box);
                crops.push(crop);
            }
        }

        if crops.is_empty() {
            self.finish_frame(0);
            return Ok(Vec::new());
        }

        let t1 = Instant::now();
        let predictions = self.classifier.classify(&crops)?;
        self.logger.timing("classify", elapsed_ms(t1));

        if predictions.len() != kept.len() {
            return Err(format!(
                "classifier returned {} predictions for {} faces",
                predictions.len(),
                kept.len()
            )
            .into());
        }

        let detections: Vec<Detection> = kept
            .into_iter()
            .zip(predictions)
            .map(|(face_box, prediction)| Detection {
                face_box,
                prediction,
            })
            .collect();

        self.finish_frame(detections.len());
        Ok(detections)
    }

    /// Emits the logger's summary, typically when a session ends.
    pub fn report(&self) {
        self.logger.summary();
    }

    /// Starts a fresh reporting window, typically when a session starts.
    pub fn reset(&mut self) {
        self.logger.reset();
    }

    fn finish_frame(&mut self, faces: usize) {
        self.logger.metric("faces", faces as f64);
        self.logger.frame_done();
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
