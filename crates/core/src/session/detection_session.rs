use thiserror::Error;

use crate::capture::domain::frame_source::FrameSource;
use crate::pipeline::detect_masks_use_case::DetectMasksUseCase;
use crate::rendering::annotated_frame::AnnotatedFrame;
use crate::rendering::detection_renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Stopped,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("detection is already running")]
    AlreadyRunning,
    #[error("detection is not running")]
    NotRunning,
    #[error("failed to start video stream: {0}")]
    Source(String),
}

/// Result of one scheduled tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// The session was not running, or the tick belongs to an earlier run.
    Ignored,
    /// No frame was available; nothing to display this time.
    Skipped,
    Rendered { frame: AnnotatedFrame, faces: usize },
    /// The tick failed and the session has been stopped.
    Failed(String),
}

impl TickOutcome {
    /// Whether the caller should schedule another tick.
    pub fn rearm(&self) -> bool {
        matches!(self, TickOutcome::Skipped | TickOutcome::Rendered { .. })
    }
}

/// Start/stop state machine around a frame source and the detection pipeline.
///
/// Ticks are driven from outside: each `start` hands back an epoch, and every
/// tick must carry the epoch it was scheduled for. After a stop no epoch is
/// live, so ticks already in flight are ignored; a later `start` issues a
/// fresh one.
pub struct DetectionSession {
    state: SessionState,
    source: Box<dyn FrameSource>,
    pipeline: Option<DetectMasksUseCase>,
    epoch: u64,
}

impl DetectionSession {
    /// `pipeline` is `None` when the models failed to load; the session still
    /// starts, and every tick then fails and stops it.
    pub fn new(source: Box<dyn FrameSource>, pipeline: Option<DetectMasksUseCase>) -> Self {
        Self {
            state: SessionState::Idle,
            source,
            pipeline,
            epoch: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Opens the frame source, resets pipeline reporting and enters `Running`.
    ///
    /// Returns the epoch the first tick must carry.
    pub fn start(&mut self) -> Result<u64, SessionError> {
        if self.is_running() {
            return Err(SessionError::AlreadyRunning);
        }
        self.source
            .open()
            .map_err(|e| SessionError::Source(e.to_string()))?;
        if let Some(pipeline) = &mut self.pipeline {
            pipeline.reset();
        }
        self.epoch += 1;
        self.state = SessionState::Running;
        log::info!("Session started (epoch {})", self.epoch);
        Ok(self.epoch)
    }

    /// Reads one frame and runs it through detection and rendering.
    ///
    /// Any error stops the session instead of propagating.
    pub fn tick(&mut self, epoch: u64) -> TickOutcome {
        if !self.is_running() || epoch != self.epoch {
            return TickOutcome::Ignored;
        }

        match self.process_frame() {
            Ok(Some((frame, faces))) => TickOutcome::Rendered { frame, faces },
            Ok(None) => TickOutcome::Skipped,
            Err(e) => {
                let message = e.to_string();
                log::error!("Tick failed: {message}");
                self.shutdown();
                TickOutcome::Failed(message)
            }
        }
    }

    /// Stops scheduling, closes the frame source and enters `Stopped`.
    pub fn stop(&mut self) -> Result<(), SessionError> {
        if !self.is_running() {
            return Err(SessionError::NotRunning);
        }
        self.shutdown();
        Ok(())
    }

    /// Stops if running, then releases the frame source unconditionally.
    pub fn quit(&mut self) {
        if self.is_running() {
            self.shutdown();
        }
        self.source.close();
        log::info!("Session released");
    }

    fn shutdown(&mut self) {
        self.source.close();
        self.state = SessionState::Stopped;
        if let Some(pipeline) = &self.pipeline {
            pipeline.report();
        }
        log::info!("Session stopped (epoch {})", self.epoch);
    }

    fn process_frame(
        &mut self,
    ) -> Result<Option<(AnnotatedFrame, usize)>, Box<dyn std::error::Error>> {
        let pipeline = self.pipeline.as_mut().ok_or("models are not loaded")?;
        let Some(frame) = self.source.read()? else {
            return Ok(None);
        };
        let detections = pipeline.execute(&frame)?;
        let annotated = detection_renderer::render(&frame, &detections);
        Ok(Some((annotated, detections.len())))
    }
}
