use crate::shared::frame::Frame;

/// A live source of frames, such as a camera.
///
/// The source starts closed. `read` is expected to return promptly; a
/// source with nothing to hand out yet returns `Ok(None)`.
pub trait FrameSource {
    /// Acquires the underlying device.
    fn open(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Returns the next frame, or `None` when none is available this time.
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the device. Closing a closed source is a no-op.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}
