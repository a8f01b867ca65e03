//! Camera capture through `nokhwa`.
//!
//! The device is owned by a capture thread that publishes into a one-slot
//! channel, so `read` never waits on the camera.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::{Camera, NokhwaError};
use thiserror::Error;

use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::{Frame, CHANNELS};

/// How long `open` waits for the device to start streaming.
const OPEN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to open camera {index}: {source}")]
    Open {
        index: u32,
        #[source]
        source: NokhwaError,
    },
    #[error("camera {0} did not start in time")]
    OpenTimeout(u32),
    #[error("failed to read camera frame: {0}")]
    Read(#[source] NokhwaError),
    #[error("camera capture stopped unexpectedly")]
    Disconnected,
    #[error("camera is not open")]
    NotOpen,
}

/// Single-slot channel that always holds the newest item.
///
/// The producer keeps a receiver clone so it can evict an unread item before
/// publishing a fresher one.
struct LatestSlot<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T> LatestSlot<T> {
    fn new() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(1);
        Self { tx, rx }
    }

    fn publish(&self, item: T) {
        let _ = self.rx.try_recv();
        let _ = self.tx.try_send(item);
    }

    fn receiver(&self) -> Receiver<T> {
        self.rx.clone()
    }
}

type CaptureResult = Result<Frame, CaptureError>;

/// Pulls frames until `stop` is set or `grab` fails. Unusable frames
/// (`Ok(None)`) are skipped; the first error is published and ends the loop.
///
/// Returns the number of frames published.
fn run_capture_loop(
    mut grab: impl FnMut() -> Result<Option<Frame>, CaptureError>,
    slot: &LatestSlot<CaptureResult>,
    stop: &AtomicBool,
) -> usize {
    let mut published = 0;
    while !stop.load(Ordering::Relaxed) {
        match grab() {
            Ok(Some(frame)) => {
                slot.publish(Ok(frame));
                published += 1;
            }
            Ok(None) => {}
            Err(e) => {
                slot.publish(Err(e));
                break;
            }
        }
    }
    published
}

struct CaptureWorker {
    frames: Receiver<CaptureResult>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

/// A camera device opened by index, yielding RGB frames scaled to a
/// fixed width.
pub struct NokhwaCamera {
    device_index: u32,
    target_width: u32,
    worker: Option<CaptureWorker>,
}

impl NokhwaCamera {
    pub fn new(device_index: u32, target_width: u32) -> Self {
        Self {
            device_index,
            target_width,
            worker: None,
        }
    }

    fn spawn_worker(&self) -> Result<CaptureWorker, CaptureError> {
        let device_index = self.device_index;
        let target_width = self.target_width;
        let stop = Arc::new(AtomicBool::new(false));
        let slot = LatestSlot::new();
        let frames = slot.receiver();
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(), CaptureError>>(1);

        let thread_stop = stop.clone();
        let handle = std::thread::spawn(move || {
            // The camera is created on this thread; nokhwa backends are not Send.
            let mut camera = match open_camera(device_index) {
                Ok(camera) => camera,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(()));

            let mut index = 0;
            let published = run_capture_loop(
                || {
                    let frame = grab_frame(&mut camera, device_index, index)?;
                    index += 1;
                    Ok(frame.map(|f| f.resize_to_width(target_width)))
                },
                &slot,
                &thread_stop,
            );

            if let Err(e) = camera.stop_stream() {
                log::warn!("Failed to stop camera {device_index}: {e}");
            }
            log::info!("Camera {device_index} closed after {published} frames");
        });

        let ready = match ready_rx.recv_timeout(OPEN_TIMEOUT) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(CaptureError::OpenTimeout(device_index)),
            Err(RecvTimeoutError::Disconnected) => Err(CaptureError::Disconnected),
        };
        if let Err(e) = ready {
            stop.store(true, Ordering::Relaxed);
            return Err(e);
        }

        Ok(CaptureWorker {
            frames,
            stop,
            handle: Some(handle),
        })
    }
}

fn open_camera(device_index: u32) -> Result<Camera, CaptureError> {
    let requested =
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
    let mut camera = Camera::new(CameraIndex::Index(device_index), requested).map_err(
        |source| CaptureError::Open {
            index: device_index,
            source,
        },
    )?;
    camera.open_stream().map_err(|source| CaptureError::Open {
        index: device_index,
        source,
    })?;

    let resolution = camera.resolution();
    log::info!(
        "Camera {} opened: {}x{} @ {} fps",
        device_index,
        resolution.width(),
        resolution.height(),
        camera.frame_rate()
    );
    Ok(camera)
}

/// Blocks for the next device frame. `Ok(None)` for frames that decode to
/// something unusable.
fn grab_frame(
    camera: &mut Camera,
    device_index: u32,
    index: usize,
) -> Result<Option<Frame>, CaptureError> {
    let buffer = camera.frame().map_err(CaptureError::Read)?;
    let decoded = buffer
        .decode_image::<RgbFormat>()
        .map_err(CaptureError::Read)?;

    let (width, height) = (decoded.width(), decoded.height());
    let data = decoded.into_raw();
    if !is_complete_rgb(data.len(), width, height) {
        log::warn!("Camera {device_index} returned an unusable frame");
        return Ok(None);
    }
    Ok(Some(Frame::new(data, width, height, index)))
}

fn is_complete_rgb(len: usize, width: u32, height: u32) -> bool {
    width > 0 && height > 0 && len == width as usize * height as usize * CHANNELS
}

impl FrameSource for NokhwaCamera {
    fn open(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.worker.is_some() {
            return Ok(());
        }
        self.worker = Some(self.spawn_worker()?);
        Ok(())
    }

    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let worker = self.worker.as_ref().ok_or(CaptureError::NotOpen)?;
        match worker.frames.try_recv() {
            Ok(Ok(frame)) => Ok(Some(frame)),
            Ok(Err(e)) => Err(e.into()),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(CaptureError::Disconnected.into()),
        }
    }

    fn close(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            worker.stop.store(true, Ordering::Relaxed);
            // A thread stuck on a stalled device is left to finish on its own.
            if let Some(handle) = worker.handle.take() {
                if handle.is_finished() {
                    let _ = handle.join();
                }
            }
        }
    }

    fn is_open(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize) -> Frame {
        Frame::new(vec![0; 4 * 2 * 3], 4, 2, index)
    }

    #[test]
    fn test_new_camera_starts_closed() {
        let camera = NokhwaCamera::new(0, 800);
        assert!(!camera.is_open());
    }

    #[test]
    fn test_read_before_open_is_an_error() {
        let mut camera = NokhwaCamera::new(0, 800);
        let err = camera.read().unwrap_err();
        assert_eq!(err.to_string(), "camera is not open");
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let mut camera = NokhwaCamera::new(0, 800);
        camera.close();
        camera.close();
        assert!(!camera.is_open());
    }

    #[test]
    fn test_slot_keeps_only_newest_item() {
        let slot = LatestSlot::new();
        let rx = slot.receiver();
        slot.publish(1);
        slot.publish(2);
        slot.publish(3);
        assert_eq!(rx.try_recv().ok(), Some(3));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_empty_slot_does_not_block() {
        let slot = LatestSlot::<u32>::new();
        assert!(matches!(slot.receiver().try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_capture_loop_skips_unusable_and_stops_on_error() {
        let slot = LatestSlot::new();
        let rx = slot.receiver();
        let stop = AtomicBool::new(false);
        let mut script = vec![
            Ok(Some(frame(0))),
            Ok(None),
            Ok(Some(frame(1))),
            Err(CaptureError::Disconnected),
            Ok(Some(frame(2))),
        ]
        .into_iter();

        let published = run_capture_loop(|| script.next().unwrap_or(Ok(None)), &slot, &stop);

        assert_eq!(published, 2);
        // The error replaced the unread frame and nothing was grabbed after it.
        assert!(matches!(rx.try_recv(), Ok(Err(CaptureError::Disconnected))));
        assert_eq!(script.len(), 1);
    }

    #[test]
    fn test_capture_loop_honors_stop_flag() {
        let slot = LatestSlot::new();
        let stop = AtomicBool::new(true);
        let mut grabs = 0;
        let published = run_capture_loop(
            || {
                grabs += 1;
                Ok(Some(frame(0)))
            },
            &slot,
            &stop,
        );
        assert_eq!(published, 0);
        assert_eq!(grabs, 0);
    }

    #[test]
    fn test_reader_sees_latest_frame_then_nothing() {
        let slot = LatestSlot::new();
        let stop = AtomicBool::new(false);
        let mut camera = NokhwaCamera::new(0, 800);
        camera.worker = Some(CaptureWorker {
            frames: slot.receiver(),
            stop: Arc::new(AtomicBool::new(false)),
            handle: None,
        });

        let mut script = vec![Ok(Some(frame(0))), Ok(Some(frame(1)))].into_iter();
        run_capture_loop(
            || match script.next() {
                Some(item) => item,
                None => {
                    stop.store(true, Ordering::Relaxed);
                    Ok(None)
                }
            },
            &slot,
            &stop,
        );

        let latest = camera.read().unwrap().unwrap();
        assert_eq!(latest.index(), 1);
        assert!(camera.read().unwrap().is_none());
    }

    #[test]
    fn test_reader_reports_stopped_capture() {
        let slot = LatestSlot::<CaptureResult>::new();
        let mut camera = NokhwaCamera::new(0, 800);
        camera.worker = Some(CaptureWorker {
            frames: slot.receiver(),
            stop: Arc::new(AtomicBool::new(false)),
            handle: None,
        });
        drop(slot);

        let err = camera.read().unwrap_err();
        assert_eq!(err.to_string(), "camera capture stopped unexpectedly");
    }

    #[test]
    fn test_complete_rgb_check_does_not_overflow() {
        assert!(is_complete_rgb(4 * 2 * 3, 4, 2));
        assert!(!is_complete_rgb(10, 4, 2));
        assert!(!is_complete_rgb(0, 0, 2));
        // 70000 * 70000 * 3 overflows u32.
        assert!(!is_complete_rgb(12, 70_000, 70_000));
    }
}
