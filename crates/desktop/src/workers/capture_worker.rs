use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError};

use smileblink_core::pipeline::capture_loop::CaptureLoop;
use smileblink_core::pipeline::detect_and_annotate_use_case::FrameReport;
use smileblink_core::pipeline::session_logger::NullSessionLogger;
use smileblink_core::pipeline::stop_signal::StopSignal;
use smileblink_core::shared::frame::Frame;
use smileblink_core::video::infrastructure::opencv_camera::OpencvCamera;

use super::classifier_loader::LoadedDetection;

/// Frames waiting for the UI. Newer frames are dropped while this is full.
const FRAME_QUEUE: usize = 2;

/// Messages sent from the capture thread to the UI.
#[derive(Debug)]
pub enum CaptureMessage {
    Frame(Frame, FrameReport),
    Error(String),
    /// The camera has been released; always the last message.
    Stopped,
}

pub struct CaptureParams {
    pub detection: LoadedDetection,
    pub camera_index: i32,
    pub frame_interval: Duration,
}

pub fn spawn(params: CaptureParams) -> (Receiver<CaptureMessage>, Arc<StopSignal>) {
    let (tx, rx) = crossbeam_channel::bounded::<CaptureMessage>(FRAME_QUEUE);
    let stop = Arc::new(StopSignal::new());
    let stop_clone = stop.clone();

    thread::spawn(move || {
        match run_capture(&tx, &stop_clone, &params) {
            Ok(frames) => log::info!("Camera {} stopped after {frames} frames", params.camera_index),
            Err(e) => {
                log::error!("Capture session failed: {e}");
                if !stop_clone.is_stopped() {
                    let _ = tx.send(CaptureMessage::Error(e.to_string()));
                }
            }
        }
        let _ = tx.send(CaptureMessage::Stopped);
    });

    (rx, stop)
}

fn run_capture(
    tx: &Sender<CaptureMessage>,
    stop: &StopSignal,
    params: &CaptureParams,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut use_case = params.detection.lock()?;
    let mut camera = OpencvCamera::new(params.camera_index);
    let mut logger = NullSessionLogger;

    CaptureLoop::new(params.frame_interval).run(
        &mut camera,
        &mut use_case,
        &mut logger,
        stop,
        |frame, report| forward(tx, frame, report),
    )
}

/// Hand a frame to the UI without blocking the capture thread. Returns false
/// once the UI has gone away.
fn forward(tx: &Sender<CaptureMessage>, frame: Frame, report: FrameReport) -> bool {
    match tx.try_send(CaptureMessage::Frame(frame, report)) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            log::trace!("UI busy, dropping frame");
            true
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize) -> Frame {
        Frame::new(vec![0; 12], 2, 2, 3, index)
    }

    #[test]
    fn test_forward_delivers_frame() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        assert!(forward(&tx, frame(7), FrameReport::default()));
        match rx.try_recv() {
            Ok(CaptureMessage::Frame(f, _)) => assert_eq!(f.index(), 7),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_forward_drops_when_full() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        assert!(forward(&tx, frame(0), FrameReport::default()));
        assert!(forward(&tx, frame(1), FrameReport::default()));
        assert_eq!(rx.len(), 1);
        match rx.try_recv() {
            Ok(CaptureMessage::Frame(f, _)) => assert_eq!(f.index(), 0),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_forward_stops_when_ui_gone() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);
        assert!(!forward(&tx, frame(0), FrameReport::default()));
    }
}
