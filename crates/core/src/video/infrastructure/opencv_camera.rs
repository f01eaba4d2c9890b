use opencv::core::Mat;
use opencv::prelude::*;
use opencv::{imgproc, videoio};
use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::mat_conversion::mat_to_frame;
use crate::video::domain::frame_source::{FrameSource, SourceInfo};

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("camera {index} could not be opened")]
    OpenFailed { index: i32 },
    #[error("camera is not open")]
    NotOpen,
    #[error("camera error: {0}")]
    Capture(#[from] opencv::Error),
}

/// Webcam source backed by OpenCV's `VideoCapture`.
///
/// Frames are converted from OpenCV's BGR order to RGB on read.
pub struct OpencvCamera {
    index: i32,
    capture: Option<videoio::VideoCapture>,
    next_index: usize,
}

impl OpencvCamera {
    pub fn new(index: i32) -> Self {
        Self {
            index,
            capture: None,
            next_index: 0,
        }
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    fn open_device(&mut self) -> Result<SourceInfo, CameraError> {
        let capture = videoio::VideoCapture::new(self.index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(CameraError::OpenFailed { index: self.index });
        }

        let info = SourceInfo {
            width: capture.get(videoio::CAP_PROP_FRAME_WIDTH)?.max(0.0) as u32,
            height: capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?.max(0.0) as u32,
            fps: capture.get(videoio::CAP_PROP_FPS)?.max(0.0),
            description: format!("camera {}", self.index),
        };
        self.capture = Some(capture);
        self.next_index = 0;
        Ok(info)
    }

    fn grab(&mut self) -> Result<Option<Frame>, CameraError> {
        let capture = self.capture.as_mut().ok_or(CameraError::NotOpen)?;

        let mut bgr = Mat::default();
        if !capture.read(&mut bgr)? || bgr.empty() {
            return Ok(None);
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color_def(&bgr, &mut rgb, imgproc::COLOR_BGR2RGB)?;
        let frame = mat_to_frame(&rgb, self.next_index)?;
        self.next_index += 1;
        Ok(Some(frame))
    }
}

impl FrameSource for OpencvCamera {
    fn open(&mut self) -> Result<SourceInfo, Box<dyn std::error::Error>> {
        match self.open_device() {
            Ok(info) => {
                log::info!(
                    "Opened {} ({}x{} @ {:.0} fps)",
                    info.description,
                    info.width,
                    info.height,
                    info.fps
                );
                Ok(info)
            }
            Err(e) => {
                log::error!("Camera connection failed: {e}");
                Err(e.into())
            }
        }
    }

    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        Ok(self.grab()?)
    }

    fn close(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                log::warn!("Failed to release camera {}: {e}", self.index);
            } else {
                log::info!("Released camera {}", self.index);
            }
        }
    }
}

impl Drop for OpencvCamera {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_before_open_fails() {
        let mut camera = OpencvCamera::new(0);
        let err = camera.read().err().unwrap();
        assert_eq!(err.to_string(), "camera is not open");
    }

    #[test]
    fn test_close_without_open_is_noop() {
        let mut camera = OpencvCamera::new(3);
        camera.close();
        camera.close();
        assert_eq!(camera.index(), 3);
    }
}
