use opencv::core::Mat;
use opencv::imgproc;

use crate::detection::domain::frame_preprocessor::FramePreprocessor;
use crate::shared::frame::Frame;
use crate::shared::mat_conversion::{frame_to_mat, mat_to_frame};

/// Grayscale conversion followed by histogram equalisation, both done
/// by OpenCV.
pub struct OpencvPreprocessor;

impl OpencvPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OpencvPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FramePreprocessor for OpencvPreprocessor {
    fn prepare(&self, frame: &Frame) -> Result<Frame, Box<dyn std::error::Error>> {
        if frame.is_empty() {
            return Err("Cannot preprocess an empty frame".into());
        }
        let src = frame_to_mat(frame)?;

        let gray = match frame.channels() {
            1 => src,
            3 => {
                let mut gray = Mat::default();
                imgproc::cvt_color_def(&src, &mut gray, imgproc::COLOR_RGB2GRAY)?;
                gray
            }
            4 => {
                let mut gray = Mat::default();
                imgproc::cvt_color_def(&src, &mut gray, imgproc::COLOR_RGBA2GRAY)?;
                gray
            }
            n => return Err(format!("Unsupported channel count: {n}").into()),
        };

        let mut equalized = Mat::default();
        imgproc::equalize_hist(&gray, &mut equalized)?;
        Ok(mat_to_frame(&equalized, frame.index())?)
    }
}
