use crate::shared::frame::Frame;

/// Turns a captured colour frame into the single-channel image the
/// classifiers search.
pub trait FramePreprocessor: Send {
    fn prepare(&self, frame: &Frame) -> Result<Frame, Box<dyn std::error::Error>>;
}
