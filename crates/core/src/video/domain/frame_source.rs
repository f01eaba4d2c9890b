use crate::shared::frame::Frame;

/// What a source reported when it was opened.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    /// Nominal frame rate; 0 when the source has no timing (still images).
    pub fps: f64,
    pub description: String,
}

/// A camera or other producer of RGB frames.
///
/// `read` returns `Ok(None)` when no frame is available this time
/// (a dropped grab, or an exhausted still image); the capture loop skips
/// such ticks.
pub trait FrameSource: Send {
    fn open(&mut self) -> Result<SourceInfo, Box<dyn std::error::Error>>;

    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the underlying device. Safe to call more than once.
    fn close(&mut self);
}
