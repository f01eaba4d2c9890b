use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Draws hollow detection boxes onto a frame in place.
pub trait BoxPainter: Send {
    fn paint(&self, frame: &mut Frame, region: &Region, color: [u8; 3]);
}
