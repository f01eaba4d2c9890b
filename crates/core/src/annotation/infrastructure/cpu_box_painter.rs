use crate::annotation::domain::box_painter::BoxPainter;
use crate::shared::constants::BOX_THICKNESS;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Outlines regions directly in the frame buffer.
///
/// The stroke is centred on the box edges, running from the top-left
/// corner to the bottom-right corner inclusive, and is clipped to the
/// frame. Only the first three channels are written.
pub struct CpuBoxPainter {
    thickness: i32,
}

impl CpuBoxPainter {
    pub fn new(thickness: i32) -> Self {
        Self {
            thickness: thickness.max(1),
        }
    }
}

impl Default for CpuBoxPainter {
    fn default() -> Self {
        Self::new(BOX_THICKNESS)
    }
}

impl BoxPainter for CpuBoxPainter {
    fn paint(&self, frame: &mut Frame, region: &Region, color: [u8; 3]) {
        let (x1, y1) = region.top_left();
        let (x2, y2) = region.bottom_right();
        let half = self.thickness / 2;
        let inset = self.thickness - half;

        let width = frame.width() as i32;
        let height = frame.height() as i32;
        let channels = (frame.channels() as usize).min(3);

        let left = (x1 - half).max(0);
        let top = (y1 - half).max(0);
        let right = (x2 + half).min(width - 1);
        let bottom = (y2 + half).min(height - 1);
        if left > right || top > bottom {
            return;
        }

        let inside = |px: i32, py: i32| {
            px >= x1 + inset && px <= x2 - inset && py >= y1 + inset && py <= y2 - inset
        };

        let mut pixels = frame.as_ndarray_mut();
        for py in top..=bottom {
            for px in left..=right {
                if inside(px, py) {
                    continue;
                }
                for (c, &value) in color.iter().enumerate().take(channels) {
                    pixels[[py as usize, px as usize, c]] = value;
                }
            }
        }
    }
}
