use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::video::domain::frame_source::{FrameSource, SourceInfo};

/// Presents a still image as a one-frame source.
///
/// Decoding goes through the `image` crate; the first `read` yields the
/// image, later reads yield nothing.
pub struct ImageFileSource {
    path: PathBuf,
    frame: Option<Frame>,
}

impl ImageFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            frame: None,
        }
    }
}

impl FrameSource for ImageFileSource {
    fn open(&mut self) -> Result<SourceInfo, Box<dyn std::error::Error>> {
        let img = image::open(&self.path)?.to_rgb8();
        let (width, height) = img.dimensions();
        self.frame = Some(Frame::new(img.into_raw(), width, height, 3, 0));
        Ok(SourceInfo {
            width,
            height,
            fps: 0.0,
            description: self.path.display().to_string(),
        })
    }

    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        Ok(self.frame.take())
    }

    fn close(&mut self) {
        self.frame = None;
    }
}
