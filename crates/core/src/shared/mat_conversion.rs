use opencv::core::Mat;
use opencv::prelude::*;

use crate::shared::frame::Frame;

/// Copies a frame's pixels into an owned OpenCV matrix with the same
/// channel count.
pub fn frame_to_mat(frame: &Frame) -> opencv::Result<Mat> {
    let flat = Mat::from_slice(frame.data())?;
    flat.reshape(i32::from(frame.channels()), frame.height() as i32)?
        .try_clone()
}

/// Copies an 8-bit OpenCV matrix into a frame, compacting row padding.
pub fn mat_to_frame(mat: &Mat, index: usize) -> opencv::Result<Frame> {
    let compact;
    let mat = if mat.is_continuous() {
        mat
    } else {
        compact = mat.try_clone()?;
        &compact
    };
    let data = mat.data_bytes()?.to_vec();
    Ok(Frame::new(
        data,
        mat.cols() as u32,
        mat.rows() as u32,
        mat.channels() as u8,
        index,
    ))
}
