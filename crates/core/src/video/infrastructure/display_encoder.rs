use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::shared::frame::Frame;

/// Expands a frame to tightly packed RGBA, the layout GUI image widgets take.
pub fn to_rgba(frame: &Frame) -> Vec<u8> {
    let data = frame.data();
    match frame.channels() {
        4 => data.to_vec(),
        3 => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        1 => data.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        n => {
            log::warn!("Cannot display a {n}-channel frame");
            vec![0; frame.width() as usize * frame.height() as usize * 4]
        }
    }
}

/// Wraps the frame's pixels in an `image` buffer of the matching colour type.
pub fn to_dynamic_image(frame: &Frame) -> Option<DynamicImage> {
    let (w, h) = (frame.width(), frame.height());
    let data = frame.data().to_vec();
    match frame.channels() {
        1 => GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
        _ => None,
    }
}
