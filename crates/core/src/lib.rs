//! Face, smile and eye detection over webcam frames using OpenCV Haar
//! cascades.
//!
//! Layout follows a domain/infrastructure split: `domain` modules hold the
//! traits and pure logic, `infrastructure` modules hold the OpenCV, `image`
//! and network-backed implementations.

pub mod annotation;
pub mod detection;
pub mod pipeline;
pub mod shared;
pub mod video;
