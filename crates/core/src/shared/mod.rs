pub mod constants;
pub mod detection_mode;
pub mod frame;
pub mod mat_conversion;
pub mod region;
