pub mod feature_detector;
pub mod frame_preprocessor;
