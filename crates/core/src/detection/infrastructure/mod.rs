pub mod cascade_detector;
pub mod cascade_resolver;
pub mod detector_factory;
pub mod opencv_preprocessor;
