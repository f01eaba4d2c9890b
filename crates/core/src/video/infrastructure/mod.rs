pub mod display_encoder;
pub mod image_file_source;
pub mod image_file_writer;
pub mod opencv_camera;
