pub mod camera_tab;
pub mod settings_tab;
