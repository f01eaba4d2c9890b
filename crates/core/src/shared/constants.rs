use std::time::Duration;

pub const FACE_CASCADE_NAME: &str = "haarcascade_frontalface_alt2.xml";
pub const SMILE_CASCADE_NAME: &str = "haarcascade_smile.xml";
pub const EYE_CASCADE_NAME: &str = "haarcascade_eye.xml";

/// Upstream location of the stock OpenCV cascades, used when no local copy exists.
pub const CASCADE_BASE_URL: &str =
    "https://raw.githubusercontent.com/opencv/opencv/4.x/data/haarcascades";

/// Relative resource directory checked first for cascade files.
pub const DEFAULT_CASCADE_DIR: &str = "resources/haarcascades";

/// Where distribution packages of OpenCV install their cascade data.
pub const SYSTEM_CASCADE_DIRS: &[&str] = &[
    "/usr/share/opencv4/haarcascades",
    "/usr/local/share/opencv4/haarcascades",
    "/usr/share/opencv/haarcascades",
];

/// One frame every 33 ms (~30 fps).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

pub const DEFAULT_CAMERA_INDEX: i32 = 0;

/// Minimum feature size as a fraction of the first frame's height.
pub const MIN_FEATURE_HEIGHT_RATIO: f32 = 0.2;

pub const CASCADE_SCALE_FACTOR: f64 = 1.1;
pub const CASCADE_MIN_NEIGHBORS: i32 = 2;

/// Slack (px) allowed when matching a smile against its face box.
pub const SMILE_TOLERANCE: i32 = 10;

pub const BOX_THICKNESS: i32 = 3;
pub const FACE_COLOR: [u8; 3] = [255, 87, 34];
pub const FEATURE_COLOR: [u8; 3] = [233, 30, 99];

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
