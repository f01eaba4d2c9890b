use std::path::Path;

use crate::detection::domain::feature_detector::DetectorSet;
use crate::shared::detection_mode::DetectionMode;

use super::cascade_detector::CascadeDetector;
use super::cascade_resolver;

/// Resolves and loads every cascade `mode` needs.
///
/// Fails on the first classifier that cannot be found or parsed, so a
/// session never starts with half its detectors missing.
pub fn create_detectors(
    mode: DetectionMode,
    cascade_dir: Option<&Path>,
) -> Result<DetectorSet, Box<dyn std::error::Error>> {
    let mut set = DetectorSet::new();
    for &classifier in mode.required_classifiers() {
        let path = cascade_resolver::resolve(classifier, cascade_dir)?;
        let detector = CascadeDetector::load(classifier, &path)?;
        log::info!("Loaded {classifier} cascade from {}", path.display());
        set.insert(classifier, Box::new(detector));
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_invalid_cascade_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("haarcascade_smile.xml"), b"not a cascade").unwrap();
        let result = create_detectors(DetectionMode::Smile, Some(tmp.path()));
        assert!(result.is_err());
    }
}
