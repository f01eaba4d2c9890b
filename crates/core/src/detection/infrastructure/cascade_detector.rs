use std::path::{Path, PathBuf};

use opencv::core::{Rect, Size, Vector};
use opencv::objdetect::{self, CascadeClassifier};
use opencv::prelude::*;
use thiserror::Error;

use crate::detection::domain::feature_detector::FeatureDetector;
use crate::shared::constants::{CASCADE_MIN_NEIGHBORS, CASCADE_SCALE_FACTOR};
use crate::shared::detection_mode::Classifier;
use crate::shared::frame::Frame;
use crate::shared::mat_conversion::frame_to_mat;
use crate::shared::region::Region;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("failed to load {classifier} cascade from {path}: {source}")]
    Load {
        classifier: Classifier,
        path: PathBuf,
        #[source]
        source: opencv::Error,
    },
    #[error("{classifier} cascade at {path} contains no stages")]
    Empty {
        classifier: Classifier,
        path: PathBuf,
    },
}

/// Haar-cascade detector backed by OpenCV's `CascadeClassifier`.
///
/// Runs a multi-scale search with a fixed scale step and neighbour count;
/// the minimum window comes from the caller on every call.
pub struct CascadeDetector {
    classifier: Classifier,
    cascade: CascadeClassifier,
}

impl CascadeDetector {
    pub fn load(classifier: Classifier, path: &Path) -> Result<Self, ClassifierError> {
        let load_error = |source| ClassifierError::Load {
            classifier,
            path: path.to_path_buf(),
            source,
        };
        let cascade = CascadeClassifier::new(&path.to_string_lossy()).map_err(load_error)?;
        if cascade.empty().map_err(load_error)? {
            return Err(ClassifierError::Empty {
                classifier,
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            classifier,
            cascade,
        })
    }

    pub fn classifier(&self) -> Classifier {
        self.classifier
    }
}

impl FeatureDetector for CascadeDetector {
    fn detect(
        &mut self,
        gray: &Frame,
        min_size: u32,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let image = frame_to_mat(gray)?;
        let mut found = Vector::<Rect>::new();
        let min = min_size as i32;

        self.cascade.detect_multi_scale(
            &image,
            &mut found,
            CASCADE_SCALE_FACTOR,
            CASCADE_MIN_NEIGHBORS,
            objdetect::CASCADE_SCALE_IMAGE,
            Size::new(min, min),
            Size::default(),
        )?;

        Ok(found
            .iter()
            .map(|r| Region::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_missing_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing.xml");
        let result = CascadeDetector::load(Classifier::Face, &path);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_garbage_file_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("haarcascade_eye.xml");
        fs::write(&path, b"<opencv_storage></opencv_storage>").unwrap();
        let err = CascadeDetector::load(Classifier::Eye, &path).err().unwrap();
        assert!(err.to_string().contains("eye cascade"));
    }
}
