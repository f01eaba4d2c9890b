use crate::shared::detection_mode::Classifier;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for a single-object detector (face, smile or eye).
///
/// Receives the preprocessed grayscale frame and the smallest square
/// window, in pixels, worth searching.
pub trait FeatureDetector: Send {
    fn detect(
        &mut self,
        gray: &Frame,
        min_size: u32,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>>;
}

/// The detectors loaded for the current mode, one slot per classifier.
#[derive(Default)]
pub struct DetectorSet {
    face: Option<Box<dyn FeatureDetector>>,
    smile: Option<Box<dyn FeatureDetector>>,
    eye: Option<Box<dyn FeatureDetector>>,
}

impl DetectorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, classifier: Classifier, detector: Box<dyn FeatureDetector>) -> Self {
        self.insert(classifier, detector);
        self
    }

    pub fn insert(&mut self, classifier: Classifier, detector: Box<dyn FeatureDetector>) {
        *self.slot(classifier) = Some(detector);
    }

    pub fn contains(&self, classifier: Classifier) -> bool {
        match classifier {
            Classifier::Face => self.face.is_some(),
            Classifier::Smile => self.smile.is_some(),
            Classifier::Eye => self.eye.is_some(),
        }
    }

    pub fn get_mut(&mut self, classifier: Classifier) -> Option<&mut Box<dyn FeatureDetector>> {
        self.slot(classifier).as_mut()
    }

    fn slot(&mut self, classifier: Classifier) -> &mut Option<Box<dyn FeatureDetector>> {
        match classifier {
            Classifier::Face => &mut self.face,
            Classifier::Smile => &mut self.smile,
            Classifier::Eye => &mut self.eye,
        }
    }
}
