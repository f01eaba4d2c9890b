use crate::annotation::domain::box_painter::BoxPainter;
use crate::detection::domain::feature_detector::DetectorSet;
use crate::detection::domain::frame_preprocessor::FramePreprocessor;
use crate::shared::constants::{FACE_COLOR, FEATURE_COLOR, MIN_FEATURE_HEIGHT_RATIO};
use crate::shared::detection_mode::{Classifier, DetectionMode};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// What was drawn on one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub faces: Vec<Region>,
    pub smiles: Vec<Region>,
    pub eyes: Vec<Region>,
    /// A smile was matched to the last face.
    pub smile_in_face: bool,
    /// Exactly two eyes were detected and at least one sat inside the face.
    pub blink: bool,
}

/// Per-frame pipeline: preprocess → detect → associate → draw.
///
/// Sub-features are matched against the last face the face classifier
/// returned for the same frame. The minimum search window is derived from
/// the first frame with a usable height and kept for the whole session.
pub struct DetectAndAnnotateUseCase {
    mode: DetectionMode,
    preprocessor: Box<dyn FramePreprocessor>,
    detectors: DetectorSet,
    painter: Box<dyn BoxPainter>,
    min_feature_size: Option<u32>,
}

impl DetectAndAnnotateUseCase {
    pub fn new(
        mode: DetectionMode,
        preprocessor: Box<dyn FramePreprocessor>,
        detectors: DetectorSet,
        painter: Box<dyn BoxPainter>,
    ) -> Result<Self, String> {
        if let Some(missing) = mode
            .required_classifiers()
            .iter()
            .find(|&&c| !detectors.contains(c))
        {
            return Err(format!("{mode} mode needs a {missing} detector"));
        }
        Ok(Self {
            mode,
            preprocessor,
            detectors,
            painter,
            min_feature_size: None,
        })
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    pub fn min_feature_size(&self) -> Option<u32> {
        self.min_feature_size
    }

    /// Detects features in `frame` and draws the accepted boxes onto it.
    pub fn execute(&mut self, frame: &mut Frame) -> Result<FrameReport, Box<dyn std::error::Error>> {
        let gray = self.preprocessor.prepare(frame)?;
        let min_size = self.resolve_min_size(gray.height());
        let mut report = FrameReport::default();
        let mut last_face: Option<Region> = None;

        if self.mode.runs(Classifier::Face) {
            for face in self.detect(Classifier::Face, &gray, min_size)? {
                self.painter.paint(frame, &face, FACE_COLOR);
                last_face = Some(face);
                report.faces.push(face);
            }
        }

        if self.mode.runs(Classifier::Smile) {
            let needs_face = self.mode.smiles_need_face();
            for smile in self.detect(Classifier::Smile, &gray, min_size)? {
                let in_face = last_face.is_some_and(|face| smile.smile_within(&face));
                if needs_face && !in_face {
                    continue;
                }
                report.smile_in_face |= in_face;
                self.painter.paint(frame, &smile, FEATURE_COLOR);
                report.smiles.push(smile);
            }
        }

        if self.mode.runs(Classifier::Eye) {
            let eyes = self.detect(Classifier::Eye, &gray, min_size)?;
            let pair = eyes.len() == 2;
            for eye in eyes {
                if !last_face.is_some_and(|face| eye.eye_within(&face)) {
                    continue;
                }
                self.painter.paint(frame, &eye, FEATURE_COLOR);
                report.eyes.push(eye);
                report.blink |= pair;
            }
        }

        if report.blink {
            log::info!("blink (frame {})", frame.index());
        }
        if report.smile_in_face {
            log::debug!("smile (frame {})", frame.index());
        }
        Ok(report)
    }

    fn detect(
        &mut self,
        classifier: Classifier,
        gray: &Frame,
        min_size: u32,
    ) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let detector = self
            .detectors
            .get_mut(classifier)
            .ok_or_else(|| format!("no {classifier} detector loaded"))?;
        detector.detect(gray, min_size)
    }

    fn resolve_min_size(&mut self, height: u32) -> u32 {
        if self.min_feature_size.is_none() {
            let size = (height as f32 * MIN_FEATURE_HEIGHT_RATIO).round() as u32;
            if size > 0 {
                self.min_feature_size = Some(size);
            }
        }
        self.min_feature_size.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::feature_detector::FeatureDetector;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubPreprocessor;

    impl FramePreprocessor for StubPreprocessor {
        fn prepare(&self, frame: &Frame) -> Result<Frame, Box<dyn std::error::Error>> {
            let len = (frame.width() * frame.height()) as usize;
            Ok(Frame::new(
                vec![0; len],
                frame.width(),
                frame.height(),
                1,
                frame.index(),
            ))
        }
    }

    struct StubDetector {
        regions: Vec<Region>,
        min_sizes: Arc<Mutex<Vec<u32>>>,
    }

    impl StubDetector {
        fn boxed(regions: Vec<Region>) -> Box<dyn FeatureDetector> {
            Box::new(Self {
                regions,
                min_sizes: Arc::new(Mutex::new(Vec::new())),
            })
        }
    }

    impl FeatureDetector for StubDetector {
        fn detect(
            &mut self,
            _gray: &Frame,
            min_size: u32,
        ) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            self.min_sizes.lock().unwrap().push(min_size);
            Ok(self.regions.clone())
        }
    }

    struct FailingDetector;

    impl FeatureDetector for FailingDetector {
        fn detect(
            &mut self,
            _gray: &Frame,
            _min_size: u32,
        ) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Err("cascade exploded".into())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingPainter {
        painted: Arc<Mutex<Vec<(Region, [u8; 3])>>>,
    }

    impl BoxPainter for RecordingPainter {
        fn paint(&self, _frame: &mut Frame, region: &Region, color: [u8; 3]) {
            self.painted.lock().unwrap().push((*region, color));
        }
    }

    // --- Helpers ---

    fn make_frame(w: u32, h: u32) -> Frame {
        Frame::new(vec![128; (w * h * 3) as usize], w, h, 3, 0)
    }

    fn face() -> Region {
        Region::from_corners((10, 10), (110, 110))
    }

    fn smile_inside() -> Region {
        Region::from_corners((30, 70), (90, 100))
    }

    fn smile_outside() -> Region {
        Region::from_corners((200, 200), (220, 220))
    }

    fn left_eye() -> Region {
        Region::from_corners((25, 30), (55, 50))
    }

    fn right_eye() -> Region {
        Region::from_corners((65, 30), (95, 50))
    }

    fn use_case(
        mode: DetectionMode,
        detectors: DetectorSet,
    ) -> (DetectAndAnnotateUseCase, RecordingPainter) {
        let painter = RecordingPainter::default();
        let uc = DetectAndAnnotateUseCase::new(
            mode,
            Box::new(StubPreprocessor),
            detectors,
            Box::new(painter.clone()),
        )
        .unwrap();
        (uc, painter)
    }

    // --- Tests ---

    #[test]
    fn test_missing_detector_is_rejected() {
        let detectors = DetectorSet::new().with(Classifier::Face, StubDetector::boxed(vec![]));
        let result = DetectAndAnnotateUseCase::new(
            DetectionMode::FaceAndSmile,
            Box::new(StubPreprocessor),
            detectors,
            Box::new(RecordingPainter::default()),
        );
        let err = result.err().unwrap();
        assert!(err.contains("needs a smile detector"));
    }

    #[test]
    fn test_face_mode_draws_every_face() {
        let other = Region::new(300, 10, 80, 80);
        let (mut uc, painter) = use_case(
            DetectionMode::Face,
            DetectorSet::new().with(Classifier::Face, StubDetector::boxed(vec![face(), other])),
        );

        let report = uc.execute(&mut make_frame(640, 480)).unwrap();

        assert_eq!(report.faces, vec![face(), other]);
        let painted = painter.painted.lock().unwrap();
        assert_eq!(painted.len(), 2);
        assert!(painted.iter().all(|(_, color)| *color == FACE_COLOR));
    }

    #[test]
    fn test_smile_mode_draws_all_smiles_without_face() {
        let (mut uc, painter) = use_case(
            DetectionMode::Smile,
            DetectorSet::new().with(
                Classifier::Smile,
                StubDetector::boxed(vec![smile_inside(), smile_outside()]),
            ),
        );

        let report = uc.execute(&mut make_frame(640, 480)).unwrap();

        assert_eq!(report.smiles.len(), 2);
        assert!(!report.smile_in_face);
        assert_eq!(painter.painted.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_face_and_smile_keeps_only_contained_smiles() {
        let (mut uc, painter) = use_case(
            DetectionMode::FaceAndSmile,
            DetectorSet::new()
                .with(Classifier::Face, StubDetector::boxed(vec![face()]))
                .with(
                    Classifier::Smile,
                    StubDetector::boxed(vec![smile_inside(), smile_outside()]),
                ),
        );

        let report = uc.execute(&mut make_frame(640, 480)).unwrap();

        assert_eq!(report.smiles, vec![smile_inside()]);
        assert!(report.smile_in_face);
        let painted = painter.painted.lock().unwrap();
        assert_eq!(
            *painted,
            vec![(face(), FACE_COLOR), (smile_inside(), FEATURE_COLOR)]
        );
    }

    #[test]
    fn test_smiles_are_matched_against_last_face() {
        let far_face = Region::from_corners((300, 300), (400, 400));
        let (mut uc, _) = use_case(
            DetectionMode::FaceAndSmile,
            DetectorSet::new()
                .with(Classifier::Face, StubDetector::boxed(vec![face(), far_face]))
                .with(Classifier::Smile, StubDetector::boxed(vec![smile_inside()])),
        );

        let report = uc.execute(&mut make_frame(640, 480)).unwrap();

        assert!(report.smiles.is_empty());
        assert!(!report.smile_in_face);
    }

    #[test]
    fn test_no_face_means_no_contained_features() {
        let (mut uc, painter) = use_case(
            DetectionMode::EyesInFace,
            DetectorSet::new()
                .with(Classifier::Face, StubDetector::boxed(vec![]))
                .with(
                    Classifier::Eye,
                    StubDetector::boxed(vec![left_eye(), right_eye()]),
                ),
        );

        let report = uc.execute(&mut make_frame(640, 480)).unwrap();

        assert!(report.eyes.is_empty());
        assert!(!report.blink);
        assert!(painter.painted.lock().unwrap().is_empty());
    }

    #[test]
    fn test_two_eyes_in_face_is_a_blink() {
        let (mut uc, _) = use_case(
            DetectionMode::EyesInFace,
            DetectorSet::new()
                .with(Classifier::Face, StubDetector::boxed(vec![face()]))
                .with(
                    Classifier::Eye,
                    StubDetector::boxed(vec![left_eye(), right_eye()]),
                ),
        );

        let report = uc.execute(&mut make_frame(640, 480)).unwrap();

        assert_eq!(report.eyes, vec![left_eye(), right_eye()]);
        assert!(report.blink);
    }

    #[test]
    fn test_single_eye_is_not_a_blink() {
        let (mut uc, _) = use_case(
            DetectionMode::EyesInFace,
            DetectorSet::new()
                .with(Classifier::Face, StubDetector::boxed(vec![face()]))
                .with(Classifier::Eye, StubDetector::boxed(vec![left_eye()])),
        );

        let report = uc.execute(&mut make_frame(640, 480)).unwrap();

        assert_eq!(report.eyes.len(), 1);
        assert!(!report.blink);
    }

    #[test]
    fn test_pair_with_one_eye_outside_still_counts() {
        let stray = Region::from_corners((400, 30), (430, 50));
        let (mut uc, _) = use_case(
            DetectionMode::EyesInFace,
            DetectorSet::new()
                .with(Classifier::Face, StubDetector::boxed(vec![face()]))
                .with(Classifier::Eye, StubDetector::boxed(vec![left_eye(), stray])),
        );

        let report = uc.execute(&mut make_frame(640, 480)).unwrap();

        assert_eq!(report.eyes, vec![left_eye()]);
        assert!(report.blink);
    }

    #[test]
    fn test_min_size_computed_once_from_first_frame() {
        let min_sizes = Arc::new(Mutex::new(Vec::new()));
        let detector = StubDetector {
            regions: vec![],
            min_sizes: min_sizes.clone(),
        };
        let (mut uc, _) = use_case(
            DetectionMode::Face,
            DetectorSet::new().with(Classifier::Face, Box::new(detector)),
        );

        uc.execute(&mut make_frame(640, 480)).unwrap();
        uc.execute(&mut make_frame(640, 1000)).unwrap();

        assert_eq!(uc.min_feature_size(), Some(96));
        assert_eq!(*min_sizes.lock().unwrap(), vec![96, 96]);
    }

    #[test]
    fn test_tiny_frame_leaves_min_size_unset() {
        let (mut uc, _) = use_case(
            DetectionMode::Face,
            DetectorSet::new().with(Classifier::Face, StubDetector::boxed(vec![])),
        );

        uc.execute(&mut make_frame(4, 2)).unwrap();
        assert_eq!(uc.min_feature_size(), None);

        uc.execute(&mut make_frame(10, 10)).unwrap();
        assert_eq!(uc.min_feature_size(), Some(2));
    }

    #[test]
    fn test_detector_error_propagates() {
        let (mut uc, _) = use_case(
            DetectionMode::Face,
            DetectorSet::new().with(Classifier::Face, Box::new(FailingDetector)),
        );

        let err = uc.execute(&mut make_frame(64, 64)).err().unwrap();
        assert_eq!(err.to_string(), "cascade exploded");
    }
}
