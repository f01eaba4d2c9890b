use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use iced::futures::channel::oneshot;

use smileblink_core::pipeline::detect_and_annotate_use_case::DetectAndAnnotateUseCase;
use smileblink_core::pipeline::infrastructure::use_case_factory::create_use_case;
use smileblink_core::shared::detection_mode::DetectionMode;

/// Classifiers loaded for one mode, shared between the UI and whichever
/// capture session is running. Loaded once and reused for later sessions.
#[derive(Clone)]
pub struct LoadedDetection {
    mode: DetectionMode,
    use_case: Arc<Mutex<DetectAndAnnotateUseCase>>,
}

impl LoadedDetection {
    pub fn new(use_case: DetectAndAnnotateUseCase) -> Self {
        Self {
            mode: use_case.mode(),
            use_case: Arc::new(Mutex::new(use_case)),
        }
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, DetectAndAnnotateUseCase>, String> {
        self.use_case
            .lock()
            .map_err(|_| format!("{} classifiers are unusable after a crash", self.mode))
    }
}

impl fmt::Debug for LoadedDetection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedDetection")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Resolves and loads the cascades for `mode` on a background thread.
///
/// Loading can hit the disk and the network, so it stays off the UI
/// executor; nothing starts until the returned future is polled.
pub async fn load(mode: DetectionMode, cascade_dir: PathBuf) -> Result<LoadedDetection, String> {
    let (tx, rx) = oneshot::channel();
    thread::spawn(move || {
        let result = create_use_case(mode, Some(&cascade_dir))
            .map(LoadedDetection::new)
            .map_err(|e| {
                log::error!("Could not load {mode} classifiers: {e}");
                format!("Could not load {mode} classifiers: {e}")
            });
        let _ = tx.send(result);
    });
    rx.await
        .unwrap_or_else(|_| Err(format!("Loading {mode} classifiers was interrupted")))
}

#[cfg(test)]
pub(crate) mod test_support {
    use smileblink_core::annotation::infrastructure::cpu_box_painter::CpuBoxPainter;
    use smileblink_core::detection::domain::feature_detector::{DetectorSet, FeatureDetector};
    use smileblink_core::detection::domain::frame_preprocessor::FramePreprocessor;
    use smileblink_core::shared::frame::Frame;
    use smileblink_core::shared::region::Region;

    use super::*;

    struct FlatGray;

    impl FramePreprocessor for FlatGray {
        fn prepare(&self, frame: &Frame) -> Result<Frame, Box<dyn std::error::Error>> {
            let len = (frame.width() * frame.height()) as usize;
            Ok(Frame::new(vec![0; len], frame.width(), frame.height(), 1, frame.index()))
        }
    }

    struct NothingFound;

    impl FeatureDetector for NothingFound {
        fn detect(
            &mut self,
            _gray: &Frame,
            _min_size: u32,
        ) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Ok(Vec::new())
        }
    }

    /// Detection for `mode` backed by detectors that never find anything.
    pub fn stub_detection(mode: DetectionMode) -> LoadedDetection {
        let detectors = mode
            .required_classifiers()
            .iter()
            .fold(DetectorSet::new(), |set, &c| {
                set.with(c, Box::new(NothingFound))
            });
        let use_case = DetectAndAnnotateUseCase::new(
            mode,
            Box::new(FlatGray),
            detectors,
            Box::new(CpuBoxPainter::default()),
        )
        .unwrap();
        LoadedDetection::new(use_case)
    }
}
