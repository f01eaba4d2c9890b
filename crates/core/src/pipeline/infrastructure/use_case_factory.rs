use std::path::Path;

use crate::annotation::infrastructure::cpu_box_painter::CpuBoxPainter;
use crate::detection::infrastructure::detector_factory::create_detectors;
use crate::detection::infrastructure::opencv_preprocessor::OpencvPreprocessor;
use crate::pipeline::detect_and_annotate_use_case::DetectAndAnnotateUseCase;
use crate::shared::detection_mode::DetectionMode;

/// Wires the OpenCV preprocessor, the cascades for `mode` and the CPU box
/// painter into a ready-to-run use case.
pub fn create_use_case(
    mode: DetectionMode,
    cascade_dir: Option<&Path>,
) -> Result<DetectAndAnnotateUseCase, Box<dyn std::error::Error>> {
    let detectors = create_detectors(mode, cascade_dir)?;
    let use_case = DetectAndAnnotateUseCase::new(
        mode,
        Box::new(OpencvPreprocessor::new()),
        detectors,
        Box::new(CpuBoxPainter::default()),
    )?;
    log::info!("Detection ready in {mode} mode");
    Ok(use_case)
}
