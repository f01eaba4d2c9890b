use std::time::Instant;

use crate::pipeline::detect_and_annotate_use_case::FrameReport;

/// Observer for capture-session events.
///
/// Lets the capture loop report per-frame results without knowing whether
/// a CLI, the GUI or a test is listening.
pub trait SessionLogger: Send {
    /// Record one processed frame and how long detection took.
    fn frame(&mut self, report: &FrameReport, duration_ms: f64);

    /// Record a tick that produced no annotated frame.
    fn skipped(&mut self, reason: &str);

    /// Emit an end-of-session summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullSessionLogger;

impl SessionLogger for NullSessionLogger {
    fn frame(&mut self, _report: &FrameReport, _duration_ms: f64) {}
    fn skipped(&mut self, _reason: &str) {}
}

/// CLI-oriented logger that tallies detections and detection time, and
/// prints a summary when the session ends.
///
/// Per-frame lines are throttled to every `throttle_frames` frames.
pub struct StdoutSessionLogger {
    throttle_frames: usize,
    start_time: Instant,
    frames: usize,
    skipped: usize,
    faces: usize,
    smiles: usize,
    eyes: usize,
    smile_frames: usize,
    blink_frames: usize,
    detect_ms: Vec<f64>,
}

impl StdoutSessionLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            start_time: Instant::now(),
            frames: 0,
            skipped: 0,
            faces: 0,
            smiles: 0,
            eyes: 0,
            smile_frames: 0,
            blink_frames: 0,
            detect_ms: Vec::new(),
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn blink_frames(&self) -> usize {
        self.blink_frames
    }

    /// Returns the formatted summary string, or `None` if nothing happened.
    pub fn summary_string(&self) -> Option<String> {
        if self.frames == 0 && self.skipped == 0 {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let avg_ms = if self.detect_ms.is_empty() {
            0.0
        } else {
            self.detect_ms.iter().sum::<f64>() / self.detect_ms.len() as f64
        };

        let mut lines = vec![
            format!(
                "Session summary ({} frames, {} skipped, {elapsed_s:.1}s):",
                self.frames, self.skipped
            ),
            format!(
                "  detections  : {} faces, {} smiles, {} eyes",
                self.faces, self.smiles, self.eyes
            ),
            format!(
                "  events      : {} smile frames, {} blink frames",
                self.smile_frames, self.blink_frames
            ),
            format!("  detect time : avg {avg_ms:.1}ms"),
        ];
        if self.frames > 0 && elapsed_s > 0.0 {
            let fps = self.frames as f64 / elapsed_s;
            lines.push(format!("  throughput  : {fps:.1} fps"));
        }
        Some(lines.join("\n"))
    }
}

impl Default for StdoutSessionLogger {
    fn default() -> Self {
        Self::new(30)
    }
}

impl SessionLogger for StdoutSessionLogger {
    fn frame(&mut self, report: &FrameReport, duration_ms: f64) {
        self.frames += 1;
        self.faces += report.faces.len();
        self.smiles += report.smiles.len();
        self.eyes += report.eyes.len();
        self.smile_frames += usize::from(report.smile_in_face);
        self.blink_frames += usize::from(report.blink);
        self.detect_ms.push(duration_ms);

        if self.frames % self.throttle_frames == 0 {
            log::info!(
                "Frame {}: {} faces, {} smiles, {} eyes ({duration_ms:.1}ms)",
                self.frames,
                report.faces.len(),
                report.smiles.len(),
                report.eyes.len()
            );
        }
    }

    fn skipped(&mut self, reason: &str) {
        self.skipped += 1;
        log::debug!("Skipped tick: {reason}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::region::Region;

    fn report(faces: usize, smile: bool, blink: bool) -> FrameReport {
        FrameReport {
            faces: vec![Region::new(0, 0, 10, 10); faces],
            smiles: if smile { vec![Region::new(2, 6, 5, 3)] } else { vec![] },
            eyes: Vec::new(),
            smile_in_face: smile,
            blink,
        }
    }

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullSessionLogger;
        logger.frame(&FrameReport::default(), 1.0);
        logger.skipped("empty frame");
        logger.summary();
    }

    #[test]
    fn test_counts_accumulate() {
        let mut logger = StdoutSessionLogger::new(10);
        logger.frame(&report(2, true, false), 5.0);
        logger.frame(&report(1, false, true), 7.0);
        logger.skipped("no frame");

        assert_eq!(logger.frames(), 2);
        assert_eq!(logger.blink_frames(), 1);
        assert_eq!(logger.faces, 3);
        assert_eq!(logger.smile_frames, 1);
        assert_eq!(logger.skipped, 1);
    }

    #[test]
    fn test_summary_includes_totals() {
        let mut logger = StdoutSessionLogger::new(10);
        logger.frame(&report(1, true, false), 10.0);
        logger.frame(&report(1, true, true), 20.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Session summary (2 frames, 0 skipped"));
        assert!(summary.contains("2 faces, 2 smiles, 0 eyes"));
        assert!(summary.contains("2 smile frames, 1 blink frames"));
        assert!(summary.contains("avg 15.0ms"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(StdoutSessionLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_default_throttle() {
        assert_eq!(StdoutSessionLogger::default().throttle_frames, 30);
    }

    #[test]
    fn test_zero_throttle_is_clamped() {
        assert_eq!(StdoutSessionLogger::new(0).throttle_frames, 1);
    }
}
