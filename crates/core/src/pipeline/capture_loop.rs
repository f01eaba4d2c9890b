use std::time::{Duration, Instant};

use crossbeam_channel::select;

use crate::pipeline::detect_and_annotate_use_case::{DetectAndAnnotateUseCase, FrameReport};
use crate::pipeline::session_logger::SessionLogger;
use crate::pipeline::stop_signal::StopSignal;
use crate::shared::constants::DEFAULT_FRAME_INTERVAL;
use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

/// Fixed-rate capture: one grab → detect → hand-off per tick.
///
/// The first tick runs immediately. Ticks that yield no frame, or whose
/// read or detection fails, are logged and skipped; the session carries on.
pub struct CaptureLoop {
    interval: Duration,
    max_frames: Option<usize>,
}

impl CaptureLoop {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_frames: None,
        }
    }

    /// Stop after this many annotated frames.
    pub fn with_max_frames(mut self, max_frames: Option<usize>) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Opens `source`, runs until stopped, `on_frame` returns `false`, or
    /// the frame limit is hit, then closes the source.
    ///
    /// Returns the number of frames handed to `on_frame`.
    pub fn run<F>(
        &self,
        source: &mut dyn FrameSource,
        use_case: &mut DetectAndAnnotateUseCase,
        logger: &mut dyn SessionLogger,
        stop: &StopSignal,
        on_frame: F,
    ) -> Result<usize, Box<dyn std::error::Error>>
    where
        F: FnMut(Frame, FrameReport) -> bool,
    {
        if let Err(e) = source.open() {
            source.close();
            return Err(e);
        }
        let processed = self.pump(source, use_case, logger, stop, on_frame);
        source.close();
        Ok(processed)
    }

    fn pump<F>(
        &self,
        source: &mut dyn FrameSource,
        use_case: &mut DetectAndAnnotateUseCase,
        logger: &mut dyn SessionLogger,
        stop: &StopSignal,
        mut on_frame: F,
    ) -> usize
    where
        F: FnMut(Frame, FrameReport) -> bool,
    {
        let ticker = crossbeam_channel::tick(self.interval);
        let mut processed = 0;

        while !stop.is_stopped() {
            if let Some((frame, report)) = step(source, use_case, logger) {
                processed += 1;
                if !on_frame(frame, report) {
                    break;
                }
            }
            if self.max_frames.is_some_and(|max| processed >= max) {
                break;
            }
            // A stop wakes us early; the loop condition then sees the flag.
            select! {
                recv(ticker) -> _ => {}
                recv(stop.woken()) -> _ => {}
            }
        }
        processed
    }
}

impl Default for CaptureLoop {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

fn step(
    source: &mut dyn FrameSource,
    use_case: &mut DetectAndAnnotateUseCase,
    logger: &mut dyn SessionLogger,
) -> Option<(Frame, FrameReport)> {
    let mut frame = match source.read() {
        Ok(Some(frame)) if !frame.is_empty() => frame,
        Ok(_) => {
            logger.skipped("no frame");
            return None;
        }
        Err(e) => {
            log::warn!("Frame read failed: {e}");
            logger.skipped("read error");
            return None;
        }
    };

    let start = Instant::now();
    match use_case.execute(&mut frame) {
        Ok(report) => {
            logger.frame(&report, start.elapsed().as_secs_f64() * 1000.0);
            Some((frame, report))
        }
        Err(e) => {
            log::warn!("Detection failed on frame {}: {e}", frame.index());
            logger.skipped("detection error");
            None
        }
    }
}
