use iced::widget::{button, checkbox, column, container, image, row, text, Space};
use iced::{Alignment, ContentFit, Element, Length, Theme};

use smileblink_core::pipeline::detect_and_annotate_use_case::FrameReport;
use smileblink_core::shared::detection_mode::DetectionMode;

use crate::app::{Message, Status};
use crate::theme::status_color;

/// Width the camera image is scaled to.
pub const DISPLAY_WIDTH: f32 = 600.0;

/// Where the capture thread is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    Idle,
    Running,
    /// Stop was requested and the camera has not been released yet.
    Stopping,
}

pub struct CameraView<'a> {
    pub mode: Option<DetectionMode>,
    pub state: CameraState,
    /// The selected mode's classifiers are loaded.
    pub ready: bool,
    pub frame: Option<&'a image::Handle>,
    pub frame_size: (u32, u32),
    pub report: Option<&'a FrameReport>,
    pub status: &'a Status,
}

pub fn view<'a>(state: CameraView<'a>, theme: &Theme) -> Element<'a, Message> {
    let modes = column(DetectionMode::ALL.iter().map(|&mode| {
        let mut cb = checkbox(state.mode == Some(mode))
            .label(mode.to_string())
            .text_size(13);
        if state.state == CameraState::Idle {
            cb = cb.on_toggle(move |checked| Message::ModeToggled(mode, checked));
        }
        cb.into()
    }))
    .spacing(8);

    let (camera_label, enabled) = match state.state {
        CameraState::Idle => ("Start Camera", state.ready),
        CameraState::Running => ("Stop Camera", true),
        CameraState::Stopping => ("Stopping\u{2026}", false),
    };
    let camera_button = button(text(camera_label).size(14))
        .on_press_maybe(enabled.then_some(Message::ToggleCamera))
        .padding([8, 20])
        .style(button::primary);

    let snapshot_button = button(text("Save Snapshot").size(14))
        .on_press_maybe(state.frame.is_some().then_some(Message::SaveSnapshot))
        .padding([8, 20])
        .style(button::secondary);

    let controls = row![
        modes,
        Space::new().width(Length::Fill),
        column![camera_button, snapshot_button].spacing(8),
    ]
    .align_y(Alignment::Start);

    let picture: Element<'a, Message> = match state.frame {
        Some(handle) => {
            let (w, h) = fitted_size(state.frame_size.0, state.frame_size.1);
            image(handle.clone())
                .width(Length::Fixed(w))
                .height(Length::Fixed(h))
                .content_fit(ContentFit::Contain)
                .into()
        }
        None => container(text("No camera feed").size(13))
            .width(Length::Fixed(DISPLAY_WIDTH))
            .height(Length::Fixed(DISPLAY_WIDTH * 0.75))
            .center_x(Length::Fixed(DISPLAY_WIDTH))
            .center_y(Length::Fixed(DISPLAY_WIDTH * 0.75))
            .style(container::bordered_box)
            .into(),
    };

    let (status_text, is_error) = match state.status {
        Status::Idle => (String::new(), false),
        Status::Info(msg) => (msg.clone(), false),
        Status::Error(msg) => (msg.clone(), true),
    };
    let status_line = text(status_text)
        .size(12)
        .color(status_color(theme, is_error));

    let summary = text(state.report.map(describe).unwrap_or_default()).size(12);

    column![
        controls,
        Space::new().height(12),
        container(picture).center_x(Length::Fill),
        Space::new().height(8),
        summary,
        status_line,
    ]
    .spacing(4)
    .into()
}

/// Display size for a `width` x `height` frame scaled to [`DISPLAY_WIDTH`]
/// with its aspect ratio kept.
pub fn fitted_size(width: u32, height: u32) -> (f32, f32) {
    if width == 0 {
        return (DISPLAY_WIDTH, 0.0);
    }
    let scale = DISPLAY_WIDTH / width as f32;
    (DISPLAY_WIDTH, (height as f32 * scale).round())
}

fn describe(report: &FrameReport) -> String {
    let mut parts = vec![format!("{} face(s)", report.faces.len())];
    if !report.smiles.is_empty() {
        parts.push(format!("{} smile(s)", report.smiles.len()));
    }
    if !report.eyes.is_empty() {
        parts.push(format!("{} eye(s)", report.eyes.len()));
    }
    if report.smile_in_face {
        parts.push("smiling".to_string());
    }
    if report.blink {
        parts.push("blink".to_string());
    }
    parts.join(" \u{b7} ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use smileblink_core::shared::region::Region;

    #[test]
    fn test_fitted_size_keeps_aspect_ratio() {
        let (w, h) = fitted_size(640, 480);
        assert_relative_eq!(w, 600.0);
        assert_relative_eq!(h, 450.0);
    }

    #[test]
    fn test_fitted_size_upscales_small_frames() {
        let (w, h) = fitted_size(320, 180);
        assert_relative_eq!(w, 600.0);
        assert_relative_eq!(h, 338.0);
    }

    #[test]
    fn test_fitted_size_zero_width() {
        assert_eq!(fitted_size(0, 480), (600.0, 0.0));
    }

    #[test]
    fn test_describe_blink_frame() {
        let report = FrameReport {
            faces: vec![Region::new(0, 0, 100, 100)],
            eyes: vec![Region::new(20, 20, 10, 10)],
            blink: true,
            ..FrameReport::default()
        };
        assert_eq!(describe(&report), "1 face(s) \u{b7} 1 eye(s) \u{b7} blink");
    }
}
