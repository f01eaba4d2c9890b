use iced::widget::{button, column, pick_list, row, slider, text, Space};
use iced::{Alignment, Element};

use crate::app::Message;
use crate::settings::{Appearance, Settings};

const CAMERA_INDICES: &[i32] = &[0, 1, 2, 3, 4];

pub fn view<'a>(settings: &Settings, running: bool) -> Element<'a, Message> {
    let camera = row![
        text("Camera").size(13),
        pick_list(CAMERA_INDICES, Some(settings.camera_index), Message::CameraIndexChanged)
            .text_size(13),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let interval = row![
        text("Frame interval").size(13),
        slider(
            15..=200,
            settings.frame_interval_ms.clamp(15, 200) as u32,
            Message::FrameIntervalChanged
        )
        .step(1u32),
        text(format!("{} ms", settings.frame_interval_ms)).size(13),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let cascades = row![
        text("Classifier folder").size(13),
        text(settings.cascade_dir.display().to_string()).size(13),
        button(text("Choose\u{2026}").size(13))
            .on_press(Message::SelectCascadeDir)
            .style(button::secondary),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let appearance = row![
        text("Appearance").size(13),
        pick_list(Appearance::ALL, Some(settings.appearance), Message::AppearanceChanged)
            .text_size(13),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let hint = if running {
        "Camera changes apply the next time the camera starts."
    } else {
        "Classifiers missing from the folder are looked up in the OpenCV data directory, then downloaded."
    };

    column![
        text("Capture").size(16),
        Space::new().height(8),
        camera,
        interval,
        cascades,
        Space::new().height(20),
        text("Appearance").size(16),
        Space::new().height(8),
        appearance,
        Space::new().height(20),
        text(hint).size(12),
        Space::new().height(12),
        button(text("Restore Defaults").size(13))
            .on_press(Message::RestoreDefaults)
            .style(button::secondary),
    ]
    .spacing(8)
    .into()
}
