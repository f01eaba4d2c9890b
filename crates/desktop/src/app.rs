use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Element, Length, Subscription, Task, Theme};

use smileblink_core::pipeline::detect_and_annotate_use_case::FrameReport;
use smileblink_core::pipeline::stop_signal::StopSignal;
use smileblink_core::shared::detection_mode::DetectionMode;
use smileblink_core::shared::frame::Frame;
use smileblink_core::video::domain::image_writer::ImageWriter;
use smileblink_core::video::infrastructure::display_encoder::to_rgba;
use smileblink_core::video::infrastructure::image_file_writer::ImageFileWriter;

use crate::settings::{Appearance, Settings};
use crate::tabs;
use crate::tabs::camera_tab::{CameraState, CameraView};
use crate::theme;
use crate::workers::capture_worker::{self, CaptureMessage, CaptureParams};
use crate::workers::classifier_loader::{self, LoadedDetection};

/// How often the UI drains frames from the capture thread.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

// ---------------------------------------------------------------------------
// Tab enum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Camera,
    Settings,
}

impl Tab {
    const ALL: &[Tab] = &[Tab::Camera, Tab::Settings];

    fn label(self) -> &'static str {
        match self {
            Tab::Camera => "Camera",
            Tab::Settings => "Settings",
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    ModeToggled(DetectionMode, bool),
    /// Result of loading a mode's cascades from the given folder.
    ClassifiersLoaded(DetectionMode, PathBuf, Result<LoadedDetection, String>),
    ToggleCamera,
    PollCapture,
    SaveSnapshot,
    SnapshotPathSelected(Option<PathBuf>),
    CameraIndexChanged(i32),
    FrameIntervalChanged(u32),
    SelectCascadeDir,
    CascadeDirSelected(Option<PathBuf>),
    RestoreDefaults,
    AppearanceChanged(Appearance),
    PollSystemTheme,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    Info(String),
    Error(String),
}

/// A running capture thread. Kept until the thread reports `Stopped`, so the
/// camera is released before the controls unlock.
struct CaptureSession {
    rx: Receiver<CaptureMessage>,
    stop: Arc<StopSignal>,
    stopping: bool,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    active_tab: Tab,
    pub settings: Settings,
    settings_path: Option<PathBuf>,
    theme: Theme,
    mode: Option<DetectionMode>,
    loaded: HashMap<DetectionMode, LoadedDetection>,
    session: Option<CaptureSession>,
    frame: Option<Frame>,
    frame_handle: Option<image::Handle>,
    report: Option<FrameReport>,
    pending_snapshot: Option<Frame>,
    status: Status,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings_path = Settings::config_path();
        let settings = settings_path
            .as_deref()
            .map(Settings::load_from)
            .unwrap_or_default();
        Self::with_settings(settings, settings_path)
    }

    /// Builds the app around `settings`, persisting changes to
    /// `settings_path` when one is given.
    pub fn with_settings(settings: Settings, settings_path: Option<PathBuf>) -> (Self, Task<Message>) {
        let mut app = Self {
            active_tab: Tab::Camera,
            mode: settings.last_mode,
            theme: theme::resolve_theme(settings.appearance),
            settings,
            settings_path,
            loaded: HashMap::new(),
            session: None,
            frame: None,
            frame_handle: None,
            report: None,
            pending_snapshot: None,
            status: Status::Idle,
        };
        let task = match app.mode {
            Some(mode) => app.load_classifiers(mode),
            None => Task::none(),
        };
        (app, task)
    }

    fn camera_state(&self) -> CameraState {
        match &self.session {
            None => CameraState::Idle,
            Some(session) if session.stopping => CameraState::Stopping,
            Some(_) => CameraState::Running,
        }
    }

    /// Start is only offered once the selected mode's cascades are loaded.
    fn ready_detection(&self) -> Option<&LoadedDetection> {
        self.mode.and_then(|mode| self.loaded.get(&mode))
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.active_tab = tab;
            }
            Message::ModeToggled(mode, checked) => {
                if self.session.is_some() {
                    return Task::none();
                }
                if checked {
                    self.mode = Some(mode);
                } else if self.mode == Some(mode) {
                    self.mode = None;
                    self.status = Status::Idle;
                }
                self.settings.last_mode = self.mode;
                self.save_settings();
                if checked {
                    return self.load_classifiers(mode);
                }
            }
            Message::ClassifiersLoaded(mode, cascade_dir, result) => {
                if cascade_dir != self.settings.cascade_dir {
                    return Task::none();
                }
                let selected = self.mode == Some(mode);
                match result {
                    Ok(detection) => {
                        self.loaded.insert(mode, detection);
                        if selected {
                            self.status = Status::Info(format!("{mode} classifiers ready"));
                        }
                    }
                    Err(e) => {
                        if selected {
                            self.status = Status::Error(e);
                        }
                    }
                }
            }
            Message::ToggleCamera => match self.camera_state() {
                CameraState::Idle => self.start_camera(),
                CameraState::Running => self.stop_camera(),
                CameraState::Stopping => {}
            },
            Message::PollCapture => self.drain_capture(),
            Message::SaveSnapshot => {
                let Some(frame) = self.frame.clone() else {
                    return Task::none();
                };
                self.pending_snapshot = Some(frame);
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Save snapshot")
                            .add_filter("PNG Image", &["png"])
                            .set_file_name("snapshot.png")
                            .save_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::SnapshotPathSelected,
                );
            }
            Message::SnapshotPathSelected(Some(path)) => {
                if let Some(frame) = self.pending_snapshot.take() {
                    self.status = match ImageFileWriter::new().write(&path, &frame) {
                        Ok(()) => Status::Info(format!("Snapshot saved to {}", path.display())),
                        Err(e) => {
                            log::error!("Snapshot failed: {e}");
                            Status::Error(format!("Could not save snapshot: {e}"))
                        }
                    };
                }
            }
            Message::SnapshotPathSelected(None) => {
                self.pending_snapshot = None;
            }
            Message::CameraIndexChanged(index) => {
                self.settings.camera_index = index;
                self.save_settings();
            }
            Message::FrameIntervalChanged(ms) => {
                self.settings.frame_interval_ms = u64::from(ms.max(1));
                self.save_settings();
            }
            Message::SelectCascadeDir => {
                let start_dir = self.settings.cascade_dir.clone();
                return Task::perform(
                    async move {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select classifier folder")
                            .set_directory(start_dir)
                            .pick_folder()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::CascadeDirSelected,
                );
            }
            Message::CascadeDirSelected(Some(dir)) => return self.set_cascade_dir(dir),
            Message::CascadeDirSelected(None) => {}
            Message::RestoreDefaults => {
                let defaults = Settings::default();
                self.settings.camera_index = defaults.camera_index;
                self.settings.frame_interval_ms = defaults.frame_interval_ms;
                return self.set_cascade_dir(defaults.cascade_dir);
            }
            Message::AppearanceChanged(appearance) => {
                self.settings.appearance = appearance;
                self.theme = theme::resolve_theme(appearance);
                self.save_settings();
            }
            Message::PollSystemTheme => {
                self.theme = theme::resolve_theme(self.settings.appearance);
            }
        }
        Task::none()
    }

    fn save_settings(&self) {
        if let Some(path) = &self.settings_path {
            self.settings.save_to(path);
        }
    }

    fn load_classifiers(&mut self, mode: DetectionMode) -> Task<Message> {
        if self.loaded.contains_key(&mode) {
            self.status = Status::Info(format!("{mode} classifiers ready"));
            return Task::none();
        }
        self.status = Status::Info(format!("Loading {mode} classifiers\u{2026}"));
        let cascade_dir = self.settings.cascade_dir.clone();
        Task::perform(
            classifier_loader::load(mode, cascade_dir.clone()),
            move |result| Message::ClassifiersLoaded(mode, cascade_dir.clone(), result),
        )
    }

    /// Loaded cascades came from the old folder, so they are dropped and the
    /// selected mode reloads.
    fn set_cascade_dir(&mut self, dir: PathBuf) -> Task<Message> {
        let changed = dir != self.settings.cascade_dir;
        self.settings.cascade_dir = dir;
        self.save_settings();
        if !changed {
            return Task::none();
        }
        self.loaded.clear();
        match self.mode {
            Some(mode) => self.load_classifiers(mode),
            None => Task::none(),
        }
    }

    fn start_camera(&mut self) {
        let Some(mode) = self.mode else {
            self.status = Status::Error("Please select a detection mode first.".into());
            return;
        };
        let Some(detection) = self.ready_detection().cloned() else {
            self.status = Status::Error(format!("{mode} classifiers are not loaded yet."));
            return;
        };

        log::info!("Starting camera {} in {mode} mode", self.settings.camera_index);
        let (rx, stop) = capture_worker::spawn(CaptureParams {
            detection,
            camera_index: self.settings.camera_index,
            frame_interval: Duration::from_millis(self.settings.frame_interval_ms.max(1)),
        });
        self.session = Some(CaptureSession {
            rx,
            stop,
            stopping: false,
        });
        self.status = Status::Info(format!("Camera running: {mode}"));
    }

    fn stop_camera(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.stop.stop();
            session.stopping = true;
        }
        self.clear_frame();
        self.status = Status::Info("Stopping camera\u{2026}".into());
    }

    fn clear_frame(&mut self) {
        self.frame = None;
        self.frame_handle = None;
        self.report = None;
    }

    fn drain_capture(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let stopping = session.stopping;
        let messages: Vec<CaptureMessage> = session.rx.try_iter().collect();

        let mut latest = None;
        for message in messages {
            match message {
                CaptureMessage::Frame(frame, report) => {
                    if !stopping {
                        latest = Some((frame, report));
                    }
                }
                CaptureMessage::Error(e) => {
                    self.status = Status::Error(e);
                }
                CaptureMessage::Stopped => {
                    self.session = None;
                    self.clear_frame();
                    if !matches!(self.status, Status::Error(_)) {
                        self.status = Status::Idle;
                    }
                    return;
                }
            }
        }

        if let Some((frame, report)) = latest {
            self.frame_handle = Some(image::Handle::from_rgba(
                frame.width(),
                frame.height(),
                to_rgba(&frame),
            ));
            self.frame = Some(frame);
            self.report = Some(report);
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let tab_bar = row(Tab::ALL
            .iter()
            .map(|&tab| {
                let btn = button(text(tab.label()).size(13))
                    .on_press(Message::TabSelected(tab))
                    .padding([6, 14]);
                if tab == self.active_tab {
                    btn.style(button::primary).into()
                } else {
                    btn.style(button::text).into()
                }
            })
            .collect::<Vec<_>>())
        .spacing(2);

        let content: Element<'_, Message> = match self.active_tab {
            Tab::Camera => tabs::camera_tab::view(
                CameraView {
                    mode: self.mode,
                    state: self.camera_state(),
                    ready: self.ready_detection().is_some(),
                    frame: self.frame_handle.as_ref(),
                    frame_size: self
                        .frame
                        .as_ref()
                        .map(|f| (f.width(), f.height()))
                        .unwrap_or_default(),
                    report: self.report.as_ref(),
                    status: &self.status,
                },
                &self.theme,
            ),
            Tab::Settings => {
                tabs::settings_tab::view(&self.settings, self.session.is_some())
            }
        };

        let tab_content = container(scrollable(content).height(Length::Fill))
            .padding(16)
            .height(Length::Fill);

        column![tab_bar, tab_content]
            .spacing(0)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let capture = if self.session.is_some() {
            iced::time::every(POLL_INTERVAL).map(|_| Message::PollCapture)
        } else {
            Subscription::none()
        };
        let system_theme = if self.settings.appearance == Appearance::System {
            iced::time::every(Duration::from_secs(2)).map(|_| Message::PollSystemTheme)
        } else {
            Subscription::none()
        };
        Subscription::batch([capture, system_theme])
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            session.stop.stop();
        }
    }
}
