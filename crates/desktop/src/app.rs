use std::time::Duration;

use iced::widget::{column, container, row, text};
use iced::{Element, Font, Length, Subscription, Task, Theme};
use rfd::{AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};

use maskwatch_core::capture::infrastructure::nokhwa_camera::NokhwaCamera;
use maskwatch_core::session::detection_session::{DetectionSession, SessionState, TickOutcome};

use crate::models;
use crate::settings::Settings;
use crate::theme;
use crate::widgets::control_button::{control_button, Tone};
use crate::widgets::video_view::{video_view, DisplayFrame};

const PLACEHOLDER: &str = "Press 'Start' to begin";

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Start,
    Stop,
    Quit,
}

#[derive(Debug, Clone)]
pub enum Message {
    Start,
    Stop,
    Tick(u64),
    QuitRequested,
    QuitConfirmed(bool),
    Hover(Control, bool),
    DialogClosed,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    settings: Settings,
    session: DetectionSession,
    display: Option<DisplayFrame>,
    status: String,
    hovered: Option<Control>,
    quit_pending: bool,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::default();
        let camera = NokhwaCamera::new(settings.camera_index, settings.frame_width);

        let (pipeline, status, task) = match models::load_pipeline(&settings) {
            Ok(pipeline) => (Some(pipeline), "Models loaded".to_string(), Task::none()),
            Err(e) => {
                log::error!("Model loading failed: {e}");
                (
                    None,
                    "Model loading failed".to_string(),
                    show_error(format!("Failed to load models: {e}")),
                )
            }
        };

        let session = DetectionSession::new(Box::new(camera), pipeline);
        let mut app = Self::with_session(settings, session);
        app.status = status;
        (app, task)
    }

    /// Builds the shell around an already wired session.
    pub fn with_session(settings: Settings, session: DetectionSession) -> Self {
        Self {
            settings,
            session,
            display: None,
            status: String::new(),
            hovered: None,
            quit_pending: false,
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Start => return self.start(),
            Message::Stop => {
                if self.session.stop().is_ok() {
                    self.display = None;
                    self.status = "Stopped".to_string();
                }
            }
            Message::Tick(epoch) => return self.tick(epoch),
            Message::QuitRequested => {
                if !self.quit_pending {
                    self.quit_pending = true;
                    return Task::perform(confirm_quit(), Message::QuitConfirmed);
                }
            }
            Message::QuitConfirmed(true) => {
                self.session.quit();
                self.display = None;
                return iced::exit();
            }
            Message::QuitConfirmed(false) => {
                self.quit_pending = false;
            }
            Message::Hover(control, true) => {
                self.hovered = Some(control);
            }
            Message::Hover(control, false) => {
                if self.hovered == Some(control) {
                    self.hovered = None;
                }
            }
            Message::DialogClosed => {}
        }
        Task::none()
    }

    fn start(&mut self) -> Task<Message> {
        if self.session.is_running() {
            return Task::none();
        }
        self.status = "Starting video stream...".to_string();
        match self.session.start() {
            Ok(epoch) => schedule_tick(epoch, self.settings.warmup()),
            Err(e) => {
                self.status = format!("Error: {e}");
                Task::none()
            }
        }
    }

    fn tick(&mut self, epoch: u64) -> Task<Message> {
        let outcome = self.session.tick(epoch);
        let rearm = outcome.rearm();
        match outcome {
            TickOutcome::Rendered { frame, faces } => {
                self.display = Some(DisplayFrame::from(frame));
                self.status = format!("Faces detected: {faces}");
            }
            TickOutcome::Failed(message) => {
                self.display = None;
                self.status = format!("Error: {message}");
            }
            TickOutcome::Skipped | TickOutcome::Ignored => {}
        }

        if rearm {
            schedule_tick(epoch, self.settings.tick_interval())
        } else {
            Task::none()
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let title = text("Mask Detection System").size(22).font(Font {
            weight: iced::font::Weight::Bold,
            ..Font::DEFAULT
        });

        let video = container(video_view(self.display.as_ref(), PLACEHOLDER))
            .padding(10)
            .width(Length::Fill)
            .height(Length::Fill);

        let state = self.session.state();
        let can_start = matches!(state, SessionState::Idle | SessionState::Stopped);
        let controls = row![
            control_button(
                "Start",
                Tone::Primary,
                can_start.then_some(Message::Start),
                self.hovered == Some(Control::Start),
                |h| Message::Hover(Control::Start, h),
            ),
            control_button(
                "Stop",
                Tone::Neutral,
                (state == SessionState::Running).then_some(Message::Stop),
                self.hovered == Some(Control::Stop),
                |h| Message::Hover(Control::Stop, h),
            ),
            control_button(
                "Quit",
                Tone::Danger,
                Some(Message::QuitRequested),
                self.hovered == Some(Control::Quit),
                |h| Message::Hover(Control::Quit, h),
            ),
        ]
        .spacing(20);

        let status_bar = container(text(&self.status).size(13))
            .width(Length::Fill)
            .padding([4, 8])
            .style(|theme: &Theme| container::Style {
                background: Some(theme::surface_color(theme).into()),
                text_color: Some(theme::muted_color(theme)),
                ..container::Style::default()
            });

        column![
            container(title).center_x(Length::Fill),
            video,
            container(controls).center_x(Length::Fill),
            status_bar,
        ]
        .spacing(12)
        .padding(10)
        .height(Length::Fill)
        .into()
    }

    pub fn theme(&self) -> Theme {
        theme::app_theme()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        iced::window::close_requests().map(|_| Message::QuitRequested)
    }
}

/// One-shot delayed tick. Ticks are re-armed individually so stopping only
/// has to stop issuing them.
fn schedule_tick(epoch: u64, delay: Duration) -> Task<Message> {
    Task::perform(
        async move { tokio::time::sleep(delay).await },
        move |_| Message::Tick(epoch),
    )
}

async fn confirm_quit() -> bool {
    let result = AsyncMessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title("Quit")
        .set_description("Are you sure you want to quit?")
        .set_buttons(MessageButtons::OkCancel)
        .show()
        .await;
    result == MessageDialogResult::Ok
}

fn show_error(description: String) -> Task<Message> {
    Task::perform(
        async move {
            AsyncMessageDialog::new()
                .set_level(MessageLevel::Error)
                .set_title("Error")
                .set_description(description)
                .set_buttons(MessageButtons::Ok)
                .show()
                .await
        },
        |_| Message::DialogClosed,
    )
}
