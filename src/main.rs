use std::time::Duration;

use iced::widget::{button, column, container, row, scrollable, text, text_input, Column};
use iced::{Alignment, Element, Length, Task, Theme};
use iced_aw::Wrap;
use rfd::AsyncFileDialog;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

// Declare the application modules
mod convert;
mod state;

use convert::pipeline::{RunSummary, SourceImage};
use convert::{naming, DEFAULT_TARGET_WIDTH};
use state::collection::{ImageCollection, PickedFile};

/// Shown after a fully successful run
const SUCCESS_NOTICE: &str = "✅ Images converted and saved successfully.";

/// One generic message for every failed run; the detail goes to the log
const GENERIC_ERROR: &str = "Something went wrong while saving the converted images.";

/// How long the success banner stays on screen
const NOTICE_DURATION: Duration = Duration::from_secs(5);

/// Main application state
struct WebpConverter {
    /// Images selected for the next conversion run
    collection: ImageCollection,
    /// Raw contents of the target width field (digits only)
    width_input: String,
    /// Transient success banner, cleared after `NOTICE_DURATION`
    success: Option<String>,
    /// Generic error banner, cleared when the next run starts
    error: Option<String>,
    /// True while a conversion run is in flight
    converting: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Choose images" button
    PickImages,
    /// File picker closed; empty when it was cancelled
    ImagesPicked(Vec<PickedFile>),
    /// User edited the target width field
    WidthChanged(String),
    /// User clicked "Remove" on one entry
    RemoveImage(usize),
    /// User clicked "Remove all"
    ClearAll,
    /// User clicked "Convert to WebP"
    Convert,
    /// Conversion run finished, successfully or not
    ConvertFinished(Result<RunSummary, String>),
    /// The success banner timed out
    NoticeExpired,
}

impl WebpConverter {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        (
            WebpConverter {
                collection: ImageCollection::new(),
                width_input: DEFAULT_TARGET_WIDTH.to_string(),
                success: None,
                error: None,
                converting: false,
            },
            Task::none(),
        )
    }

    /// Target width for the next run. The field only admits digits, so
    /// this falls back to 0 only for an empty or overflowing entry.
    fn target_width(&self) -> u32 {
        self.width_input.trim().parse().unwrap_or(0)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImages => Task::perform(pick_images(), Message::ImagesPicked),

            Message::ImagesPicked(files) => {
                if !files.is_empty() {
                    debug!("adding {} picked files to the collection", files.len());
                    self.error = None;
                    self.collection.add_files(files);
                }
                Task::none()
            }

            Message::WidthChanged(value) => {
                // Digits only; this is the only constraint on the width.
                self.width_input = value.chars().filter(char::is_ascii_digit).collect();
                Task::none()
            }

            Message::RemoveImage(index) => {
                self.collection.remove_at(index);
                Task::none()
            }

            Message::ClearAll => {
                self.collection.clear_all();
                Task::none()
            }

            Message::Convert => {
                if self.collection.is_empty() || self.converting {
                    return Task::none();
                }

                self.converting = true;
                self.success = None;
                self.error = None;

                // The run works on a snapshot so the collection stays
                // editable while files are being written.
                let images: Vec<SourceImage> = self
                    .collection
                    .iter()
                    .map(|entry| SourceImage {
                        file_name: entry.file_name.clone(),
                        data: entry.data.clone(),
                    })
                    .collect();
                let width = self.target_width();

                Task::perform(convert::pipeline::run(images, width), |result| {
                    Message::ConvertFinished(result.map_err(|e| e.to_string()))
                })
            }

            Message::ConvertFinished(Ok(summary)) => {
                self.converting = false;
                info!(
                    "conversion finished: {} written, {} skipped",
                    summary.written, summary.skipped
                );
                self.success = Some(SUCCESS_NOTICE.to_string());

                Task::perform(tokio::time::sleep(NOTICE_DURATION), |_| {
                    Message::NoticeExpired
                })
            }

            Message::ConvertFinished(Err(detail)) => {
                self.converting = false;
                error!("conversion run failed: {detail}");
                self.error = Some(GENERIC_ERROR.to_string());
                Task::none()
            }

            Message::NoticeExpired => {
                self.success = None;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut content: Column<Message> = column![text("WebP Converter").size(32)]
            .spacing(20)
            .padding(30);

        if let Some(notice) = &self.success {
            content = content.push(text(notice).style(text::success));
        }
        if let Some(notice) = &self.error {
            content = content.push(text(notice).style(text::danger));
        }

        content = content.push(
            button("Choose images")
                .on_press(Message::PickImages)
                .padding(10),
        );

        content = content.push(
            row![
                text("Target width (px):"),
                text_input("800", &self.width_input)
                    .on_input(Message::WidthChanged)
                    .width(100),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
        );

        if !self.collection.is_empty() {
            let clear = button("Remove all")
                .style(button::danger)
                .padding(10)
                .on_press(Message::ClearAll);
            let convert = button("Convert to WebP")
                .style(button::success)
                .padding(10)
                .on_press_maybe((!self.converting).then_some(Message::Convert));
            content = content.push(row![clear, convert].spacing(10));

            let mut previews: Vec<Element<Message>> = Vec::with_capacity(self.collection.len());
            for (index, entry) in self.collection.iter().enumerate() {
                let mut item: Column<Message> = column![].spacing(5).align_x(Alignment::Center);
                if let Some(handle) = self.collection.preview_of(entry) {
                    item = item.push(iced::widget::image(handle.clone()).width(150));
                }
                item = item.push(text(&entry.file_name).size(12));
                item = item
                    .push(button(text("Remove").size(12)).on_press(Message::RemoveImage(index)));
                previews.push(item.into());
            }
            content = content.push(
                Wrap::with_elements(previews)
                    .spacing(15.0)
                    .line_spacing(15.0),
            );
        }

        scrollable(container(content).width(Length::Fill).center_x(Length::Fill)).into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("webp_converter=info")),
        )
        .with_target(false)
        .compact()
        .init();

    info!("starting WebP Converter");

    iced::application("WebP Converter", WebpConverter::update, WebpConverter::view)
        .theme(WebpConverter::theme)
        .centered()
        .run_with(WebpConverter::new)
}

/// Show the native multi-file picker and read every chosen file fully
/// into memory. Returns an empty list when the dialog is cancelled.
async fn pick_images() -> Vec<PickedFile> {
    let Some(handles) = AsyncFileDialog::new()
        .set_title("Select images to convert")
        .add_filter("Images", naming::ACCEPTED_EXTENSIONS)
        .pick_files()
        .await
    else {
        return Vec::new();
    };

    let mut picked = Vec::with_capacity(handles.len());
    for handle in handles {
        let data = handle.read().await;
        picked.push(PickedFile {
            file_name: handle.file_name(),
            data,
        });
    }
    picked
}
