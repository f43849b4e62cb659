use chrono::{DateTime, Local};
use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, row, scrollable, text, Column};
use iced::{time, ContentFit, Element, Length, Size, Subscription, Task, Theme};
use iced_aw::Wrap;
use rfd::FileDialog;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod export;
mod preview;
mod quotes;
mod state;
mod ui;

use config::Settings;
use export::ExportReport;
use preview::Thumbnail;
use quotes::QuoteBoard;
use state::registry::CategoryId;
use state::session::{Phase, Session};

/// Main application state
struct ImageSorter {
    /// The sorting session (queue, categories, counters)
    session: Session,
    settings: Settings,
    quotes: QuoteBoard,
    /// Quote currently on the board
    quote: String,
    /// Decoded previews, by category card
    previews: HashMap<CategoryId, Handle>,
    /// Last timer tick; the status bar is computed against it
    now: DateTime<Local>,
    /// Status message to display to the user
    status: String,
    exporting: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Open Folder"
    OpenFolder,
    /// User clicked "New Category"
    NewCategory,
    /// User typed into a category's name input
    CategoryNameChanged(CategoryId, String),
    /// User clicked a category card
    CategorySelected(CategoryId),
    /// Background preview decoding finished
    PreviewReady(CategoryId, PathBuf, Result<Thumbnail, String>),
    /// User clicked "Save"
    Save,
    /// Background export finished
    ExportComplete(ExportReport),
    /// One second passed
    Tick,
    /// Time to show another quote
    RotateQuote,
}

impl ImageSorter {
    fn new() -> (Self, Task<Message>) {
        let settings_path = Settings::default_path();
        let settings = Settings::load_or_default(&settings_path);
        if !settings_path.exists() {
            // First run: leave an editable copy of the defaults behind
            if let Err(e) = settings.save(&settings_path) {
                warn!("⚠️  Could not write default settings: {}", e);
            }
        }
        let quotes = QuoteBoard::load(&settings.quotes_file);
        let quote = quotes
            .pick(&mut rand::thread_rng())
            .unwrap_or("Quote Board")
            .to_string();

        info!("🎨 Image Sorter initialized with {} quotes", quotes.len());

        (
            ImageSorter {
                session: Session::new(),
                settings,
                quotes,
                quote,
                previews: HashMap::new(),
                now: Local::now(),
                status: "Open a folder to start sorting.".to_string(),
                exporting: false,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenFolder => {
                // Show the native folder picker dialog
                let folder = FileDialog::new().set_title("Select Folder").pick_folder();

                if let Some(folder_path) = folder {
                    // A failed load leaves the current session untouched
                    match self.session.load_folder(&folder_path) {
                        Ok(count) => {
                            // Assignments were reset, so their thumbnails go too
                            self.previews.clear();
                            self.status = format!("Loaded {} images from {}", count, folder_path.display());
                        }
                        Err(e) => {
                            warn!("⚠️  Could not open {}: {}", folder_path.display(), e);
                            self.status = format!("❌ {}", e);
                        }
                    }
                }

                Task::none()
            }
            Message::NewCategory => {
                // Add an empty, unnamed card to the grid
                self.session.create_category();
                Task::none()
            }
            Message::CategoryNameChanged(id, value) => {
                // Keep the raw text; it is trimmed when the card is clicked
                if let Err(e) = self.session.set_category_name(id, value) {
                    self.status = format!("❌ {}", e);
                }
                Task::none()
            }
            Message::CategorySelected(id) => match self.session.handle_category_selected(id) {
                Ok(assignment) => {
                    // Tell the user where the image went
                    self.status = format!(
                        "{} → {}",
                        assignment.image.file_name().unwrap_or_default().to_string_lossy(),
                        assignment.category
                    );
                    if self.session.phase() == Phase::Done {
                        self.status
                            .push_str(&format!(". All {} images sorted, ready to save.", self.session.total()));
                    }

                    // First image of this card: decode its thumbnail in the background
                    if assignment.preview_set {
                        return Task::perform(
                            preview::generate_thumbnail_async(
                                assignment.image.clone(),
                                self.settings.preview_size,
                            ),
                            move |result| Message::PreviewReady(id, assignment.image.clone(), result),
                        );
                    }
                    Task::none()
                }
                Err(e) => {
                    // Blank names and the like are user mistakes, not worth a warning
                    if !e.is_validation() {
                        warn!("⚠️  Assignment failed: {}", e);
                    }
                    self.status = format!("⚠️  {}", e);
                    Task::none()
                }
            },
            Message::PreviewReady(id, path, result) => {
                // A folder reload may have cleared this card in the meantime
                let still_wanted = self
                    .session
                    .category(id)
                    .is_ok_and(|slot| slot.preview.as_ref() == Some(&path));

                match result {
                    Ok(thumbnail) if still_wanted => {
                        self.previews.insert(id, thumbnail.into_handle());
                    }
                    Ok(_) => debug!("Dropping stale preview for {}", id),
                    Err(e) => warn!("⚠️  Preview failed for {}: {}", path.display(), e),
                }
                Task::none()
            }
            Message::Save => {
                // Show the native folder picker for the export root
                let destination = FileDialog::new()
                    .set_title("Select Save Directory")
                    .pick_folder();

                if let Some(destination) = destination {
                    self.exporting = true;
                    self.status = format!("Saving to {}...", destination.display());

                    // Launch async export on a snapshot; sorting may continue meanwhile
                    return Task::perform(
                        self.session.clone().export_async(destination),
                        Message::ExportComplete,
                    );
                }

                Task::none()
            }
            Message::ExportComplete(report) => {
                // Re-enable Save and summarize the results
                self.exporting = false;
                self.status = if report.is_clean() {
                    format!(
                        "✅ Saved {} images to {}",
                        report.copied,
                        report.destination.display()
                    )
                } else {
                    format!(
                        "⚠️  Saved {} images to {}, {} failed (first: {}: {})",
                        report.copied,
                        report.destination.display(),
                        report.failures.len(),
                        report.failures[0].image.display(),
                        report.failures[0].reason
                    )
                };
                Task::none()
            }
            Message::Tick => {
                // Status bar numbers are computed against this instant
                self.now = Local::now();
                Task::none()
            }
            Message::RotateQuote => {
                if let Some(quote) = self.quotes.pick(&mut rand::thread_rng()) {
                    self.quote = quote.to_string();
                }
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let buttons = row![
            button("Open Folder")
                .on_press(Message::OpenFolder)
                .padding(10)
                .width(Length::Fill),
            button("Save")
                .on_press_maybe((!self.exporting).then_some(Message::Save))
                .padding(10)
                .width(Length::Fill),
        ]
        .spacing(10);

        let status_bar = ui::status_bar(self.session.remaining(), self.session.throughput(self.now));

        let viewer: Element<Message> = match self.session.current_image() {
            Some(path) => image(Handle::from_path(path))
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => {
                let hint = match self.session.phase() {
                    Phase::Done => "All images sorted.",
                    _ => "No image loaded.",
                };
                container(text(hint))
                    .center_x(Length::Fill)
                    .center_y(Length::Fill)
                    .into()
            }
        };

        let image_column = column![
            viewer,
            container(text(&self.quote).size(14))
                .center_x(Length::Fill)
                .max_height(50.0),
        ]
        .spacing(10)
        .width(Length::FillPortion(1));

        let cards: Vec<Element<Message>> = self
            .session
            .categories()
            .iter()
            .map(|slot| ui::category_card(slot, self.previews.get(&slot.id), self.settings.category_width))
            .collect();

        let category_column = column![
            button("New Category")
                .on_press(Message::NewCategory)
                .padding(10)
                .width(Length::Fill),
            scrollable(Wrap::with_elements(cards).spacing(10.0).line_spacing(10.0))
                .height(Length::Fill),
        ]
        .spacing(10)
        .width(Length::FillPortion(1));

        let content: Column<Message> = column![
            buttons,
            status_bar,
            row![image_column, category_column]
                .spacing(20)
                .height(Length::Fill),
            text(&self.status).size(14),
        ]
        .spacing(10)
        .padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let quote_every = Duration::from_secs(self.settings.quote_interval_secs.max(1));

        Subscription::batch([
            time::every(Duration::from_secs(1)).map(|_| Message::Tick),
            time::every(quote_every).map(|_| Message::RotateQuote),
        ])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        self.settings.theme.to_theme()
    }
}

fn main() -> iced::Result {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    iced::application("Image Sorter", ImageSorter::update, ImageSorter::view)
        .subscription(ImageSorter::subscription)
        .theme(ImageSorter::theme)
        .window_size(Size::new(1024.0, 768.0))
        .centered()
        .run_with(ImageSorter::new)
}
