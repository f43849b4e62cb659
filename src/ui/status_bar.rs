use iced::widget::{row, text};
use iced::{Element, Length};

use crate::state::throughput::{format_elapsed, Throughput};
use crate::Message;

/// The three status labels, in display order
pub fn status_labels(remaining: usize, throughput: Throughput) -> [String; 3] {
    [
        format!("Images remaining: {}", remaining),
        format!("Time elapsed: {}", format_elapsed(throughput.elapsed_secs)),
        format!("Images per minute: {:.2}", throughput.images_per_minute),
    ]
}

/// Remaining count, elapsed time and rate side by side
pub fn status_bar<'a>(remaining: usize, throughput: Throughput) -> Element<'a, Message> {
    let [remaining, elapsed, rate] = status_labels(remaining, throughput);

    row![
        text(remaining).width(Length::Fill),
        text(elapsed).width(Length::Fill),
        text(rate).width(Length::Fill),
    ]
    .spacing(10)
    .into()
}
