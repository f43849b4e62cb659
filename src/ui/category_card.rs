use iced::widget::image::Handle;
use iced::widget::{column, container, image, mouse_area, text, text_input};
use iced::{ContentFit, Element, Length};

use crate::state::registry::CategorySlot;
use crate::Message;

/// One category card: a clickable frame (preview or "Assign") above
/// the name input.
pub fn category_card<'a>(
    slot: &'a CategorySlot,
    preview: Option<&'a Handle>,
    width: f32,
) -> Element<'a, Message> {
    let id = slot.id;
    let face_height = Length::Fixed(width * 0.75);

    let face: Element<'a, Message> = match preview {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(face_height)
            .into(),
        // Path known but the thumbnail is still decoding (or failed)
        None if slot.preview.is_some() => container(text("…").size(16))
            .center_x(Length::Fill)
            .center_y(face_height)
            .into(),
        None => container(text("Assign").size(16))
            .center_x(Length::Fill)
            .center_y(face_height)
            .into(),
    };

    let frame = mouse_area(
        container(face)
            .padding(4)
            .width(Length::Fill)
            .style(container::bordered_box),
    )
    .on_press(Message::CategorySelected(id));

    column![
        frame,
        text_input("Write category name here...", &slot.name_input)
            .on_input(move |value| Message::CategoryNameChanged(id, value))
            .padding(5),
    ]
    .spacing(5)
    .width(Length::Fixed(width))
    .into()
}
