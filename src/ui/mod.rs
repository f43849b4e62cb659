/// View helpers for the main window
///
/// Everything here only reads session state; changes go back to the
/// session as `Message`s.

pub mod category_card;
pub mod status_bar;

pub use category_card::category_card;
pub use status_bar::status_bar;
