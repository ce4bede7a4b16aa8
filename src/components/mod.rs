//! UI components.

pub mod sticker_field;
