pub mod annotations;
pub mod color_picker;
pub mod menu_bar;
pub mod overlay_menu;
pub mod scale_bar;
pub mod title;
pub mod viewport;
