pub mod data_pane;
pub mod help_popup;
pub mod hud_message;
pub mod page_view;
pub mod upload_view;
