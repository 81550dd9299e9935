// Export modules for use in tests
pub mod claim;
pub mod document;
pub mod event_source;
pub mod format;
pub mod ingest;
pub mod inputs;
pub mod main_app;
pub mod page_sync;
pub mod panels;
pub mod panic_handler;
pub mod sections;
pub mod settings;
pub mod theme;
pub mod widget;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export main app components
pub use main_app::{App, AppAction, ReviewFocus, Screen, run_app_with_event_source};
