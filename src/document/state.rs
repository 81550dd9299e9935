//! Document render state machine
//!
//! `Unloaded → Loading → Ready | Error`. Navigation is honoured only in
//! `Ready` and always clamped into `[1, page_count]`.

use super::request::RenderParams;
use super::types::Viewport;
use super::zoom::{ScrollDirection, Zoom};

/// Load lifecycle of the current document
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Ready {
        page_count: usize,
    },
    Error {
        message: String,
    },
}

impl LoadState {
    pub fn page_count(&self) -> Option<usize> {
        match self {
            Self::Ready { page_count } => Some(*page_count),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Current render state for a document
#[derive(Clone, Debug)]
pub struct RenderState {
    pub load: LoadState,

    /// Displayed page (1-based)
    pub current_page: usize,

    pub zoom: Zoom,

    /// Current viewport in terminal cells
    pub viewport: Viewport,

    /// Size of the last rendered page in cells, used to bound panning
    pub content_cells: (u16, u16),
}

impl RenderState {
    #[must_use]
    pub fn new(zoom: f32) -> Self {
        Self {
            load: LoadState::Unloaded,
            current_page: 1,
            zoom: Zoom::new(zoom),
            viewport: Viewport::default(),
            content_cells: (0, 0),
        }
    }

    /// Apply a command and return resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::BeginLoad => {
                self.load = LoadState::Loading;
                self.current_page = 1;
                self.content_cells = (0, 0);
                self.zoom.reset_pan();
                vec![Effect::InvalidateDisplay]
            }

            Command::Loaded { page_count } => {
                self.load = LoadState::Ready { page_count };
                self.current_page = self.current_page.clamp(1, page_count.max(1));
                vec![Effect::RenderCurrentPage]
            }

            Command::LoadFailed(message) => {
                self.load = LoadState::Error { message };
                vec![Effect::InvalidateDisplay]
            }

            Command::GoToPage(page) => {
                let Some(page_count) = self.load.page_count() else {
                    return vec![];
                };
                let clamped = clamp_page(page, page_count);
                if clamped != self.current_page {
                    self.current_page = clamped;
                    self.zoom.reset_pan();
                    vec![Effect::RenderCurrentPage, Effect::PageChanged(clamped)]
                } else {
                    vec![]
                }
            }

            Command::NextPage => {
                let next = self.current_page as i64 + 1;
                self.apply(Command::GoToPage(next))
            }

            Command::PreviousPage => {
                let previous = self.current_page as i64 - 1;
                self.apply(Command::GoToPage(previous))
            }

            Command::ZoomIn => {
                if self.zoom.step_in() {
                    self.rerender_if_ready()
                } else {
                    vec![]
                }
            }

            Command::ZoomOut => {
                if self.zoom.step_out() {
                    self.rerender_if_ready()
                } else {
                    vec![]
                }
            }

            Command::SetViewport(viewport) => {
                if self.viewport != viewport {
                    self.viewport = viewport;
                    self.zoom.reset_pan();
                    self.rerender_if_ready()
                } else {
                    vec![]
                }
            }

            Command::Pan(direction) => {
                let max_x = self.content_cells.0.saturating_sub(self.viewport.width);
                let max_y = self.content_cells.1.saturating_sub(self.viewport.height);
                if self.zoom.pan(direction, max_x, max_y) {
                    vec![Effect::Redraw]
                } else {
                    vec![]
                }
            }
        }
    }

    fn rerender_if_ready(&self) -> Vec<Effect> {
        if self.load.is_ready() {
            vec![Effect::RenderCurrentPage]
        } else {
            vec![]
        }
    }

    pub fn can_go_previous(&self) -> bool {
        self.load.is_ready() && self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.load
            .page_count()
            .is_some_and(|count| self.current_page < count)
    }

    #[must_use]
    pub fn render_params(&self) -> RenderParams {
        RenderParams {
            viewport: self.viewport,
            scale: self.zoom.factor(),
        }
    }
}

/// Clamp a requested page into `[1, page_count]`
pub fn clamp_page(page: i64, page_count: usize) -> usize {
    let last = page_count.max(1) as i64;
    page.clamp(1, last) as usize
}

/// Commands that modify render state
#[derive(Clone, Debug)]
pub enum Command {
    BeginLoad,
    Loaded { page_count: usize },
    LoadFailed(String),
    GoToPage(i64),
    NextPage,
    PreviousPage,
    ZoomIn,
    ZoomOut,
    SetViewport(Viewport),
    Pan(ScrollDirection),
}

/// Effects produced by state changes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Drop whatever page is on screen
    InvalidateDisplay,
    /// Request a render of the current page
    RenderCurrentPage,
    /// The displayed page changed (1-based)
    PageChanged(usize),
    /// Only a repaint is needed
    Redraw,
}
