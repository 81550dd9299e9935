//! Document pane: page toolbar plus the page drawn with half-block cells

use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::document::{LoadState, PageImage, RenderService};
use crate::theme::Base16Palette;

const PREV_ARROW: &str = " ‹ ";
const NEXT_ARROW: &str = " › ";

/// Screen regions of the document pane, kept for mouse hit-testing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageViewLayout {
    pub outer: Rect,
    pub toolbar: Rect,
    pub page: Rect,
    pub prev_button: Rect,
    pub next_button: Rect,
}

impl PageViewLayout {
    pub fn new(area: Rect) -> Self {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let toolbar = Rect {
            height: inner.height.min(1),
            ..inner
        };
        let page = Rect {
            y: inner.y.saturating_add(toolbar.height),
            height: inner.height.saturating_sub(toolbar.height),
            ..inner
        };
        let arrow_width = PREV_ARROW.width() as u16;
        let prev_button = Rect {
            width: arrow_width.min(toolbar.width),
            ..toolbar
        };
        Self {
            outer: area,
            toolbar,
            page,
            prev_button,
            // Placed by `render`, which knows the label width
            next_button: Rect::default(),
        }
    }
}

/// Toolbar label between the arrows: `3 / 10`, or dashes before load
pub fn page_label(service: &RenderService) -> String {
    match service.page_count() {
        Some(total) => format!("{} / {total}", service.current_page()),
        None => "– / –".to_string(),
    }
}

pub fn render(
    f: &mut Frame,
    area: Rect,
    service: &RenderService,
    focused: bool,
    palette: &Base16Palette,
) -> PageViewLayout {
    let mut layout = PageViewLayout::new(area);
    let (text_color, border_color, bg) = palette.get_panel_colors(focused);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            format!(" {} ", service.name()),
            Style::default().fg(text_color).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    f.render_widget(block, area);

    let state = service.state();
    let enabled = Style::default().fg(palette.primary()).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(palette.muted());
    let label = format!(" {} ", page_label(service));
    let zoom = format!("   {}%", state.zoom.percent());

    layout.next_button = Rect {
        x: layout
            .toolbar
            .x
            .saturating_add((PREV_ARROW.width() + label.width()) as u16),
        width: NEXT_ARROW.width() as u16,
        ..layout.toolbar
    }
    .intersection(layout.toolbar);

    let toolbar = Line::from(vec![
        Span::styled(
            PREV_ARROW,
            if state.can_go_previous() { enabled } else { disabled },
        ),
        Span::styled(label, Style::default().fg(palette.text())),
        Span::styled(
            NEXT_ARROW,
            if state.can_go_next() { enabled } else { disabled },
        ),
        Span::styled(zoom, Style::default().fg(palette.muted())),
    ]);
    f.render_widget(Paragraph::new(toolbar), layout.toolbar);

    match service.load_state() {
        LoadState::Unloaded => message(f, layout.page, "No document", palette.muted()),
        LoadState::Loading => message(f, layout.page, "Loading document…", palette.muted()),
        LoadState::Error { message: text } => message(f, layout.page, text, palette.destructive()),
        LoadState::Ready { .. } => {
            if let Some(image) = service.displayed() {
                f.render_widget(
                    HalfBlockPage {
                        image: image.as_ref(),
                        pan_x: state.zoom.cell_pan_from_left,
                        pan_y: state.zoom.cell_pan_from_top,
                        background: bg,
                    },
                    layout.page,
                );
            } else if let Some(error) = service.render_error() {
                message(f, layout.page, error, palette.destructive());
            } else {
                message(f, layout.page, "Rendering…", palette.muted());
            }
        }
    }
    layout
}

fn message(f: &mut Frame, area: Rect, text: &str, color: Color) {
    if area.height == 0 {
        return;
    }
    let row = Rect {
        y: area.y + area.height / 2,
        height: area.height - area.height / 2,
        ..area
    };
    f.render_widget(
        Paragraph::new(Span::styled(text.to_string(), Style::default().fg(color)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        row,
    );
}

/// A rasterised page drawn two pixels per cell with `▀`: the foreground is
/// the top pixel, the background the bottom one.
pub struct HalfBlockPage<'a> {
    pub image: &'a PageImage,
    pub pan_x: u16,
    pub pan_y: u16,
    pub background: Color,
}

impl Widget for HalfBlockPage<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let pixels = &self.image.pixels;
        let (img_w, img_h) = (pixels.width(), pixels.height());
        let cells_w = self.image.width_cells();
        let cells_h = self.image.height_cells();

        // Center pages narrower or shorter than the pane
        let offset_x = area.width.saturating_sub(cells_w) / 2;
        let offset_y = area.height.saturating_sub(cells_h) / 2;

        let pixel = |x: u32, y: u32| -> Color {
            if x < img_w && y < img_h {
                let p = pixels.get_pixel(x, y);
                Color::Rgb(p[0], p[1], p[2])
            } else {
                self.background
            }
        };

        for row in 0..area.height.saturating_sub(offset_y) {
            let src_row = u32::from(row) + u32::from(self.pan_y);
            if src_row >= u32::from(cells_h) {
                break;
            }
            for col in 0..area.width.saturating_sub(offset_x) {
                let src_x = u32::from(col) + u32::from(self.pan_x);
                if src_x >= img_w {
                    break;
                }
                let top = pixel(src_x, src_row * 2);
                let bottom = pixel(src_x, src_row * 2 + 1);
                if let Some(cell) = buf.cell_mut((area.x + offset_x + col, area.y + offset_y + row)) {
                    cell.set_symbol("▀").set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn page(width: u32, height: u32) -> PageImage {
        let pixels = RgbImage::from_fn(width, height, |_, y| {
            if y % 2 == 0 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
        });
        PageImage {
            page: 1,
            scale: 1.0,
            pixels,
        }
    }

    #[test]
    fn half_blocks_pair_rows() {
        let image = page(4, 4);
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        HalfBlockPage {
            image: &image,
            pan_x: 0,
            pan_y: 0,
            background: Color::Black,
        }
        .render(area, &mut buf);
        let cell = &buf[(1, 1)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(255, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 255));
    }

    #[test]
    fn small_page_is_centered() {
        let image = page(2, 2);
        let area = Rect::new(0, 0, 6, 3);
        let mut buf = Buffer::empty(area);
        HalfBlockPage {
            image: &image,
            pan_x: 0,
            pan_y: 0,
            background: Color::Black,
        }
        .render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(2, 1)].symbol(), "▀");
        assert_eq!(buf[(3, 1)].symbol(), "▀");
        assert_eq!(buf[(4, 1)].symbol(), " ");
    }

    #[test]
    fn odd_height_pads_last_row_with_background() {
        let image = page(1, 3);
        let area = Rect::new(0, 0, 1, 2);
        let mut buf = Buffer::empty(area);
        HalfBlockPage {
            image: &image,
            pan_x: 0,
            pan_y: 0,
            background: Color::Black,
        }
        .render(area, &mut buf);
        assert_eq!(buf[(0, 1)].fg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(0, 1)].bg, Color::Black);
    }

    #[test]
    fn layout_reserves_toolbar_row() {
        let layout = PageViewLayout::new(Rect::new(0, 0, 40, 20));
        assert_eq!(layout.toolbar, Rect::new(1, 1, 38, 1));
        assert_eq!(layout.page, Rect::new(1, 2, 38, 17));
        assert_eq!(layout.prev_button.width, 3);
    }
}
