use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use log::{debug, info, warn};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::claim::ClaimRecord;
use crate::document::{
    DocumentBackend, DocumentEvent, DocumentSource, RenderService, ScrollDirection, Viewport,
    default_backend,
};
use crate::event_source::{Event, EventSource, KeyCode, KeyEvent, KeyModifiers};
use crate::ingest::{Ingestion, paths_from_input};
use crate::inputs::KeySeq;
use crate::page_sync::PageCoordinator;
use crate::sections::{SectionId, SectionVisibility};
use crate::settings::{get_default_zoom, get_page_cache_size, is_mouse_enabled};
use crate::theme::{Base16Palette, current_theme};
use crate::widget::data_pane::{DataPane, PaneAction};
use crate::widget::help_popup::{HelpPopup, HelpPopupAction};
use crate::widget::hud_message::HudMessage;
use crate::widget::page_view::{self, PageViewLayout};
use crate::widget::upload_view::{self, PathInput, UploadLayout};

const UPLOAD_NEW_FILES: &str = "← Upload New Files [U]";
/// Lines moved per mouse wheel notch in the data pane
const WHEEL_LINES: isize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewFocus {
    Document,
    Data,
}

/// Upload screen state
#[derive(Default)]
pub struct IngestScreen {
    pub ingestion: Ingestion,
    pub input: PathInput,
    layout: UploadLayout,
}

/// One review of a confirmed document and record.
///
/// Dropping the session drops the render service, which stops its worker and
/// releases the document bytes.
pub struct ReviewSession {
    record: ClaimRecord,
    record_name: String,
    document: DocumentSource,
    service: RenderService,
    pages: PageCoordinator,
    sections: SectionVisibility,
    data_pane: DataPane,
    focus: ReviewFocus,
    key_seq: KeySeq,
    page_layout: PageViewLayout,
    upload_button: Rect,
}

/// What the app has to react to after feeding document events to a session
#[derive(Debug, Default)]
struct SessionUpdate {
    redraw: bool,
    failure: Option<String>,
}

impl SessionUpdate {
    fn redraw() -> Self {
        Self {
            redraw: true,
            failure: None,
        }
    }

    fn merge(&mut self, other: SessionUpdate) {
        self.redraw |= other.redraw;
        if other.failure.is_some() {
            self.failure = other.failure;
        }
    }
}

impl ReviewSession {
    fn new(
        document: DocumentSource,
        record_name: String,
        record: ClaimRecord,
        backend: Arc<dyn DocumentBackend>,
        zoom: f32,
        cache_size: usize,
    ) -> Self {
        let service = RenderService::open(&document, backend, zoom, cache_size);
        Self {
            record,
            record_name,
            document,
            service,
            pages: PageCoordinator::new(),
            sections: SectionVisibility::new(),
            data_pane: DataPane::new(),
            focus: ReviewFocus::Document,
            key_seq: KeySeq::new(),
            page_layout: PageViewLayout::default(),
            upload_button: Rect::default(),
        }
    }

    pub fn record(&self) -> &ClaimRecord {
        &self.record
    }

    pub fn document(&self) -> &DocumentSource {
        &self.document
    }

    pub fn service(&self) -> &RenderService {
        &self.service
    }

    pub fn pages(&self) -> &PageCoordinator {
        &self.pages
    }

    pub fn sections(&self) -> &SectionVisibility {
        &self.sections
    }

    pub fn data_pane(&self) -> &DataPane {
        &self.data_pane
    }

    pub fn focus(&self) -> ReviewFocus {
        self.focus
    }

    /// Keep the coordinator in step with what the document view reports
    fn apply_events(&mut self, events: Vec<DocumentEvent>) -> SessionUpdate {
        let mut update = SessionUpdate::default();
        for event in events {
            update.redraw = true;
            match event {
                DocumentEvent::Loaded { page_count } => self.pages.set_total_pages(page_count),
                DocumentEvent::Failed(message) => {
                    // Held requests can never be delivered
                    self.pages.reset();
                    update.failure = Some(message);
                }
                DocumentEvent::PageChanged(page) => self.pages.page_displayed(page),
                DocumentEvent::Redraw => {}
            }
        }
        update
    }

    /// Forward the newest pending page request to the document view. Requests
    /// stay pending until the document is ready.
    fn flush_pending(&mut self) -> SessionUpdate {
        if !self.service.load_state().is_ready() {
            return SessionUpdate::default();
        }
        match self.pages.take_pending() {
            Some(page) => {
                debug!("Showing page {page}");
                let events = self.service.go_to(page as i64);
                let mut update = self.apply_events(events);
                update.redraw = true;
                update
            }
            None => SessionUpdate::default(),
        }
    }

    /// Drive the document view directly (toolbar, keys), after any request
    /// from the panels has been delivered
    fn navigate(
        &mut self,
        op: impl FnOnce(&mut RenderService) -> Vec<DocumentEvent>,
    ) -> SessionUpdate {
        let mut update = self.flush_pending();
        let events = op(&mut self.service);
        update.merge(self.apply_events(events));
        update.redraw = true;
        update
    }

    fn request_page(&mut self, page: i64) -> SessionUpdate {
        self.pages.request_page(page);
        let mut update = self.flush_pending();
        update.redraw = true;
        update
    }

    fn tick(&mut self) -> SessionUpdate {
        let events = self.service.poll();
        let mut update = self.apply_events(events);
        update.merge(self.flush_pending());
        update
    }

    fn perform(&mut self, action: PaneAction) -> SessionUpdate {
        match action {
            PaneAction::ToggleSection(section) => {
                self.toggle_section(section);
                SessionUpdate::redraw()
            }
            PaneAction::JumpToPage(page) => {
                debug!("Jump to page {page} requested from the data pane");
                self.request_page(page)
            }
        }
    }

    fn toggle_section(&mut self, section: SectionId) {
        self.sections.toggle(section);
        debug!(
            "{} {}",
            section.label(),
            if self.sections.is_expanded(section) {
                "expanded"
            } else {
                "collapsed"
            }
        );
    }

    fn handle_document_key(&mut self, key: KeyEvent) -> SessionUpdate {
        if self.key_seq.push(key) {
            return SessionUpdate::default();
        }
        let update = match key.code {
            KeyCode::Char('G') => {
                let target = match self.key_seq.count() {
                    Some(count) => count.min(i64::MAX as u64) as i64,
                    None => self.service.page_count().unwrap_or(1) as i64,
                };
                self.navigate(|service| service.go_to(target))
            }
            KeyCode::Char('g') => {
                if self.key_seq.matches(&[KeyCode::Char('g'), KeyCode::Char('g')]) {
                    let target = self.key_seq.count().unwrap_or(1).min(i64::MAX as u64) as i64;
                    self.key_seq.clear();
                    return self.navigate(|service| service.go_to(target));
                }
                // Wait for the second `g`
                return SessionUpdate::default();
            }
            KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => {
                self.navigate(RenderService::next_page)
            }
            KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => {
                self.navigate(RenderService::previous_page)
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.navigate(RenderService::zoom_in),
            KeyCode::Char('-') => self.navigate(RenderService::zoom_out),
            KeyCode::Char('j') | KeyCode::Down => {
                self.navigate(|service| service.pan(ScrollDirection::Down))
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.navigate(|service| service.pan(ScrollDirection::Up))
            }
            KeyCode::Char('H') => self.navigate(|service| service.pan(ScrollDirection::Left)),
            KeyCode::Char('L') => self.navigate(|service| service.pan(ScrollDirection::Right)),
            _ => SessionUpdate::default(),
        };
        self.key_seq.clear();
        update
    }

    fn handle_data_key(&mut self, key: KeyEvent) -> SessionUpdate {
        let page = self.data_pane.inner_area().height.max(1) as isize;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.data_pane.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.data_pane.move_cursor(-1),
            KeyCode::PageDown => self.data_pane.scroll_by(page),
            KeyCode::PageUp => self.data_pane.scroll_by(-page),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.data_pane.scroll_by(page / 2)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.data_pane.scroll_by(-page / 2)
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                return match self.data_pane.activate() {
                    Some(action) => self.perform(action),
                    None => SessionUpdate::default(),
                };
            }
            KeyCode::Char(c @ '1'..='5') => {
                if let Some(section) = SectionId::from_digit(c) {
                    self.toggle_section(section);
                    self.data_pane.focus_section(section);
                }
            }
            _ => return SessionUpdate::default(),
        }
        SessionUpdate::redraw()
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> SessionUpdate {
        let (column, row) = (mouse.column, mouse.row);
        let inside = |rect: Rect| rect.contains(Position::new(column, row));
        let in_data = inside(self.data_pane.inner_area());
        let in_page = inside(self.page_layout.outer);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if inside(self.page_layout.prev_button) {
                    self.focus = ReviewFocus::Document;
                    return self.navigate(RenderService::previous_page);
                }
                if inside(self.page_layout.next_button) {
                    self.focus = ReviewFocus::Document;
                    return self.navigate(RenderService::next_page);
                }
                if in_page {
                    self.focus = ReviewFocus::Document;
                    return SessionUpdate::redraw();
                }
                if in_data {
                    self.focus = ReviewFocus::Data;
                    let mut update = match self.data_pane.click(column, row) {
                        Some(action) => self.perform(action),
                        None => SessionUpdate::default(),
                    };
                    update.redraw = true;
                    return update;
                }
                SessionUpdate::default()
            }
            MouseEventKind::ScrollDown if in_data => {
                self.data_pane.scroll_by(WHEEL_LINES);
                SessionUpdate::redraw()
            }
            MouseEventKind::ScrollUp if in_data => {
                self.data_pane.scroll_by(-WHEEL_LINES);
                SessionUpdate::redraw()
            }
            MouseEventKind::ScrollDown if in_page => {
                self.navigate(|service| service.pan(ScrollDirection::Down))
            }
            MouseEventKind::ScrollUp if in_page => {
                self.navigate(|service| service.pan(ScrollDirection::Up))
            }
            _ => SessionUpdate::default(),
        }
    }

    /// Page the panels mark as on screen; none until the page count is known
    fn highlighted_page(&self) -> usize {
        self.pages
            .total_pages()
            .map_or(0, |_| self.pages.current_page())
    }

    fn draw(&mut self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        let [header, body, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .areas(area);
        let [document_area, data_area] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(body);

        self.draw_header(f, header, palette);

        let viewport = Viewport::from_rect(PageViewLayout::new(document_area).page);
        let events = self.service.set_viewport(viewport);
        let _ = self.apply_events(events);
        self.page_layout = page_view::render(
            f,
            document_area,
            &self.service,
            self.focus == ReviewFocus::Document,
            palette,
        );
        self.data_pane.render(
            f,
            data_area,
            &self.record,
            &self.sections,
            self.highlighted_page(),
            self.focus == ReviewFocus::Data,
            palette,
        );

        let hints = match self.focus {
            ReviewFocus::Document => {
                " h/l page  <n>G go to  +/- zoom  j/k pan  Tab data  U upload  ? help  q quit"
            }
            ReviewFocus::Data => {
                " j/k move  Enter open  1-5 sections  PgUp/PgDn scroll  Tab document  ? help"
            }
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                hints,
                Style::default().fg(palette.muted()),
            ))),
            footer,
        );
    }

    fn draw_header(&mut self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        let button_width = (UPLOAD_NEW_FILES.width() as u16).min(area.width);
        self.upload_button = Rect {
            x: area.x + area.width - button_width,
            width: button_width,
            ..area
        };
        let title_area = Rect {
            width: area.width - button_width,
            ..area
        };

        let mut spans = vec![
            Span::styled(
                " Claims Review ",
                Style::default()
                    .fg(palette.text())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("#{}", self.record.claim_id),
                Style::default().fg(palette.primary()),
            ),
        ];
        if !self.record.review_notes.trim().is_empty() {
            spans.push(Span::styled(
                format!("  {}", self.record.review_notes),
                Style::default().fg(palette.muted()),
            ));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), title_area);
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                UPLOAD_NEW_FILES,
                Style::default().fg(palette.primary()),
            ))),
            self.upload_button,
        );
    }
}

pub enum Screen {
    Ingest(IngestScreen),
    Review(Box<ReviewSession>),
}

pub struct App {
    screen: Screen,
    backend: Arc<dyn DocumentBackend>,
    help: Option<HelpPopup>,
    help_keys: KeySeq,
    hud: Option<HudMessage>,
    zoom: f32,
    cache_size: usize,
    /// Start the review as soon as both files are in
    auto_start: bool,
    mouse: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self::with_backend(default_backend())
    }

    /// App with an injected rasteriser; settings come from the loaded config
    pub fn with_backend(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            screen: Screen::Ingest(IngestScreen::default()),
            backend,
            help: None,
            help_keys: KeySeq::new(),
            hud: None,
            zoom: get_default_zoom(),
            cache_size: get_page_cache_size(),
            auto_start: false,
            mouse: is_mouse_enabled(),
        }
    }

    /// Submit files given on the command line
    pub fn add_paths(&mut self, paths: &[PathBuf]) {
        if let Screen::Ingest(screen) = &mut self.screen {
            screen.ingestion.handle_paths(paths);
        }
    }

    pub fn set_auto_start(&mut self, auto_start: bool) {
        self.auto_start = auto_start;
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn ingestion(&self) -> Option<&Ingestion> {
        match &self.screen {
            Screen::Ingest(screen) => Some(&screen.ingestion),
            Screen::Review(_) => None,
        }
    }

    pub fn session(&self) -> Option<&ReviewSession> {
        match &self.screen {
            Screen::Review(session) => Some(session.as_ref()),
            Screen::Ingest(_) => None,
        }
    }

    pub fn hud(&self) -> Option<&HudMessage> {
        self.hud.as_ref()
    }

    pub fn is_help_open(&self) -> bool {
        self.help.is_some()
    }

    pub fn handle_event(&mut self, event: &Event) -> Option<AppAction> {
        match event {
            Event::Key(key) if key.kind == crossterm::event::KeyEventKind::Press => {
                self.handle_key(*key)
            }
            Event::Paste(text) => {
                self.handle_paste(text);
                None
            }
            Event::Mouse(mouse) if self.mouse => {
                self.handle_mouse(*mouse);
                None
            }
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppAction::Quit);
        }

        if let Some(help) = &mut self.help {
            let close = matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q'))
                || help.handle_key(key, &mut self.help_keys) == Some(HelpPopupAction::Close);
            if close {
                self.help = None;
                self.help_keys.clear();
            }
            return None;
        }

        if matches!(self.screen, Screen::Ingest(_)) {
            self.handle_ingest_key(key)
        } else {
            self.handle_review_key(key)
        }
    }

    fn handle_ingest_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        let Screen::Ingest(screen) = &mut self.screen else {
            return None;
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Some(AppAction::Quit),
            KeyCode::Char('?') if screen.input.is_empty() => self.help = Some(HelpPopup::new()),
            KeyCode::Char('d') if ctrl => {
                screen.ingestion.remove_document();
            }
            KeyCode::Char('r') if ctrl => {
                screen.ingestion.remove_record();
            }
            KeyCode::Char(c) if !ctrl => screen.input.insert(c),
            KeyCode::Backspace => screen.input.backspace(),
            KeyCode::Delete => screen.input.delete(),
            KeyCode::Left => screen.input.left(),
            KeyCode::Right => screen.input.right(),
            KeyCode::Home => screen.input.home(),
            KeyCode::End => screen.input.end(),
            KeyCode::Enter => {
                if screen.input.is_empty() {
                    self.start_review();
                } else {
                    let text = screen.input.take();
                    screen.ingestion.handle_paths(paths_from_input(&text));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_review_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        let Screen::Review(session) = &mut self.screen else {
            return None;
        };
        let update = match key.code {
            KeyCode::Char('q') => return Some(AppAction::Quit),
            KeyCode::Char('?') => {
                self.help = Some(HelpPopup::new());
                return None;
            }
            KeyCode::Char('U') => {
                self.reset_session();
                return None;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                session.key_seq.clear();
                session.focus = match session.focus {
                    ReviewFocus::Document => ReviewFocus::Data,
                    ReviewFocus::Data => ReviewFocus::Document,
                };
                return None;
            }
            KeyCode::Esc => {
                session.key_seq.clear();
                return None;
            }
            _ => match session.focus {
                ReviewFocus::Document => session.handle_document_key(key),
                ReviewFocus::Data => session.handle_data_key(key),
            },
        };
        self.apply_update(update);
        None
    }

    pub fn handle_paste(&mut self, text: &str) {
        match &mut self.screen {
            Screen::Ingest(screen) => {
                let paths = paths_from_input(text);
                if paths.is_empty() {
                    return;
                }
                debug!("Received {} dropped path(s)", paths.len());
                screen.ingestion.handle_paths(paths);
            }
            Screen::Review(_) => {
                debug!("Ignoring paste outside the upload screen");
            }
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.help.is_some() {
            if matches!(mouse.kind, MouseEventKind::Down(_)) {
                self.help = None;
            }
            return;
        }
        let point = Position::new(mouse.column, mouse.row);
        let left_click = mouse.kind == MouseEventKind::Down(MouseButton::Left);
        match &mut self.screen {
            Screen::Ingest(screen) => {
                if !left_click {
                    return;
                }
                let layout = screen.layout;
                if layout.start_button.contains(point) {
                    self.start_review();
                } else if layout.remove_document.is_some_and(|r| r.contains(point)) {
                    screen.ingestion.remove_document();
                } else if layout.remove_record.is_some_and(|r| r.contains(point)) {
                    screen.ingestion.remove_record();
                }
            }
            Screen::Review(session) => {
                if left_click && session.upload_button.contains(point) {
                    self.reset_session();
                    return;
                }
                let update = session.handle_mouse(mouse);
                self.apply_update(update);
            }
        }
    }

    fn apply_update(&mut self, update: SessionUpdate) -> bool {
        if let Some(message) = update.failure {
            self.hud = Some(HudMessage::error(message));
        }
        update.redraw
    }

    /// Leave the upload screen once both files are in. Returns false if
    /// something is still missing.
    pub fn start_review(&mut self) -> bool {
        let Screen::Ingest(screen) = &mut self.screen else {
            return false;
        };
        let Some((document, pending)) = screen.ingestion.confirm() else {
            debug!("Start requested before both files were uploaded");
            return false;
        };
        info!(
            "Starting review of claim {} ({} + {})",
            pending.record.claim_id,
            document.name(),
            pending.name
        );
        let session = ReviewSession::new(
            document,
            pending.name,
            pending.record,
            self.backend.clone(),
            self.zoom,
            self.cache_size,
        );
        self.screen = Screen::Review(Box::new(session));
        self.auto_start = false;
        true
    }

    /// Drop the review and go back to an empty upload screen
    pub fn reset_session(&mut self) {
        if let Screen::Review(session) = &self.screen {
            info!(
                "Closing review of {} and {}",
                session.document.name(),
                session.record_name
            );
        }
        self.screen = Screen::Ingest(IngestScreen::default());
        self.hud = None;
    }

    /// Background work: finished record reads, rendered pages, page requests
    /// waiting for the document, HUD expiry. Returns true if a redraw is due.
    pub fn tick(&mut self) -> bool {
        let mut redraw = false;
        match &mut self.screen {
            Screen::Ingest(screen) => {
                redraw |= screen.ingestion.poll();
                if self.auto_start && screen.ingestion.can_proceed() {
                    redraw |= self.start_review();
                }
            }
            Screen::Review(session) => {
                let update = session.tick();
                redraw |= self.apply_update(update);
            }
        }
        if self.hud.as_ref().is_some_and(HudMessage::is_expired) {
            self.hud = None;
            redraw = true;
        }
        redraw
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let palette = current_theme();
        let area = f.area();
        f.render_widget(
            Block::default().style(Style::default().bg(palette.base_00)),
            area,
        );

        match &mut self.screen {
            Screen::Ingest(screen) => {
                screen.layout =
                    upload_view::render(f, area, &screen.ingestion, &screen.input, palette);
            }
            Screen::Review(session) => session.draw(f, area, palette),
        }

        if let Some(hud) = &self.hud {
            if area.height > 2 {
                let hud_area = Rect {
                    y: area.y + area.height - 2,
                    height: 1,
                    ..area
                };
                f.render_widget(Paragraph::new(hud.styled_line(palette)), hud_area);
            }
        }

        if let Some(help) = &mut self.help {
            help.render(f, area);
        }
    }
}

/// Run the event loop until the user quits
pub fn run_app_with_event_source<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(50);
    let mut last_tick = Instant::now();
    let mut first_render = true;

    loop {
        let mut events_processed = 0;
        let mut should_quit = false;

        // Drain queued events before drawing, so a burst of keys or a large
        // paste costs one frame
        while events_processed < 50 && event_source.poll(Duration::from_millis(0))? {
            let event = event_source.read()?;
            events_processed += 1;
            if app.handle_event(&event) == Some(AppAction::Quit) {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            info!("Quitting");
            return Ok(());
        }

        let mut needs_redraw = events_processed > 0 || first_render;
        if last_tick.elapsed() >= tick_rate {
            needs_redraw |= app.tick();
            last_tick = Instant::now();
        }

        if needs_redraw {
            if let Err(e) = terminal.draw(|f| app.draw(f)) {
                warn!("Draw failed: {e}");
                return Err(e.into());
            }
            first_render = false;
        }

        // If no events were processed, wait a bit to avoid busy-waiting
        if events_processed == 0 {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_secs(0));
            let _ = event_source.poll(timeout)?;
        }
    }
}
