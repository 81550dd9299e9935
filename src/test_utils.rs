pub mod test_helpers {
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use crate::App;
    use crate::event_source::{Event, KeyCode, SimulatedEventSource};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    /// A realistic claim record with two bills and three document segments
    pub const SAMPLE_RECORD_JSON: &str = include_str!("../tests/fixtures/claim_record.json");

    /// Bytes the fake rasteriser accepts as a document
    pub const SAMPLE_PDF_BYTES: &[u8] = b"%PDF-1.7\n%fake claim document\n";

    /// Builder for creating test scenarios with simulated user input
    #[derive(Default)]
    pub struct TestScenarioBuilder {
        events: Vec<Event>,
    }

    impl TestScenarioBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a character key press
        pub fn press_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::char_key(c));
            self
        }

        /// Add a Ctrl+character key press
        pub fn press_ctrl_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::ctrl_char_key(c));
            self
        }

        pub fn press_key(mut self, code: KeyCode) -> Self {
            self.events.push(SimulatedEventSource::key(code));
            self
        }

        pub fn press_enter(self) -> Self {
            self.press_key(KeyCode::Enter)
        }

        pub fn press_tab(self) -> Self {
            self.press_key(KeyCode::Tab)
        }

        /// Type text into whatever has focus, one key per character
        pub fn type_text(mut self, text: &str) -> Self {
            self.events.extend(SimulatedEventSource::typed(text));
            self
        }

        /// Drop files onto the terminal
        pub fn paste(mut self, text: &str) -> Self {
            self.events.push(SimulatedEventSource::paste(text));
            self
        }

        pub fn click(mut self, column: u16, row: u16) -> Self {
            self.events.push(SimulatedEventSource::left_click(column, row));
            self
        }

        /// Quit the application (Ctrl+C works on every screen)
        pub fn quit(self) -> Self {
            self.press_ctrl_char('c')
        }

        pub fn build(self) -> SimulatedEventSource {
            SimulatedEventSource::new(self.events)
        }
    }

    /// Create a test terminal for snapshot testing
    pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    /// Capture the current terminal buffer as a string
    pub fn capture_terminal_state(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut lines = Vec::new();

        for y in 0..buffer.area.height {
            let mut line = String::new();
            for x in 0..buffer.area.width {
                line.push_str(buffer[(x, y)].symbol());
            }
            // Trim trailing whitespace from each line
            lines.push(line.trim_end().to_string());
        }

        lines.join("\n")
    }

    /// Write a claim document and a record into a fresh temp dir.
    /// Returns the dir (keep it alive), the document path and the record path.
    pub fn write_fixtures() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let document = dir.path().join("claim.pdf");
        let record = dir.path().join("claim.json");
        std::fs::write(&document, SAMPLE_PDF_BYTES).unwrap();
        std::fs::write(&record, SAMPLE_RECORD_JSON).unwrap();
        (dir, document, record)
    }

    /// Tick the app until `done` holds, giving up after two seconds
    pub fn settle(app: &mut App, done: impl Fn(&App) -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            app.tick();
            if done(app) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    /// Draw one frame of the app into a test terminal
    pub fn draw(app: &mut App, terminal: &mut Terminal<TestBackend>) -> String {
        terminal.draw(|f| app.draw(f)).unwrap();
        capture_terminal_state(terminal)
    }
}
