use anyhow::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
pub use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

/// Trait for abstracting event sources to enable testing
pub trait EventSource {
    /// Poll for events with a timeout
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Read the next event
    fn read(&mut self) -> Result<Event>;
}

/// Real terminal event source using crossterm
pub struct KeyboardEventSource;

impl EventSource for KeyboardEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(crossterm::event::poll(timeout)?)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(crossterm::event::read()?)
    }
}

/// Simulated event source for testing
pub struct SimulatedEventSource {
    pub(crate) events: Vec<Event>,
    current_index: usize,
}

impl SimulatedEventSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events,
            current_index: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.events.len() - self.current_index
    }

    /// Helper method to create a key event
    pub fn key_event(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: crossterm::event::KeyEventKind::Press,
            state: crossterm::event::KeyEventState::empty(),
        })
    }

    pub fn key(code: KeyCode) -> Event {
        Self::key_event(code, KeyModifiers::empty())
    }

    /// Helper method to create a simple character key event
    pub fn char_key(c: char) -> Event {
        Self::key_event(KeyCode::Char(c), KeyModifiers::empty())
    }

    /// Helper method to create a Ctrl+char key event
    pub fn ctrl_char_key(c: char) -> Event {
        Self::key_event(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// One key event per character
    pub fn typed(text: &str) -> Vec<Event> {
        text.chars().map(Self::char_key).collect()
    }

    /// Bracketed paste, which is how terminals deliver dropped files
    pub fn paste(text: &str) -> Event {
        Event::Paste(text.to_string())
    }

    pub fn left_click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::empty(),
        })
    }
}

impl EventSource for SimulatedEventSource {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(self.current_index < self.events.len())
    }

    fn read(&mut self) -> Result<Event> {
        if self.current_index < self.events.len() {
            let event = self.events[self.current_index].clone();
            self.current_index += 1;
            Ok(event)
        } else {
            // Quit once all events are consumed
            Ok(SimulatedEventSource::ctrl_char_key('c'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_event_source() {
        let mut events = SimulatedEventSource::typed("jk");
        events.push(SimulatedEventSource::paste("/tmp/claim.pdf"));
        let mut source = SimulatedEventSource::new(events);

        assert!(source.poll(Duration::from_millis(0)).unwrap());
        assert_eq!(source.remaining(), 3);

        if let Event::Key(key) = source.read().unwrap() {
            assert_eq!(key.code, KeyCode::Char('j'));
            assert!(key.modifiers.is_empty());
        }
        if let Event::Key(key) = source.read().unwrap() {
            assert_eq!(key.code, KeyCode::Char('k'));
        }
        assert_eq!(
            source.read().unwrap(),
            Event::Paste("/tmp/claim.pdf".to_string())
        );

        assert!(!source.poll(Duration::from_millis(0)).unwrap());
        match source.read().unwrap() {
            Event::Key(key) => {
                assert_eq!(key.code, KeyCode::Char('c'));
                assert!(key.modifiers.contains(KeyModifiers::CONTROL));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
