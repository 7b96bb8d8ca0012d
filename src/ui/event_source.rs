use std::{
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::{
    domain::events::{AppEvent, KeyInput, ScrollDirection},
    usecases::contracts::AppEventSource,
};

/// How long to wait for terminal input before yielding a `Tick`.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Merges terminal input with completions pushed by the backend runtime.
pub struct CrosstermEventSource {
    background: Receiver<AppEvent>,
    background_open: bool,
}

impl CrosstermEventSource {
    pub fn new(background: Receiver<AppEvent>) -> Self {
        Self {
            background,
            background_open: true,
        }
    }

    fn next_background(&mut self) -> Option<AppEvent> {
        if !self.background_open {
            return None;
        }

        match self.background.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::debug!("background event queue closed");
                self.background_open = false;
                None
            }
        }
    }
}

impl AppEventSource for CrosstermEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        if let Some(event) = self.next_background() {
            return Ok(Some(event));
        }

        if !event::poll(TICK_INTERVAL)? {
            return Ok(Some(AppEvent::Tick));
        }

        Ok(map_terminal_event(event::read()?))
    }
}

fn map_terminal_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => map_mouse(mouse),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(AppEvent::QuitRequested);
    }

    let name = match key.code {
        KeyCode::Char(ch) if ctrl => ch.to_ascii_lowercase().to_string(),
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Enter => "enter".to_owned(),
        KeyCode::Esc => "esc".to_owned(),
        KeyCode::Tab | KeyCode::BackTab => "tab".to_owned(),
        KeyCode::Backspace => "backspace".to_owned(),
        KeyCode::Delete => "delete".to_owned(),
        KeyCode::Left => "left".to_owned(),
        KeyCode::Right => "right".to_owned(),
        KeyCode::Up => "up".to_owned(),
        KeyCode::Down => "down".to_owned(),
        KeyCode::Home => "home".to_owned(),
        KeyCode::End => "end".to_owned(),
        KeyCode::PageUp => "pageup".to_owned(),
        KeyCode::PageDown => "pagedown".to_owned(),
        _ => return None,
    };

    Some(AppEvent::InputKey(KeyInput::new(name, ctrl)))
}

fn map_mouse(mouse: MouseEvent) -> Option<AppEvent> {
    match mouse.kind {
        MouseEventKind::ScrollUp => Some(AppEvent::MouseScroll(ScrollDirection::Up)),
        MouseEventKind::ScrollDown => Some(AppEvent::MouseScroll(ScrollDirection::Down)),
        _ => None,
    }
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<AppEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<AppEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl AppEventSource for MockEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        Ok(self.queue.pop_front())
    }
}
