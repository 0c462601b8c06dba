use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize,
}

impl AppEvent {
    /// Key releases and repeats are dropped; the quiz reacts to presses only.
    fn from_terminal(event: Event) -> Option<Self> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Resize(..) => Some(AppEvent::Resize),
            _ => None,
        }
    }
}

/// Terminal input pump. A background thread polls crossterm and sends a
/// `Tick` whenever `tick_rate` passes without input.
pub struct EventHandler {
    rx: Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let next = match event::poll(tick_rate) {
                    Ok(true) => match event::read().ok().and_then(AppEvent::from_terminal) {
                        Some(event) => event,
                        None => continue,
                    },
                    Ok(false) | Err(_) => AppEvent::Tick,
                };
                if tx.send(next).is_err() {
                    return;
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
