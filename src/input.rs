//! Keyboard state → per-tick intent snapshot.
//!
//! Key notifications arrive asynchronously (the host's event thread sends them
//! over a channel) and are applied in order each time the engine samples a
//! snapshot, so a release that lands between two ticks is never lost. State is
//! level-triggered: `jump == true` means the jump key is held right now; edge
//! detection is the player's job.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Semantic intent for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
}

/// Physical keys bound to each intent.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyBindings {
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub jump: Vec<KeyCode>,
    pub shoot: Vec<KeyCode>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            left: vec![KeyCode::Left, KeyCode::Char('a')],
            right: vec![KeyCode::Right, KeyCode::Char('d')],
            jump: vec![KeyCode::Char(' '), KeyCode::Up, KeyCode::Char('w')],
            shoot: vec![KeyCode::Char('z'), KeyCode::Char('j')],
        }
    }
}

/// How a held key is released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReleasePolicy {
    /// Only an explicit key-up releases a key.
    #[default]
    KeyUp,
    /// Classic terminals never report key-up; a key counts as held for this
    /// many snapshots after its last press/repeat notification. The OS repeat
    /// rate refreshes it long before it expires while the key is down.
    HoldWindow(u64),
}

#[derive(Clone, Copy, Debug)]
struct KeyState {
    pressed: bool,
    /// Snapshot counter at the last press/repeat.
    last_seen: u64,
}

pub struct InputSource {
    bindings: KeyBindings,
    policy: ReleasePolicy,
    keys: HashMap<KeyCode, KeyState>,
    listener: Option<Receiver<KeyEvent>>,
    snapshots: u64,
}

impl InputSource {
    pub fn new(bindings: KeyBindings, policy: ReleasePolicy) -> Self {
        InputSource {
            bindings,
            policy,
            keys: HashMap::new(),
            listener: None,
            snapshots: 0,
        }
    }

    /// Register a key-event listener and hand back the producer end.
    ///
    /// Only one listener is live at a time; connecting again replaces it and
    /// the old producer's sends start failing.
    pub fn connect(&mut self) -> Sender<KeyEvent> {
        let (tx, rx) = mpsc::channel();
        self.listener = Some(rx);
        tx
    }

    pub fn is_connected(&self) -> bool {
        self.listener.is_some()
    }

    pub fn set_release_policy(&mut self, policy: ReleasePolicy) {
        self.policy = policy;
    }

    pub fn key_down(&mut self, code: KeyCode) {
        self.keys.insert(
            normalize(code),
            KeyState {
                pressed: true,
                last_seen: self.snapshots,
            },
        );
    }

    pub fn key_up(&mut self, code: KeyCode) {
        if let Some(state) = self.keys.get_mut(&normalize(code)) {
            state.pressed = false;
        }
    }

    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.key_down(event.code),
            KeyEventKind::Release => self.key_up(event.code),
        }
    }

    /// Apply every queued notification, then sample the bound intents.
    pub fn snapshot(&mut self) -> GameInput {
        self.drain_listener();
        self.snapshots += 1;

        GameInput {
            left: self.any_held(&self.bindings.left),
            right: self.any_held(&self.bindings.right),
            jump: self.any_held(&self.bindings.jump),
            shoot: self.any_held(&self.bindings.shoot),
        }
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        let Some(state) = self.keys.get(&normalize(code)) else {
            return false;
        };
        if !state.pressed {
            return false;
        }
        match self.policy {
            ReleasePolicy::KeyUp => true,
            ReleasePolicy::HoldWindow(window) => {
                self.snapshots.saturating_sub(state.last_seen) <= window
            }
        }
    }

    /// Drop the listener and forget all key state. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.listener.take().is_some() {
            tracing::debug!("input listener released");
        }
        self.keys.clear();
    }

    fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|code| self.is_held(*code))
    }

    fn drain_listener(&mut self) {
        let Some(rx) = self.listener.take() else {
            return;
        };
        let mut disconnected = false;
        loop {
            match rx.try_recv() {
                Ok(event) => self.handle_key_event(&event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        if !disconnected {
            self.listener = Some(rx);
        }
    }
}

impl Default for InputSource {
    fn default() -> Self {
        InputSource::new(KeyBindings::default(), ReleasePolicy::default())
    }
}

/// Letter keys are case-insensitive (Shift or Caps Lock must not drop input).
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
