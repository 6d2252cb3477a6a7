use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && modifiers_match(pattern.modifiers, event.modifiers)
}

fn modifiers_match(pattern: KeyModifiers, event: KeyModifiers) -> bool {
    pattern.shift == event.shift && pattern.ctrl == event.ctrl && pattern.alt == event.alt
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers {
        shift: false,
        ctrl: true,
        alt: false,
    })
}

/// Key bindings for grid-level interactions.
///
/// Defaults follow the spreadsheet convention: `Ctrl+C` (or `y`) copies the
/// current selection, `Esc` clears it.
#[derive(Clone, Debug)]
pub struct GridBindings {
    pub copy: Vec<KeyEvent>,
    pub clear: Vec<KeyEvent>,
}

impl Default for GridBindings {
    fn default() -> Self {
        Self {
            copy: vec![key_ctrl('c'), key_char('y')],
            clear: vec![KeyEvent::new(KeyCode::Esc)],
        }
    }
}

impl GridBindings {
    pub fn is_copy(&self, key: &KeyEvent) -> bool {
        self.copy.iter().any(|p| key_event_matches(p, key))
    }

    pub fn is_clear(&self, key: &KeyEvent) -> bool {
        self.clear.iter().any(|p| key_event_matches(p, key))
    }
}
