use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Focus
    NextField,
    PrevField,

    // Composer
    Generate,
    Analyze,
    LoadDemo,
    Copy,
    Reset,

    Quit,
}

pub struct KeyBindings {
    bindings: HashMap<KeyEvent, Action>,
}

#[derive(Debug, Clone)]
pub struct KeybindingEntry {
    pub key: String,
    pub description: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut map = HashMap::new();

        map.insert(key_code(KeyCode::Tab), Action::NextField);
        map.insert(key_code(KeyCode::BackTab), Action::PrevField);
        map.insert(shift_key_code(KeyCode::BackTab), Action::PrevField);

        map.insert(ctrl_key('g'), Action::Generate);
        map.insert(ctrl_key('a'), Action::Analyze);
        map.insert(ctrl_key('d'), Action::LoadDemo);
        map.insert(ctrl_key('y'), Action::Copy);
        map.insert(ctrl_key('r'), Action::Reset);

        map.insert(key_code(KeyCode::Esc), Action::Quit);
        map.insert(ctrl_key('c'), Action::Quit);

        Self { bindings: map }
    }

    pub fn get(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings.get(event).copied()
    }

    /// One entry per action, in help-bar order
    pub fn help_entries(&self) -> Vec<KeybindingEntry> {
        const ORDER: [Action; 8] = [
            Action::Generate,
            Action::Analyze,
            Action::LoadDemo,
            Action::Copy,
            Action::Reset,
            Action::NextField,
            Action::PrevField,
            Action::Quit,
        ];

        ORDER
            .iter()
            .filter_map(|action| {
                let mut keys: Vec<&KeyEvent> = self
                    .bindings
                    .iter()
                    .filter(|(_, a)| *a == action)
                    .map(|(k, _)| k)
                    .collect();
                keys.sort_by_key(|k| format_key_event(k));
                let key = keys.first()?;
                Some(KeybindingEntry {
                    key: format_key_event(key),
                    description: action_description(action).to_string(),
                })
            })
            .collect()
    }
}

fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn shift_key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::SHIFT)
}

/// Format a KeyEvent for display
fn format_key_event(event: &KeyEvent) -> String {
    let ctrl = if event.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_str = match event.code {
        KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        _ => format!("{:?}", event.code),
    };

    format!("{}{}", ctrl, key_str)
}

fn action_description(action: &Action) -> &'static str {
    match action {
        Action::NextField => "next",
        Action::PrevField => "prev",
        Action::Generate => "generate",
        Action::Analyze => "analyze",
        Action::LoadDemo => "demo",
        Action::Copy => "copy",
        Action::Reset => "reset",
        Action::Quit => "quit",
    }
}
