use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::keybindings::{Action, KeyBindings};

pub enum InputResult {
    Continue,
    Quit,
    Action(Action),
    Char(char),
    Paste(String),
    Backspace,
}

pub fn handle_input(event: Event, bindings: &KeyBindings) -> InputResult {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key(key_event, bindings)
        }
        Event::Paste(text) => InputResult::Paste(text.replace("\r\n", "\n")),
        _ => InputResult::Continue,
    }
}

fn handle_key(key: KeyEvent, bindings: &KeyBindings) -> InputResult {
    if let Some(action) = bindings.get(&key) {
        if action == Action::Quit {
            return InputResult::Quit;
        }
        return InputResult::Action(action);
    }

    // Unbound control chords are ignored rather than typed
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return InputResult::Continue;
    }

    match key.code {
        KeyCode::Char(c) => InputResult::Char(c),
        KeyCode::Backspace => InputResult::Backspace,
        KeyCode::Enter => InputResult::Char('\n'),
        _ => InputResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_plain_keys_become_text() {
        let bindings = KeyBindings::new();
        assert!(matches!(
            handle_input(press(KeyCode::Char('x'), KeyModifiers::NONE), &bindings),
            InputResult::Char('x')
        ));
        assert!(matches!(
            handle_input(press(KeyCode::Char('X'), KeyModifiers::SHIFT), &bindings),
            InputResult::Char('X')
        ));
        assert!(matches!(
            handle_input(press(KeyCode::Enter, KeyModifiers::NONE), &bindings),
            InputResult::Char('\n')
        ));
        assert!(matches!(
            handle_input(press(KeyCode::Backspace, KeyModifiers::NONE), &bindings),
            InputResult::Backspace
        ));
    }

    #[test]
    fn test_bound_chords_become_actions() {
        let bindings = KeyBindings::new();
        assert!(matches!(
            handle_input(press(KeyCode::Char('g'), KeyModifiers::CONTROL), &bindings),
            InputResult::Action(Action::Generate)
        ));
        assert!(matches!(
            handle_input(press(KeyCode::Esc, KeyModifiers::NONE), &bindings),
            InputResult::Quit
        ));
        assert!(matches!(
            handle_input(press(KeyCode::Char('z'), KeyModifiers::CONTROL), &bindings),
            InputResult::Continue
        ));
    }

    #[test]
    fn test_paste_normalizes_line_endings() {
        let bindings = KeyBindings::new();
        match handle_input(Event::Paste("one\r\ntwo".into()), &bindings) {
            InputResult::Paste(text) => assert_eq!(text, "one\ntwo"),
            _ => panic!("expected paste"),
        }
    }
}
