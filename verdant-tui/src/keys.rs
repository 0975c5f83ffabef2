//! Keybinding definitions for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::{Input, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Back,
    Home,
    MoveUp,
    MoveDown,
    Select,
    FocusSidebar,
    TogglePartition,
    OpenSearch,
    CycleCustomer,
    CycleStage,
    CycleStatus,
    ClearFilters,
    /// Sort by the column at this index; repeating flips direction.
    SortBy(usize),
    OpenCustomer,
    OpenWorkflow,
    ToggleExpand,
    EditForm,
    PerformAction,
    ToggleAudit,
    OpenHelp,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Esc | KeyCode::Backspace => Some(Action::Back),
        KeyCode::Char('h') | KeyCode::Home => Some(Action::Home),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Tab | KeyCode::BackTab => Some(Action::TogglePartition),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Char('s') => Some(Action::FocusSidebar),
        KeyCode::Char('c') => Some(Action::CycleCustomer),
        KeyCode::Char('g') => Some(Action::CycleStage),
        KeyCode::Char('t') => Some(Action::CycleStatus),
        KeyCode::Char('x') => Some(Action::ClearFilters),
        KeyCode::Char('C') => Some(Action::OpenCustomer),
        KeyCode::Char('w') => Some(Action::OpenWorkflow),
        KeyCode::Char(' ') => Some(Action::ToggleExpand),
        KeyCode::Char('e') => Some(Action::EditForm),
        KeyCode::Char('a') => Some(Action::PerformAction),
        KeyCode::Char('l') => Some(Action::ToggleAudit),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let idx = match c {
                '1' => 0,
                '2' => 1,
                '3' => 2,
                '4' => 3,
                '5' => 4,
                '6' => 5,
                '7' => 6,
                '8' => 7,
                '9' => 8,
                '0' => 9,
                _ => return None,
            };
            Some(Action::SortBy(idx))
        }
        _ => None,
    }
}

/// Translate a key press into text-input editing.
///
/// Returns `None` for keys the text inputs do not consume.
pub fn text_input(event: KeyEvent) -> Option<Input> {
    let KeyEvent { code, modifiers, .. } = event;
    let key = match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Enter => Key::Enter,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => return None,
    };
    Some(Input {
        key,
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        alt: modifiers.contains(KeyModifiers::ALT),
        ..Input::default()
    })
}

/// Short key reference shown in the help overlay.
pub const HELP_LINES: &[(&str, &str)] = &[
    ("j / k", "move selection"),
    ("Enter", "open selected item"),
    ("Esc", "go back"),
    ("h", "dashboard"),
    ("s", "focus sidebar"),
    ("Tab", "running / past phases"),
    ("/", "search id, customer, contract"),
    ("c g t", "cycle customer, stage, status filter"),
    ("x", "clear filters"),
    ("1-9 0", "sort by column"),
    ("C", "open customer of selected phase"),
    ("w", "open stage workflow"),
    ("Space", "expand workflow step"),
    ("e", "edit requirement form"),
    ("a", "run step action"),
    ("l", "show audit trail"),
    ("q", "quit"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_c_quits() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(event), Some(Action::Quit));
    }

    #[test]
    fn plain_c_cycles_customer_facet() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(map_key(event), Some(Action::CycleCustomer));
    }

    #[test]
    fn text_input_ignores_escape() {
        let event = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(text_input(event).is_none());
    }

    #[test]
    fn text_input_keeps_characters() {
        let event = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT);
        let input = text_input(event).unwrap();
        assert_eq!(input.key, Key::Char('S'));
        assert!(!input.ctrl);
    }
}
