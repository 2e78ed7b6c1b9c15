use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use gita_core::{Direction, Step};
use ratatui::layout::Rect;

use crate::app::{App, Screen, SelectionPurpose, GRID_COLUMNS};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) | AppEvent::TimerTick => {}
        AppEvent::ToastExpired(id) => app.expire_toast(id),
        AppEvent::VersesLoaded(result) => app.on_verses_loaded(result),
        AppEvent::PreferenceChanged(event) => app.on_preference_changed(event),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work on any screen
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.show_settings {
        handle_settings(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('o') => {
            app.toggle_settings();
            return;
        }
        _ => {}
    }

    match app.screen {
        Screen::Home => handle_home(app, key),
        Screen::Selection => handle_selection(app, key),
        Screen::Card => handle_card(app, key),
        Screen::Completion => handle_completion(app, key),
        Screen::Jump => handle_jump(app, key),
    }
}

fn handle_settings(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('o') | KeyCode::Char('q') => app.show_settings = false,
        KeyCode::Char('j') | KeyCode::Down => app.settings_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.settings_nav_up(),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('l') | KeyCode::Right => app.adjust_setting(true),
        KeyCode::Char('h') | KeyCode::Left => app.adjust_setting(false),
        _ => {}
    }
}

fn handle_home(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.home_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.home_nav_up(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.home_enter(),
        _ => {}
    }
}

fn handle_selection(app: &mut App, key: KeyEvent) {
    let row = GRID_COLUMNS as i8;
    match key.code {
        KeyCode::Esc => app.screen = Screen::Home,
        KeyCode::Char('h') | KeyCode::Left => app.move_chapter_cursor(-1),
        KeyCode::Char('l') | KeyCode::Right => app.move_chapter_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_chapter_cursor(-row),
        KeyCode::Char('j') | KeyCode::Down => app.move_chapter_cursor(row),
        KeyCode::Char(' ') => app.select_chapter(),
        KeyCode::Char('a') => app.toggle_all_chapters(),
        KeyCode::Enter => match app.selection_purpose {
            SelectionPurpose::Practice(_) => app.start_practice(),
            SelectionPurpose::Reading => app.select_chapter(),
        },
        _ => {}
    }
}

fn handle_card(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.leave_session(),
        KeyCode::Char('l') | KeyCode::Right => app.advance(Direction::Next),
        KeyCode::Char('h') | KeyCode::Left => app.advance(Direction::Previous),
        KeyCode::Char(' ') | KeyCode::Enter => app.reveal(),
        KeyCode::Char('?') | KeyCode::Char('i') => app.show_hint(),
        KeyCode::Char('s') => app.toggle_star(),
        KeyCode::Char('[') => app.peek(Step::Previous),
        KeyCode::Char(']') => app.peek(Step::Next),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_card_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_card_up(),
        _ => {}
    }
}

fn handle_completion(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.restart(),
        KeyCode::Char('n') => app.next_chapter(),
        KeyCode::Esc | KeyCode::Enter => app.leave_session(),
        _ => {}
    }
}

fn handle_jump(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => app.jump_back(),
        KeyCode::Char('j') | KeyCode::Down => app.jump_nav(1),
        KeyCode::Char('k') | KeyCode::Up => app.jump_nav(-1),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.jump_enter(),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.screen != Screen::Card || app.show_settings {
        return;
    }
    let x = mouse.column;
    let y = mouse.row;
    let in_card = app.card_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if in_card => app.begin_drag(x, y),
        MouseEventKind::Up(MouseButton::Left) => app.end_drag(x, y),
        MouseEventKind::ScrollDown if in_card => app.scroll_card_down(),
        MouseEventKind::ScrollUp if in_card => app.scroll_card_up(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use gita_core::{BookmarkSet, BookmarkStore, Config, Preferences, VerseDb, VerseId};

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> AppEvent {
        AppEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn loaded_app() -> App {
        let mut app = App::new(
            Preferences::in_memory(Config::new()),
            BookmarkStore::in_memory(BookmarkSet::new()),
            None,
        );
        let json = r#"[
            {"chapter": 3, "verse": 1, "charans": ["ज्यायसी चेत्कर्मणस्ते ।"]},
            {"chapter": 3, "verse": 2, "charans": ["व्यामिश्रेणेव वाक्येन ।"]}
        ]"#;
        handle_event(&mut app, AppEvent::VersesLoaded(VerseDb::from_json_str(json))).unwrap();
        app
    }

    fn send(app: &mut App, events: Vec<AppEvent>) {
        for event in events {
            handle_event(app, event).unwrap();
        }
    }

    #[test]
    fn test_keyboard_practice_flow() {
        let mut app = loaded_app();
        send(
            &mut app,
            vec![
                key(KeyCode::Enter),
                key(KeyCode::Right),
                key(KeyCode::Right),
                key(KeyCode::Char(' ')),
                key(KeyCode::Enter),
            ],
        );
        assert_eq!(app.screen, Screen::Card);
        assert!(app.selected_chapters.contains(&3));

        send(&mut app, vec![key(KeyCode::Char(' '))]);
        assert!(app.session.as_ref().unwrap().is_revealed());

        send(&mut app, vec![key(KeyCode::Char('s'))]);
        let viewed = app.session.as_ref().unwrap().viewed_record().unwrap().id();
        assert!(app.bookmarks.contains(viewed));

        send(&mut app, vec![key(KeyCode::Char('l')), key(KeyCode::Char('l'))]);
        assert_eq!(app.screen, Screen::Completion);

        send(&mut app, vec![key(KeyCode::Esc)]);
        assert_eq!(app.screen, Screen::Selection);
    }

    #[test]
    fn test_peek_keys_need_answer_side() {
        let mut app = loaded_app();
        send(
            &mut app,
            vec![
                key(KeyCode::Enter),
                key(KeyCode::Char('a')),
                key(KeyCode::Enter),
                key(KeyCode::Char(']')),
            ],
        );
        assert!(!app.session.as_ref().unwrap().is_viewing_neighbor());

        send(&mut app, vec![key(KeyCode::Char(' '))]);
        let own = app.session.as_ref().unwrap().current_record().unwrap().id();
        let step = if own == VerseId::new(3, 1) { ']' } else { '[' };
        send(&mut app, vec![key(KeyCode::Char(step))]);
        assert!(app.session.as_ref().unwrap().is_viewing_neighbor());
    }

    #[test]
    fn test_settings_popup_captures_keys() {
        let mut app = loaded_app();
        send(&mut app, vec![key(KeyCode::Char('o')), key(KeyCode::Char('q'))]);

        assert!(!app.should_quit);
        assert!(!app.show_settings);

        send(&mut app, vec![key(KeyCode::Char('q'))]);
        assert!(app.should_quit);
    }

    #[test]
    fn test_mouse_drag_outside_card_is_ignored() {
        let mut app = loaded_app();
        send(&mut app, vec![key(KeyCode::Enter), key(KeyCode::Char('a')), key(KeyCode::Enter)]);
        app.card_area = Some(Rect::new(10, 5, 40, 10));

        send(
            &mut app,
            vec![
                mouse(MouseEventKind::Down(MouseButton::Left), 2, 2),
                mouse(MouseEventKind::Up(MouseButton::Left), 2, 12),
            ],
        );
        assert!(!app.session.as_ref().unwrap().is_revealed());

        send(
            &mut app,
            vec![
                mouse(MouseEventKind::Down(MouseButton::Left), 20, 6),
                mouse(MouseEventKind::Up(MouseButton::Left), 20, 13),
            ],
        );
        assert!(app.session.as_ref().unwrap().is_revealed());
    }
}
