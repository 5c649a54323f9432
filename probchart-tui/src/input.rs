//! Keyboard and mouse input dispatch.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use probchart_core::RangeWindow;

use crate::app::App;
use crate::chart::plot_geometry;

/// Cursor steps per `H`/`L` press.
const FAST_STEP: isize = 10;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false
        }
        KeyCode::Left | KeyCode::Char('h') => app.move_cursor(-1),
        KeyCode::Right | KeyCode::Char('l') => app.move_cursor(1),
        KeyCode::Char('H') => app.move_cursor(-FAST_STEP),
        KeyCode::Char('L') => app.move_cursor(FAST_STEP),
        KeyCode::Home | KeyCode::Char('g') => app.cursor_to_first(),
        KeyCode::End | KeyCode::Char('G') => app.cursor_to_latest(),
        KeyCode::Char('a') => app.toggle_show_all(),
        KeyCode::Char(c @ '1'..='6') => {
            let idx = c as usize - '1' as usize;
            app.set_window(RangeWindow::ALL_WINDOWS[idx]);
        }
        _ => {}
    }
}

/// Hovering (or clicking/dragging) over the plot moves the cursor to the
/// time under the pointer.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved
        | MouseEventKind::Down(MouseButton::Left)
        | MouseEventKind::Drag(MouseButton::Left) => {
            let hovered = plot_geometry(app, app.chart_area)
                .and_then(|plot| plot.time_at(mouse.column, mouse.row));
            if let Some(t) = hovered {
                app.cursor_to_time(t);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use probchart_core::{ChartConfig, Series};
    use ratatui::layout::Rect;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let points: Vec<(i64, f64)> = (0..30).map(|i| (i * 60, 50.0 + i as f64)).collect();
        App::new("keys", vec![Series::from_points("A", &points)], ChartConfig::default())
    }

    #[test]
    fn quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = app();
            handle_key(&mut app, press(code));
            assert!(!app.running);
        }
        let mut app = app();
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn arrows_and_fast_steps_move_cursor() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Left));
        assert_eq!(app.cursor_time(), Some(28 * 60));
        handle_key(&mut app, press(KeyCode::Char('H')));
        assert_eq!(app.cursor_time(), Some(18 * 60));
        handle_key(&mut app, press(KeyCode::Char('g')));
        assert_eq!(app.cursor_time(), Some(0));
        handle_key(&mut app, press(KeyCode::Char('G')));
        assert_eq!(app.cursor_time(), Some(29 * 60));
    }

    #[test]
    fn digits_select_range_window() {
        let mut app = app();
        handle_key(&mut app, press(KeyCode::Char('1')));
        assert_eq!(app.window, RangeWindow::OneHour);
        handle_key(&mut app, press(KeyCode::Char('6')));
        assert_eq!(app.window, RangeWindow::All);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = app();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        key.state = KeyEventState::NONE;
        handle_key(&mut app, key);
        assert!(app.running);
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn hover_moves_cursor_to_time_under_pointer() {
        let mut app = app();
        app.chart_area = Rect::new(0, 0, 100, 30);
        let plot = plot_geometry(&app, app.chart_area).unwrap();

        // Halfway between the samples at 600 and 660: the step value at 600 holds.
        let column = plot.column_of(630);
        handle_mouse(&mut app, mouse(MouseEventKind::Moved, column, plot.top));
        assert_eq!(app.cursor_time(), Some(600));

        handle_mouse(
            &mut app,
            mouse(MouseEventKind::Down(MouseButton::Left), plot.left, plot.top + 1),
        );
        assert_eq!(app.cursor_time(), Some(0));

        let right = plot.left + plot.width - 1;
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), right, plot.top));
        assert_eq!(app.cursor_time(), Some(29 * 60));
    }

    #[test]
    fn mouse_outside_plot_is_ignored() {
        let mut app = app();
        app.chart_area = Rect::new(0, 0, 100, 30);
        let plot = plot_geometry(&app, app.chart_area).unwrap();
        app.move_cursor(-5);
        let before = app.cursor_time();

        handle_mouse(&mut app, mouse(MouseEventKind::Moved, 0, 0));
        handle_mouse(&mut app, mouse(MouseEventKind::Moved, plot.left, plot.top + plot.height));
        handle_mouse(&mut app, mouse(MouseEventKind::ScrollDown, plot.left, plot.top));
        assert_eq!(app.cursor_time(), before);
    }

    #[test]
    fn mouse_before_first_draw_is_ignored() {
        let mut app = app();
        handle_mouse(&mut app, mouse(MouseEventKind::Moved, 10, 10));
        assert_eq!(app.cursor_time(), Some(29 * 60));
    }

    #[test]
    fn toggle_all_series() {
        let mut app = app();
        let before = app.show_all;
        handle_key(&mut app, press(KeyCode::Char('a')));
        assert_ne!(app.show_all, before);
    }
}
