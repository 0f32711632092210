use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use pomotec_core::{NotificationContent, Rgb, UiState, UserAction};

const TITLE: &str = "Pomodoro Method";
const SUBTITLE: &str =
    "Alternate 25 minutes of focus with 5 minute breaks to boost your productivity.";

/// What a key press asks the screen loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Act(UserAction),
    Quit,
}

/// Map a key press to a command, honoring which controls are enabled.
pub fn command_for_key(key: KeyEvent, state: &UiState) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char(' ') | KeyCode::Enter if !state.is_running => {
            Some(Command::Act(UserAction::StartFocus))
        }
        KeyCode::Char('p') if state.is_running => Some(Command::Act(UserAction::Pause)),
        KeyCode::Char('p') => Some(Command::Act(UserAction::Resume)),
        KeyCode::Char('r') => Some(Command::Act(UserAction::Reset)),
        KeyCode::Char('s') if state.skip_break_visible => Some(Command::Act(UserAction::SkipBreak)),
        KeyCode::Char('t') => Some(Command::Act(UserAction::ToggleTheme)),
        _ => None,
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn hints(state: &UiState) -> Line<'static> {
    let mut parts = Vec::new();
    if !state.is_running {
        parts.push("[space] start");
    }
    parts.push(if state.is_running { "[p] pause" } else { "[p] resume" });
    parts.push("[r] reset");
    if state.skip_break_visible {
        parts.push("[s] skip break");
    }
    parts.push(if state.theme.is_dark() {
        "[t] light mode"
    } else {
        "[t] dark mode"
    });
    parts.push("[q] quit");
    Line::from(parts.join("   "))
}

/// Draw the whole timer screen.
pub fn render(f: &mut Frame, state: &UiState, banner: Option<&NotificationContent>) {
    let scheme = state.theme.scheme();
    let base = Style::default()
        .fg(color(scheme.on_background))
        .bg(color(scheme.background));
    let area = f.area();
    f.render_widget(Block::default().style(base), area);

    let [_, title, subtitle, _, phase, time, gauge, pct, _, hint, notice] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let bold = base.add_modifier(Modifier::BOLD);
    f.render_widget(
        Paragraph::new(TITLE).style(bold).alignment(Alignment::Center),
        title,
    );
    f.render_widget(
        Paragraph::new(SUBTITLE)
            .style(base)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        subtitle,
    );
    f.render_widget(
        Paragraph::new(state.phase.label())
            .style(bold)
            .alignment(Alignment::Center),
        phase,
    );
    f.render_widget(
        Paragraph::new(state.time_left.as_str())
            .style(bold)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color(scheme.primary))),
            ),
        centered(time, 13),
    );
    f.render_widget(
        Gauge::default()
            .ratio(state.progress.clamp(0.0, 1.0))
            .label("")
            .gauge_style(
                Style::default()
                    .fg(color(scheme.primary))
                    .bg(color(scheme.surface_variant)),
            ),
        centered(gauge, area.width.saturating_sub(8)),
    );
    f.render_widget(
        Paragraph::new(format!("{}%", state.progress_pct))
            .style(base)
            .alignment(Alignment::Center),
        pct,
    );
    f.render_widget(
        Paragraph::new(hints(state))
            .style(
                Style::default()
                    .fg(color(scheme.on_primary))
                    .bg(color(scheme.primary)),
            )
            .alignment(Alignment::Center),
        hint,
    );
    if let Some(content) = banner {
        let first_line = content.body.lines().next().unwrap_or_default();
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(content.title.clone(), bold),
                Span::raw("  "),
                Span::raw(first_line.to_string()),
            ]))
            .style(base)
            .alignment(Alignment::Center),
            notice,
        );
    }
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use pomotec_core::{Phase, ThemeMode};
    use ratatui::{backend::TestBackend, Terminal};

    fn state(phase: Phase, running: bool) -> UiState {
        UiState {
            time_left: if phase == Phase::Focus { "25:00" } else { "05:00" }.into(),
            is_running: running,
            phase,
            skip_break_visible: phase == Phase::Break,
            progress: 0.5,
            progress_pct: 50,
            theme: ThemeMode::Light,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn rendered(state: &UiState, banner: Option<&NotificationContent>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();
        terminal.draw(|f| render(f, state, banner)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn renders_focus_screen() {
        let content = rendered(&state(Phase::Focus, false), None);
        assert!(content.contains("Pomodoro Method"));
        assert!(content.contains("Focus time"));
        assert!(content.contains("25:00"));
        assert!(content.contains("50%"));
        assert!(content.contains("[space] start"));
        assert!(!content.contains("skip break"));
    }

    #[test]
    fn renders_skip_hint_during_break() {
        let content = rendered(&state(Phase::Break, true), None);
        assert!(content.contains("Break time"));
        assert!(content.contains("[s] skip break"));
        assert!(!content.contains("[space] start"));
    }

    #[test]
    fn renders_banner() {
        let banner = NotificationContent::for_phase(Phase::Break, "05:00");
        let content = rendered(&state(Phase::Break, true), Some(&banner));
        assert!(content.contains("Time left: 05:00"));
    }

    #[test]
    fn start_disabled_while_running() {
        let running = state(Phase::Focus, true);
        assert_eq!(command_for_key(key(KeyCode::Char(' ')), &running), None);
        let idle = state(Phase::Focus, false);
        assert_eq!(
            command_for_key(key(KeyCode::Enter), &idle),
            Some(Command::Act(UserAction::StartFocus))
        );
    }

    #[test]
    fn pause_key_toggles() {
        assert_eq!(
            command_for_key(key(KeyCode::Char('p')), &state(Phase::Focus, true)),
            Some(Command::Act(UserAction::Pause))
        );
        assert_eq!(
            command_for_key(key(KeyCode::Char('p')), &state(Phase::Focus, false)),
            Some(Command::Act(UserAction::Resume))
        );
    }

    #[test]
    fn skip_only_when_visible() {
        assert_eq!(command_for_key(key(KeyCode::Char('s')), &state(Phase::Focus, true)), None);
        assert_eq!(
            command_for_key(key(KeyCode::Char('s')), &state(Phase::Break, true)),
            Some(Command::Act(UserAction::SkipBreak))
        );
    }

    #[test]
    fn quit_keys() {
        let s = state(Phase::Focus, false);
        assert_eq!(command_for_key(key(KeyCode::Char('q')), &s), Some(Command::Quit));
        assert_eq!(command_for_key(key(KeyCode::Esc), &s), Some(Command::Quit));
        let ctrl_c = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('c'))
        };
        assert_eq!(command_for_key(ctrl_c, &s), Some(Command::Quit));
    }
}
