use std::io::{self, IsTerminal, Stdout};
use std::sync::mpsc;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use pomotec_core::storage::Database;
use pomotec_core::{notifier_from_config, Config, NotificationBackend, Notifier, PomodoroViewModel};

use crate::commands::timer::record_completed;
use crate::screen::runtime::{CrosstermEventSource, Runner, ScreenEvent, TICK_INTERVAL};
use crate::screen::view::{self, Command};
use crate::screen::BannerNotifier;

/// Raw mode + alternate screen for as long as it lives.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    if !io::stdout().is_terminal() {
        return Err("the timer screen needs an interactive terminal".into());
    }

    let config = Config::load()?;
    let durations = config.durations()?;
    let db = match Database::open() {
        Ok(db) => Some(db),
        Err(e) => {
            tracing::warn!(error = %e, "session history unavailable");
            None
        }
    };

    let (action_tx, action_rx) = mpsc::channel();
    let banner = BannerNotifier::default();
    let notifier: Box<dyn Notifier> = match config.notifications.backend {
        NotificationBackend::Terminal if config.notifications.enabled => Box::new(banner.clone()),
        _ => notifier_from_config(&config, Some(action_tx)),
    };
    tracing::info!(backend = notifier.name(), "screen starting");

    let mut vm = PomodoroViewModel::new(durations, config.theme(), notifier);
    let mut state_rx = vm.subscribe();

    let mut guard = TerminalGuard::enter()?;
    let runner = Runner::new(CrosstermEventSource::new(), TICK_INTERVAL);

    loop {
        let state = state_rx.borrow_and_update().clone();
        let latest = banner.latest();
        guard
            .terminal
            .draw(|f| view::render(f, &state, latest.as_ref()))?;

        let mut events = Vec::new();
        if let ScreenEvent::Key(key) = runner.step() {
            match view::command_for_key(key, &state) {
                Some(Command::Quit) => break,
                Some(Command::Act(action)) => events.extend(vm.dispatch(action)),
                None => {}
            }
        }
        events.extend(vm.tick());
        while let Ok(action) = action_rx.try_recv() {
            events.extend(vm.dispatch(action.into()));
        }

        if let Some(db) = &db {
            if let Err(e) = record_completed(db, &events) {
                tracing::warn!(error = %e, "failed to record session");
            }
        }
    }

    Ok(())
}
