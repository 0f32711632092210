use clap::Subcommand;
use pomotec_core::storage::Database;
use pomotec_core::{
    notifier_from_config, Config, Event, Notifier, Phase, PomodoroViewModel, TimerEngine, UserAction,
};

const ENGINE_KEY: &str = "timer_engine";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a fresh focus session
    Start,
    /// Pause the countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// End the current break and start focusing
    SkipBreak,
    /// Back to an idle 25:00 focus session
    Reset,
    /// Print current timer state as JSON
    Status,
}

impl TimerAction {
    fn user_action(&self) -> Option<UserAction> {
        match self {
            TimerAction::Start => Some(UserAction::StartFocus),
            TimerAction::Pause => Some(UserAction::Pause),
            TimerAction::Resume => Some(UserAction::Resume),
            TimerAction::SkipBreak => Some(UserAction::SkipBreak),
            TimerAction::Reset => Some(UserAction::Reset),
            TimerAction::Status => None,
        }
    }
}

fn load_engine(db: &Database, config: &Config) -> Result<TimerEngine, Box<dyn std::error::Error>> {
    let durations = config.durations()?;
    if let Some(json) = db.kv_get(ENGINE_KEY)? {
        match serde_json::from_str::<TimerEngine>(&json) {
            Ok(mut engine) => {
                if engine.durations() != durations && !engine.is_running() {
                    tracing::info!("phase lengths changed in config, resetting timer");
                    engine.set_durations(durations);
                }
                return Ok(engine);
            }
            Err(e) => tracing::warn!(error = %e, "discarding unreadable timer state"),
        }
    }
    Ok(TimerEngine::new(durations))
}

fn save_engine(db: &Database, engine: &TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

/// Store every completed phase in `events`.
pub fn record_completed(db: &Database, events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        if let Event::PhaseCompleted {
            phase,
            duration_secs,
            at,
        } = event
        {
            db.record_session(*phase, duration_secs / 60, *at)?;
        }
    }
    Ok(())
}

fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let engine = load_engine(&db, &config)?;
    let notifier = notifier_from_config(&config, None);
    let mut vm = PomodoroViewModel::with_engine(engine, config.theme(), notifier);

    // Catch up on time that passed since the last invocation.
    let caught_up = vm.tick();
    record_completed(&db, &caught_up)?;
    print_events(&caught_up)?;

    let result: Result<(), Box<dyn std::error::Error>> = match action.user_action() {
        Some(UserAction::SkipBreak) if vm.state().phase != Phase::Break => {
            Err("not on a break".into())
        }
        Some(user_action) => {
            let events = vm.dispatch(user_action);
            record_completed(&db, &events)?;
            if events.is_empty() {
                println!("{}", serde_json::to_string_pretty(&vm.engine().snapshot())?);
            } else {
                print_events(&events)?;
            }
            Ok(())
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&vm.engine().snapshot())?);
            Ok(())
        }
    };

    tracing::debug!(backend = vm.notifier().name(), "timer command finished");
    save_engine(&db, vm.engine())?;
    result
}
