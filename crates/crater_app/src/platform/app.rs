use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crater_core::{update, AppState, Msg};
use crater_engine::ServiceSettings;
use crater_logging::{crater_debug, crater_info};

use super::effects::EffectRunner;
use super::input::{self, Command, HELP};
use super::render::render;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Everything the main loop reacts to.
pub enum AppEvent {
    Msg(Msg),
    Command(Command),
    /// Stdin closed.
    InputClosed,
}

pub fn run_app(settings: ServiceSettings) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel::<AppEvent>();
    let effects = EffectRunner::new(settings, tx.clone())?;

    spawn_input_reader(tx.clone());

    // Background tick to throttle rendering during uploads.
    thread::spawn(move || {
        while tx.send(AppEvent::Msg(Msg::Tick)).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });

    let mut app = App::new(effects);
    println!("Type 'help' for commands.");
    app.dispatch(Msg::Startup);

    for event in rx {
        match event {
            AppEvent::Msg(msg) => app.dispatch(msg),
            AppEvent::Command(Command::Quit) | AppEvent::InputClosed => break,
            AppEvent::Command(command) => app.handle_command(command),
        }
    }
    crater_info!("Exiting");
    Ok(())
}

fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match input::parse(&line) {
                Ok(Some(command)) => {
                    if tx.send(AppEvent::Command(command)).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => println!("{err}"),
            }
        }
        let _ = tx.send(AppEvent::InputClosed);
    });
}

struct App {
    state: AppState,
    effects: EffectRunner,
    render_pending: bool,
}

impl App {
    fn new(effects: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            effects,
            render_pending: false,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let is_tick = matches!(msg, Msg::Tick);
        if !is_tick {
            crater_debug!("Dispatch {:?}", msg);
        }

        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.render_pending |= self.state.consume_dirty();
        self.effects.enqueue(effects);

        if is_tick && self.render_pending {
            self.render_pending = false;
            self.print_view();
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Msg(msg) => self.dispatch(msg),
            Command::Back => {
                let step = self.state.workflow().map(|workflow| workflow.step());
                if let Some(msg) = input::back_msg(step) {
                    self.dispatch(msg);
                }
            }
            Command::List => self.print_view(),
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
    }

    fn print_view(&self) {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{}", render(&self.state.view()));
        let _ = stdout.flush();
    }
}
