mod app;
mod renderer;
mod worker;

use std::io::{Stdout, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ovenpilot_client::OvenClient;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::worker::{Command, Reply};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: ovenpilot <base-url> [recipe.json]");
        eprintln!("       e.g. ovenpilot http://oven.local:5000 recipe.json");
        std::process::exit(1);
    }
    init_logging()?;

    let client = OvenClient::new(args[1].clone());
    let recipe_path = args.get(2).map(PathBuf::from);

    let (command_tx, command_rx) = mpsc::channel();
    let (reply_tx, reply_rx) = mpsc::channel();
    let worker = worker::spawn(client, command_rx, reply_tx);

    let mut app = App::new(command_tx.clone(), recipe_path);

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &reply_rx);

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    let _ = command_tx.send(Command::Shutdown);
    let _ = worker.join();

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    replies: &mpsc::Receiver<Reply>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| renderer::draw(frame, app))?;

        while let Ok(reply) = replies.try_recv() {
            app.handle_reply(reply);
        }
        app.on_tick();

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
        if app.should_quit {
            return Ok(());
        }
    }
}

/// File-based logging, opt-in via `RUST_LOG` — the terminal belongs to
/// the UI.
fn init_logging() -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let file = std::fs::File::create("ovenpilot.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
