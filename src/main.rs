use std::fs::File;
use std::io;
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::{bounded, Receiver};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use pokegallery::app::App;
use pokegallery::fetch::{self, FetchError, Pokemon, POKEAPI_BASE_URL, POKEMON_LIMIT};
use pokegallery::ui;

const LOG_FILE: &str = "pokegallery.log";
const POLL_INTERVAL: Duration = Duration::from_millis(50);

type LoadResult = Result<Vec<Pokemon>, FetchError>;

// The terminal owns stdout/stderr, so traces go to a file.
fn init_logging() -> anyhow::Result<()> {
  let log_file = File::create(LOG_FILE).context("create log file")?;
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(log_file)
    .with_ansi(false)
    .init();
  Ok(())
}

// One background load per session. No cancellation: once the fan-out is
// launched it runs to completion or failure, and a dropped receiver just
// discards the result.
fn spawn_loader() -> anyhow::Result<Receiver<LoadResult>> {
  let client = fetch::build_client().context("build http client")?;
  let runtime = tokio::runtime::Runtime::new().context("start tokio runtime")?;
  let (sender, receiver) = bounded(1);
  std::thread::spawn(move || {
    let result = runtime.block_on(fetch::load_catalog(&client, POKEAPI_BASE_URL, POKEMON_LIMIT));
    let _ = sender.send(result);
  });
  Ok(receiver)
}

fn run(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  loader: &Receiver<LoadResult>,
) -> anyhow::Result<()> {
  loop {
    if let Ok(result) = loader.try_recv() {
      app.on_load_result(result);
    }

    terminal.draw(|frame| ui::draw(frame, app))?;

    if event::poll(POLL_INTERVAL)? {
      if let Event::Key(key) = event::read()? {
        app.on_key(key);
      }
    }

    if app.should_quit {
      return Ok(());
    }
  }
}

fn main() -> anyhow::Result<()> {
  init_logging()?;
  let loader = spawn_loader()?;

  enable_raw_mode()?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen)?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend)?;

  let mut app = App::new();
  let run_result = run(&mut terminal, &mut app, &loader);

  disable_raw_mode()?;
  execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
  terminal.show_cursor()?;

  run_result
}
