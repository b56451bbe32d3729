use std::env;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::config;
use crate::media::{FileResources, RodioSource};
use crate::playlist::PlaylistController;

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--print-config") {
        print!("{}", config::Settings::default().to_toml()?);
        return Ok(());
    }

    let (settings, problem) = settings::load_settings();
    if let Err(e) = logging::init_logging(&settings.log) {
        eprintln!("tapedeck: logging disabled: {e}");
    }
    if let Some(problem) = &problem {
        warn!("{problem}");
    }

    let dirs = startup::startup_dirs(&args);
    let entries = startup::scan_dirs(&dirs, &settings.library);

    let (media, events) = RodioSource::spawn(&settings.audio);
    let mut controller = PlaylistController::new(
        media,
        FileResources::new(),
        startup::controller_options(&settings),
    );
    let report = controller.add_tracks(entries);

    let mut app = App::new(dirs);
    app.notice = problem.or_else(|| {
        (report.failed > 0).then(|| format!("{} file(s) could not be opened", report.failed))
    });

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result =
        event_loop::run(&mut terminal, &settings, &mut app, &mut controller, &events);

    // Fade out before the controller unbinds and releases everything.
    controller.media_mut().quit_softly();
    controller.shutdown();
    info!("bye");

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
