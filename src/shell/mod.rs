/*!
# Interactive Viewer

Terminal front end: a collapsible tree of integration attempts on the left
and the rendered call graph of the selected attempt on the right. Every
cursor movement is a selection change and runs the render pipeline once.

The render workspace is acquired before the terminal enters raw mode, so a
workspace failure is reported on a normal screen, and it is released
exactly once after the terminal has been restored.
*/

pub mod app;
pub mod cursor;
pub mod ui;

pub use app::{App, KeyResult, TreeRow, ViewMode};
pub use cursor::Cursor;

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use tracing::{debug, info};

use crate::render::{DotRenderer, GraphRenderer, RenderPipeline};
use crate::workspace::RenderWorkspace;
use crate::ViewerStartup;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Run the interactive viewer until the user quits
pub fn run_viewer(startup: ViewerStartup) -> Result<()> {
    if !console::Term::stdout().is_term() {
        bail!("the interactive viewer requires a terminal; use `tree`, `dot` or `export` instead");
    }

    let ViewerStartup { tree, config } = startup;
    let format = config.renderer.format;
    let workspace = RenderWorkspace::acquire(&config.workspace.prefix, format)
        .context("Failed to create render workspace")?;
    info!(dir = %workspace.dir().display(), "render workspace ready");

    let renderer = DotRenderer::new(config.renderer.program.clone(), format);
    let mut app = App::new(&tree, RenderPipeline::new(workspace, renderer));

    install_panic_hook();
    let mut terminal = setup_terminal().context("Failed to initialize terminal")?;
    let outcome = event_loop(&mut terminal, &mut app);
    let restored = restore_terminal(&mut terminal);

    app.shutdown();

    outcome?;
    restored.context("Failed to restore terminal")?;
    Ok(())
}

fn event_loop<R: GraphRenderer>(terminal: &mut Tui, app: &mut App<'_, R>) -> Result<()> {
    app.select_current();
    while !app.should_quit {
        terminal.draw(|frame| ui::ui(frame, app))?;

        if let Event::Key(key) = event::read()? {
            match app.on_key(key) {
                KeyResult::SelectionChanged => {
                    debug!(row = app.cursor.pos(), "selection changed");
                    app.select_current();
                }
                KeyResult::Quit => info!("quit requested"),
                KeyResult::None => {}
            }
        }
    }
    Ok(())
}

fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    undo_on_error(
        || {
            let mut stdout = io::stdout();
            stdout.execute(EnterAlternateScreen)?;
            let backend = CrosstermBackend::new(stdout);
            let mut terminal = Terminal::new(backend)?;
            terminal.clear()?;
            Ok(terminal)
        },
        || {
            let _ = io::stdout().execute(LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )
}

/// Run `step`; if it fails, run `undo` before returning the error
fn undo_on_error<T>(
    step: impl FnOnce() -> io::Result<T>,
    undo: impl FnOnce(),
) -> io::Result<T> {
    step().map_err(|e| {
        undo();
        e
    })
}

fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// A panic inside the loop must not leave the shell in raw mode
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
        previous(panic_info);
    }));
}
