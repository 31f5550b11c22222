//! Interactive movie browser main loop.

/// Browser view state types.
pub mod state;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use cinefind_api::analytics::AnalyticsStore;
use cinefind_api::tmdb::CatalogApi;
use cinefind_core::detail::{DetailState, MovieView};
use cinefind_core::navigation::Route;
use cinefind_core::session::BrowseSession;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::time::Instant;

use self::state::{ActivePane, BrowserView, InputMode, TRENDING_LIMIT};
use self::ui::Screen;
pub use self::ui::detail_lines;

/// Delay between frames; spawned requests make progress while sleeping.
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the movie browser TUI until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<C, A>(mut session: BrowseSession<C, A>) -> Result<()>
where
    C: CatalogApi + Send + Sync + 'static,
    A: AnalyticsStore + Send + Sync + 'static,
{
    let mut view = BrowserView::new();
    session.mount();

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut session, &mut view).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Borrows the renderable parts of the session.
fn screen<C, A>(session: &BrowseSession<C, A>) -> Screen<'_>
where
    C: CatalogApi + Send + Sync + 'static,
    A: AnalyticsStore + Send + Sync + 'static,
{
    Screen {
        search_text: session.search_text(),
        movies: session.search().state(),
        trending: session.trending().state(),
        detail: session.detail().state(),
        route: session.route(),
    }
}

/// Main event loop.
async fn run_event_loop<C, A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut BrowseSession<C, A>,
    view: &mut BrowserView,
) -> Result<()>
where
    C: CatalogApi + Send + Sync + 'static,
    A: AnalyticsStore + Send + Sync + 'static,
{
    loop {
        view.clamp(
            session.trending().movies().len(),
            session.search().movies().len(),
        );
        terminal
            .draw(|frame| ui::draw(frame, &screen(session), view))
            .context("failed to draw TUI")?;

        while event::poll(Duration::ZERO).context("failed to poll events")? {
            if let Event::Key(key) = event::read().context("failed to read event")?
                && key.kind == KeyEventKind::Press
            {
                let exit = match view.input_mode {
                    InputMode::Search => {
                        handle_search_input(session, view, key.code, key.modifiers)
                    }
                    InputMode::Normal => {
                        handle_normal_input(session, view, key.code, key.modifiers)
                    }
                };
                if exit {
                    return Ok(());
                }
            }
        }

        tokio::time::sleep(FRAME_INTERVAL).await;
        session.tick(Instant::now());
    }
}

/// Returns `true` for Ctrl-C.
fn is_interrupt(key: KeyCode, modifiers: KeyModifiers) -> bool {
    key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL)
}

/// Handles key input in search mode. Returns `true` to exit.
fn handle_search_input<C, A>(
    session: &mut BrowseSession<C, A>,
    view: &mut BrowserView,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> bool
where
    C: CatalogApi + Send + Sync + 'static,
    A: AnalyticsStore + Send + Sync + 'static,
{
    if is_interrupt(key, modifiers) {
        return true;
    }
    match key {
        KeyCode::Esc | KeyCode::Enter => {
            view.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => session.pop_char(Instant::now()),
        KeyCode::Char(c) => session.push_char(c, Instant::now()),
        _ => {}
    }
    false
}

/// Handles key input in normal mode. Returns `true` to exit.
fn handle_normal_input<C, A>(
    session: &mut BrowseSession<C, A>,
    view: &mut BrowserView,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> bool
where
    C: CatalogApi + Send + Sync + 'static,
    A: AnalyticsStore + Send + Sync + 'static,
{
    if key == KeyCode::Char('q') || is_interrupt(key, modifiers) {
        return true;
    }
    if !matches!(session.detail().state(), DetailState::Closed) {
        handle_detail_input(session, key);
        return false;
    }

    match key {
        KeyCode::Char('/') => view.input_mode = InputMode::Search,
        KeyCode::Up | KeyCode::Char('k') => view.move_up(),
        KeyCode::Down | KeyCode::Char('j') => {
            let len = match view.active_pane {
                ActivePane::Trending => session.trending().movies().len().min(TRENDING_LIMIT),
                ActivePane::Movies => session.search().movies().len(),
            };
            view.move_down(len);
        }
        KeyCode::Tab | KeyCode::BackTab => view.toggle_pane(),
        KeyCode::Enter => {
            if let Some(movie_id) =
                view.selected_movie_id(session.trending().movies(), session.search().movies())
            {
                session.navigate(Route::Movie(movie_id));
            }
        }
        _ => {}
    }
    false
}

/// Handles key input while the detail overlay is open.
fn handle_detail_input<C, A>(session: &mut BrowseSession<C, A>, key: KeyCode)
where
    C: CatalogApi + Send + Sync + 'static,
    A: AnalyticsStore + Send + Sync + 'static,
{
    match key {
        KeyCode::Esc | KeyCode::Backspace => session.navigate(Route::Home),
        KeyCode::Char('t') => open_trailer(session.detail().state()),
        _ => {}
    }
}

/// Opens the trailer of the loaded movie in the browser.
fn open_trailer(detail: &DetailState) {
    let Some(url) = detail.view().and_then(MovieView::trailer_url) else {
        return;
    };
    if let Err(e) = open::that(&url) {
        tracing::warn!(error = %e, url = %url, "Failed to open trailer");
    }
}
