//! TUI rendering logic for the movie browser.

use cinefind_api::tmdb::MovieSummary;
use cinefind_api::tmdb::image::{ImageSize, image_url};
use cinefind_core::detail::{DetailState, MovieView};
use cinefind_core::fetch_state::FetchState;
use cinefind_core::navigation::Route;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap};

use super::state::{ActivePane, BrowserView, InputMode, TRENDING_LIMIT};

/// Height of the trending strip: one row per entry plus borders.
const TRENDING_HEIGHT: u16 = 7;

/// Everything the browser renders, borrowed from the session.
#[derive(Debug)]
pub struct Screen<'a> {
    /// Raw search box text.
    pub search_text: &'a str,
    /// Search / discover list state.
    pub movies: &'a FetchState<Vec<MovieSummary>>,
    /// Trending list state.
    pub trending: &'a FetchState<Vec<MovieSummary>>,
    /// Detail overlay state.
    pub detail: &'a DetailState,
    /// Current location, shown on the overlay.
    pub route: Route,
}

/// Formats a number with thousands separators (e.g. 169940 -> "169,940").
#[allow(clippy::arithmetic_side_effects)]
fn fmt_num(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Formats an optional release year, `--` when unknown.
fn fmt_year(year: Option<i32>) -> String {
    year.map_or_else(|| String::from("--"), |y| y.to_string())
}

/// Builds the text lines of the detail view.
///
/// Shared between the overlay and the `movie` subcommand.
#[must_use]
pub fn detail_lines(view: &MovieView) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(detail) = &view.detail {
        lines.push(format!(
            "{} ({})",
            detail.title,
            fmt_year(detail.release_year())
        ));
        if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.is_empty()) {
            lines.push(format!("\"{tagline}\""));
        }
        lines.push(format!(
            "Rating: {:.1}/10 ({} votes)",
            detail.vote_average,
            fmt_num(u64::from(detail.vote_count))
        ));
        if let Some(date) = detail.release_date.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("Release date: {date}"));
        }
        if let Some(runtime) = detail.runtime.filter(|&r| r > 0) {
            lines.push(format!("Runtime: {runtime} min"));
        }
        if let Some(lang) = &detail.original_language {
            lines.push(format!("Language: {}", lang.to_uppercase()));
        }
        if !detail.genres.is_empty() {
            let genres: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
            lines.push(format!("Genres: {}", genres.join(", ")));
        }
    } else {
        lines.push(format!("Movie #{}", view.movie_id));
        lines.push(String::from("Details unavailable."));
    }

    if let Some(url) = view.trailer_url() {
        lines.push(format!("Trailer: {url}"));
    }

    if let Some(detail) = &view.detail {
        if let Some(overview) = detail.overview.as_deref().filter(|o| !o.is_empty()) {
            lines.push(String::new());
            lines.push(overview.to_owned());
            lines.push(String::new());
        }
        if detail.budget > 0 {
            lines.push(format!("Budget: ${}", fmt_num(detail.budget)));
        }
        if detail.revenue > 0 {
            lines.push(format!("Revenue: ${}", fmt_num(detail.revenue)));
        }
        if !detail.production_companies.is_empty() {
            lines.push(format!("Production: {}", detail.company_names()));
        }
        if let Some(status) = &detail.status {
            lines.push(format!("Status: {status}"));
        }
        if let Some(url) = image_url(ImageSize::Poster, detail.poster_path.as_deref()) {
            lines.push(format!("Poster: {url}"));
        }
        if let Some(url) = image_url(ImageSize::Original, detail.backdrop_path.as_deref()) {
            lines.push(format!("Backdrop: {url}"));
        }
    }

    if !view.cast.is_empty() {
        lines.push(String::from("Cast:"));
        for member in &view.cast {
            let role = member
                .character
                .as_deref()
                .filter(|c| !c.is_empty())
                .map_or_else(String::new, |c| format!(" as {c}"));
            let photo = image_url(ImageSize::Profile, member.profile_path.as_deref())
                .map_or_else(String::new, |url| format!(" ({url})"));
            lines.push(format!("  {}{role}{photo}", member.name));
        }
    }

    lines
}

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, screen: &Screen<'_>, view: &mut BrowserView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),               // search box
            Constraint::Length(TRENDING_HEIGHT), // trending strip
            Constraint::Min(5),                  // movie list
            Constraint::Length(3),               // footer
        ])
        .split(frame.area());

    draw_search_box(frame, chunks[0], screen, view);
    draw_trending(frame, chunks[1], screen, view);
    draw_movies(frame, chunks[2], screen, view);
    draw_footer(frame, chunks[3], screen, view);

    if !matches!(screen.detail, DetailState::Closed) {
        draw_detail(frame, screen.detail, screen.route);
    }
}

/// Draws the search input.
fn draw_search_box(frame: &mut Frame, area: Rect, screen: &Screen<'_>, view: &BrowserView) {
    let style = if view.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(screen.search_text.to_owned())
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(search, area);
}

/// Returns the border style for a pane.
fn pane_style(view: &BrowserView, pane: ActivePane) -> Style {
    if view.active_pane == pane {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Returns the highlight style for the selected row.
fn highlight_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

/// Renders a loading / error placeholder into `block`.
fn draw_placeholder(frame: &mut Frame, area: Rect, block: Block<'_>, text: &str, style: Style) {
    let placeholder = Paragraph::new(text.to_owned()).style(style).block(block);
    frame.render_widget(placeholder, area);
}

/// Draws the ranked trending strip.
fn draw_trending(frame: &mut Frame, area: Rect, screen: &Screen<'_>, view: &mut BrowserView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(pane_style(view, ActivePane::Trending))
        .title(" Trending Today ");

    let movies = match screen.trending {
        FetchState::Idle | FetchState::Loading => {
            draw_placeholder(frame, area, block, "Loading...", Style::default());
            return;
        }
        FetchState::Error(message) => {
            draw_placeholder(frame, area, block, message, Style::default().fg(Color::Red));
            return;
        }
        FetchState::Success(movies) => movies,
    };

    let rows: Vec<Row> = movies
        .iter()
        .take(TRENDING_LIMIT)
        .enumerate()
        .map(|(rank, movie)| {
            Row::new(vec![
                format!("#{}", rank.saturating_add(1)),
                movie.title.clone(),
                format!("{:.1}", movie.vote_average),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(6),
    ];
    let table = Table::new(rows, widths)
        .block(block)
        .row_highlight_style(highlight_style());
    frame.render_stateful_widget(table, area, &mut view.trending_table_state);
}

/// Draws the search / discover results.
fn draw_movies(frame: &mut Frame, area: Rect, screen: &Screen<'_>, view: &mut BrowserView) {
    let title = if screen.search_text.trim().is_empty() {
        String::from(" Popular ")
    } else {
        format!(" Results for \"{}\" ", screen.search_text.trim())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(pane_style(view, ActivePane::Movies))
        .title(title);

    let movies = match screen.movies {
        FetchState::Idle | FetchState::Loading => {
            draw_placeholder(frame, area, block, "Loading...", Style::default());
            return;
        }
        FetchState::Error(message) => {
            draw_placeholder(frame, area, block, message, Style::default().fg(Color::Red));
            return;
        }
        FetchState::Success(movies) if movies.is_empty() => {
            draw_placeholder(frame, area, block, "No movies found.", Style::default());
            return;
        }
        FetchState::Success(movies) => movies,
    };

    let header = Row::new(vec!["Title", "Year", "Rating", "Lang"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = movies
        .iter()
        .map(|movie| {
            Row::new(vec![
                movie.title.clone(),
                fmt_year(movie.release_year()),
                format!("{:.1}", movie.vote_average),
                movie
                    .original_language
                    .as_deref()
                    .unwrap_or("--")
                    .to_uppercase(),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(5),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(highlight_style());
    frame.render_stateful_widget(table, area, &mut view.movie_table_state);
}

/// Returns a rectangle centered in `area` covering the given percentages.
#[allow(clippy::indexing_slicing)]
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let margin_y = 100_u16.saturating_sub(percent_y) / 2;
    let margin_x = 100_u16.saturating_sub(percent_x) / 2;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(margin_y),
            Constraint::Percentage(percent_y),
            Constraint::Percentage(margin_y),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(margin_x),
            Constraint::Percentage(percent_x),
            Constraint::Percentage(margin_x),
        ])
        .split(rows[1])[1]
}

/// Draws the detail overlay on top of the lists.
fn draw_detail(frame: &mut Frame, detail: &DetailState, route: Route) {
    let area = centered_rect(80, 80, frame.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {route} "));

    let (lines, style): (Vec<Line>, Style) = match detail {
        DetailState::Closed => return,
        DetailState::Loading(_) => (vec![Line::from("Loading...")], Style::default()),
        DetailState::Failed { message, .. } => (
            vec![Line::from(message.clone())],
            Style::default().fg(Color::Red),
        ),
        DetailState::Ready(view) => (
            detail_lines(view).into_iter().map(Line::from).collect(),
            Style::default(),
        ),
    };

    let paragraph = Paragraph::new(lines)
        .style(style)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, screen: &Screen<'_>, view: &BrowserView) {
    let hints = if view.input_mode == InputMode::Search {
        "Type to search  Enter/Esc: done  Backspace: delete"
    } else if matches!(screen.detail, DetailState::Closed) {
        "q: quit  /: search  Tab: switch pane  \u{2191}\u{2193}/jk: move  Enter: details"
    } else {
        "Esc: close  t: open trailer  q: quit"
    };

    let footer = Paragraph::new(hints).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
