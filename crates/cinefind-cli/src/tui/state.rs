//! Browser view state: focus, cursors and input mode.
//!
//! Movie data lives in the browse session; this only tracks what the user
//! is pointing at.

use cinefind_api::tmdb::MovieSummary;
use ratatui::widgets::TableState;

/// Number of trending movies shown in the strip.
pub const TRENDING_LIMIT: usize = 5;

/// Currently focused pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    /// Trending strip (top).
    Trending,
    /// Search / discover results (bottom).
    Movies,
}

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigation keys.
    Normal,
    /// Typing into the search box.
    Search,
}

/// Cursor and focus state for the browser TUI.
#[derive(Debug)]
pub struct BrowserView {
    /// Currently focused pane.
    pub active_pane: ActivePane,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Table state for the trending strip.
    pub trending_table_state: TableState,
    /// Table state for the movie list.
    pub movie_table_state: TableState,
}

impl Default for BrowserView {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserView {
    /// Creates a view focused on the movie list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active_pane: ActivePane::Movies,
            input_mode: InputMode::Normal,
            trending_table_state: TableState::default(),
            movie_table_state: TableState::default(),
        }
    }

    /// Returns the cursor of the focused pane.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.focused_table().selected().unwrap_or(0)
    }

    /// Moves the cursor up.
    pub fn move_up(&mut self) {
        let current = self.cursor();
        let table = self.focused_table_mut();
        table.select(Some(current.saturating_sub(1)));
    }

    /// Moves the cursor down within a focused list of `len` rows.
    pub fn move_down(&mut self, len: usize) {
        let current = self.cursor();
        let next = current.saturating_add(1);
        if next < len {
            self.focused_table_mut().select(Some(next));
        }
    }

    /// Switches focus between the trending strip and the movie list.
    pub const fn toggle_pane(&mut self) {
        self.active_pane = match self.active_pane {
            ActivePane::Trending => ActivePane::Movies,
            ActivePane::Movies => ActivePane::Trending,
        };
    }

    /// Keeps both cursors inside their lists after the lists change.
    pub fn clamp(&mut self, trending_len: usize, movies_len: usize) {
        clamp_table(
            &mut self.trending_table_state,
            trending_len.min(TRENDING_LIMIT),
        );
        clamp_table(&mut self.movie_table_state, movies_len);
    }

    /// Returns the ID of the movie under the cursor of the focused pane.
    #[must_use]
    pub fn selected_movie_id(
        &self,
        trending: &[MovieSummary],
        movies: &[MovieSummary],
    ) -> Option<u64> {
        let list = match self.active_pane {
            ActivePane::Trending => trending.get(..TRENDING_LIMIT).unwrap_or(trending),
            ActivePane::Movies => movies,
        };
        let index = self.focused_table().selected()?;
        list.get(index).map(|movie| movie.id)
    }

    const fn focused_table(&self) -> &TableState {
        match self.active_pane {
            ActivePane::Trending => &self.trending_table_state,
            ActivePane::Movies => &self.movie_table_state,
        }
    }

    const fn focused_table_mut(&mut self) -> &mut TableState {
        match self.active_pane {
            ActivePane::Trending => &mut self.trending_table_state,
            ActivePane::Movies => &mut self.movie_table_state,
        }
    }
}

/// Selects the first row of a non-empty list and clamps the cursor.
fn clamp_table(table: &mut TableState, len: usize) {
    if len == 0 {
        table.select(None);
        return;
    }
    let max = len.saturating_sub(1);
    let current = table.selected().unwrap_or(0);
    table.select(Some(current.min(max)));
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn movies(ids: &[u64]) -> Vec<MovieSummary> {
        ids.iter()
            .map(|&id| MovieSummary {
                id,
                title: format!("Movie {id}"),
                ..MovieSummary::default()
            })
            .collect()
    }

    #[test]
    fn test_initial_state() {
        // Arrange & Act
        let view = BrowserView::new();

        // Assert
        assert_eq!(view.active_pane, ActivePane::Movies);
        assert_eq!(view.input_mode, InputMode::Normal);
        assert_eq!(view.cursor(), 0);
        assert!(view.selected_movie_id(&[], &[]).is_none());
    }

    #[test]
    fn test_move_down_and_up() {
        // Arrange
        let list = movies(&[1, 2]);
        let mut view = BrowserView::new();
        view.clamp(0, list.len());

        // Act & Assert
        view.move_down(list.len());
        assert_eq!(view.cursor(), 1);

        view.move_down(list.len()); // at end, should not move
        assert_eq!(view.cursor(), 1);

        view.move_up();
        assert_eq!(view.cursor(), 0);

        view.move_up(); // at start, should not move
        assert_eq!(view.cursor(), 0);
    }

    #[test]
    fn test_clamp_after_list_shrinks() {
        // Arrange
        let mut view = BrowserView::new();
        view.clamp(0, 10);
        for _ in 0..8 {
            view.move_down(10);
        }

        // Act
        view.clamp(0, 3);

        // Assert
        assert_eq!(view.cursor(), 2);

        // Act: empty list clears the selection
        view.clamp(0, 0);
        assert!(view.movie_table_state.selected().is_none());
    }

    #[test]
    fn test_trending_selection_is_limited() {
        // Arrange
        let trending = movies(&[10, 11, 12, 13, 14, 15, 16]);
        let mut view = BrowserView::new();
        view.toggle_pane();
        view.clamp(trending.len(), 0);

        // Act
        for _ in 0..10 {
            view.move_down(trending.len().min(TRENDING_LIMIT));
        }

        // Assert
        assert_eq!(view.active_pane, ActivePane::Trending);
        assert_eq!(view.selected_movie_id(&trending, &[]), Some(14));
    }

    #[test]
    fn test_selected_movie_follows_focus() {
        // Arrange
        let trending = movies(&[10, 11]);
        let list = movies(&[20, 21, 22]);
        let mut view = BrowserView::new();
        view.clamp(trending.len(), list.len());
        view.move_down(list.len());

        // Act
        let in_movies = view.selected_movie_id(&trending, &list);
        view.toggle_pane();
        let in_trending = view.selected_movie_id(&trending, &list);

        // Assert
        assert_eq!(in_movies, Some(21));
        assert_eq!(in_trending, Some(10));
    }
}
