//! Application model: the list cursor and UI-only flags.
//!
//! Playback itself lives in `PlaylistController`; `App` only tracks what
//! the user is pointing at and whether the cursor should follow playback.

use std::path::PathBuf;

use crate::playlist::PlaylistView;

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    /// Index of the row under the cursor.
    pub selected: usize,
    /// Move the cursor to the current track whenever it changes.
    pub follow_playback: bool,
    /// Directories given on the command line, reloaded by `R`.
    pub dirs: Vec<PathBuf>,
    /// One-line message shown in the status box until replaced.
    pub notice: Option<String>,

    last_current: Option<usize>,
}

impl App {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self {
            selected: 0,
            follow_playback: true,
            dirs,
            notice: None,
            last_current: None,
        }
    }

    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Directories as shown in the status line.
    pub fn dirs_label(&self) -> String {
        self.dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Reconcile the cursor with a fresh controller snapshot.
    ///
    /// Keeps `selected` inside the list, and jumps to the current track when
    /// following playback and the current track changed since the last sync.
    pub fn sync_to(&mut self, view: &PlaylistView) {
        let len = view.tracks.len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }

        if view.current_index != self.last_current {
            self.last_current = view.current_index;
            if self.follow_playback {
                if let Some(idx) = view.current_index {
                    self.selected = idx;
                }
            }
        }
    }

    /// Return the index after `current`, wrapping around to the first row.
    pub fn next_from(current: usize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        if current >= len {
            return Some(0);
        }
        Some((current + 1) % len)
    }

    /// Return the index before `current`, wrapping around to the last row.
    pub fn prev_from(current: usize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        match current {
            0 => Some(len - 1),
            c if c >= len => Some(len - 1),
            c => Some(c - 1),
        }
    }

    /// Move the cursor down one row.
    pub fn next(&mut self, len: usize) {
        if let Some(next) = Self::next_from(self.selected, len) {
            self.selected = next;
        }
    }

    /// Move the cursor up one row.
    pub fn prev(&mut self, len: usize) {
        if let Some(prev) = Self::prev_from(self.selected, len) {
            self.selected = prev;
        }
    }
}
