//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::config::{ControlsSettings, UiSettings};
use crate::playlist::{PlaybackState, PlaylistView};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("j/k", "up/down"),
        ("enter", "play selected song"),
        ("space/p", "play/pause"),
        ("h/l", "prev/next song"),
        // H/L is filled dynamically from config.
        ("-/+", "volume"),
        ("d", "remove"),
        ("e", "end policy"),
        ("R", "reload dirs"),
        ("q", "quit"),
    ])
});

/// Render the controls help text, incorporating seek seconds.
///
/// Keys the view reports as unavailable are left out.
fn controls_text(seek_seconds: u64, view: &PlaylistView) -> String {
    let order = [
        "j/k", "h/l", "H/L", "enter", "space/p", "-/+", "d", "e", "R", "q",
    ];
    order
        .iter()
        .filter(|k| match **k {
            "j/k" | "h/l" | "enter" | "d" => view.can_navigate(),
            "H/L" | "space/p" => view.can_toggle(),
            _ => true,
        })
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{seek_seconds}s"))
            } else {
                CONTROLS_MAP.get(k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn status_text(app: &App, view: &PlaylistView) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(view.playback_state.label().to_string());
    match view.title() {
        Some(title) => parts.push(format!("Song: {title}")),
        None if view.tracks.is_empty() => parts.push("No tracks".to_string()),
        None => parts.push("Nothing selected".to_string()),
    }
    parts.push(format!("VOL: {:.0}%", view.volume * 100.0));
    parts.push(format!("END: {}", view.end_policy.label()));

    if app.follow_playback {
        parts.push("CURSOR: Follow".to_string());
    } else {
        parts.push("CURSOR: Free-roam".to_string());
    }

    if !app.dirs.is_empty() {
        parts.push(format!("Dir: {}", app.dirs_label()));
    }
    if let Some(notice) = &app.notice {
        parts.push(notice.clone());
    }

    parts.join(" • ")
}

fn row_text(index: usize, name: &str, view: &PlaylistView, ui: &UiSettings) -> String {
    let marker = if view.is_current(index) {
        match view.playback_state {
            PlaybackState::Playing => "▶ ",
            PlaybackState::Paused | PlaybackState::Blocked => "‖ ",
            _ => "• ",
        }
    } else {
        "  "
    };
    if ui.show_track_numbers {
        format!("{marker}{:>3}. {name}", index + 1)
    } else {
        format!("{marker}{name}")
    }
}

/// Render the entire UI into the provided `frame` from `app` and a controller snapshot.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    view: &PlaylistView,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tapedeck ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app, view))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    // Unknown duration leaves the bar empty but still shows the clock.
    let progress = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(view.progress_ratio().unwrap_or(0.0))
        .label(view.progress_text());
    frame.render_widget(progress, chunks[2]);

    // Only build ListItems for the visible window, centred on the cursor.
    {
        let total = view.tracks.len();
        let list_height = chunks[3].height.saturating_sub(2) as usize;
        let sel = app.selected.min(total.saturating_sub(1));
        let (start, end) = if total <= list_height || list_height == 0 {
            (0, total)
        } else {
            let half = list_height / 2;
            let mut start = sel.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height)
        };

        let items: Vec<ListItem> = view.tracks[start..end]
            .iter()
            .enumerate()
            .map(|(offset, row)| {
                let index = start + offset;
                let item = ListItem::new(row_text(index, &row.display_name, view, ui_settings));
                if view.is_current(index) {
                    item.style(Style::default().add_modifier(Modifier::BOLD))
                } else {
                    item
                }
            })
            .collect();

        let title = format!(" tracks ({total}) ");
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(sel - start));
        }
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    let footer = Paragraph::new(controls_text(controls_settings.seek_seconds, view))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
