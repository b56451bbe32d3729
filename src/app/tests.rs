use std::path::PathBuf;
use std::time::Duration;

use super::*;
use crate::playlist::{EndPolicy, PlaybackState, PlaylistView, TrackId, TrackRow};

fn view(len: usize, current: Option<usize>) -> PlaylistView {
    PlaylistView {
        tracks: (0..len)
            .map(|i| TrackRow {
                id: TrackId(i as u64 + 1),
                display_name: format!("track {i}"),
            })
            .collect(),
        current_index: current,
        playback_state: PlaybackState::Idle,
        current_time: Duration::ZERO,
        duration: None,
        volume: 1.0,
        end_policy: EndPolicy::Wrap,
    }
}

#[test]
fn next_prev_wrap_around() {
    assert_eq!(App::next_from(2, 3), Some(0));
    assert_eq!(App::prev_from(0, 3), Some(2));
    assert_eq!(App::next_from(0, 0), None);
    assert_eq!(App::prev_from(0, 0), None);

    let mut app = App::new(Vec::new());
    app.prev(4);
    assert_eq!(app.selected, 3);
    app.next(4);
    assert_eq!(app.selected, 0);
}

#[test]
fn out_of_range_cursor_recovers() {
    assert_eq!(App::next_from(9, 3), Some(0));
    assert_eq!(App::prev_from(9, 3), Some(2));
}

#[test]
fn sync_follows_current_track_changes() {
    let mut app = App::new(Vec::new());
    app.sync_to(&view(5, Some(3)));
    assert_eq!(app.selected, 3);

    // Only a change of the current track moves the cursor.
    app.next(5);
    app.sync_to(&view(5, Some(3)));
    assert_eq!(app.selected, 4);

    app.sync_to(&view(5, Some(1)));
    assert_eq!(app.selected, 1);
}

#[test]
fn sync_leaves_cursor_alone_in_free_roam() {
    let mut app = App::new(Vec::new());
    app.follow_playback_off();
    app.selected = 2;
    app.sync_to(&view(5, Some(4)));
    assert_eq!(app.selected, 2);

    app.follow_playback_on();
    app.sync_to(&view(5, Some(0)));
    assert_eq!(app.selected, 0);
}

#[test]
fn sync_clamps_cursor_after_removals() {
    let mut app = App::new(Vec::new());
    app.follow_playback_off();
    app.selected = 4;
    app.sync_to(&view(2, None));
    assert_eq!(app.selected, 1);

    app.sync_to(&view(0, None));
    assert_eq!(app.selected, 0);
}

#[test]
fn dirs_label_joins_directories() {
    let app = App::new(vec![PathBuf::from("/music/a"), PathBuf::from("b")]);
    assert_eq!(app.dirs_label(), "/music/a, b");
}
