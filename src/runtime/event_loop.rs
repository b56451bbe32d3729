use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, warn};

use crate::app::App;
use crate::config;
use crate::media::{MediaEvent, MediaSource, ResourceProvider};
use crate::playlist::{PlaylistController, PlaylistView};
use crate::runtime::startup::scan_dirs;
use crate::ui;

/// Main terminal event loop: applies media events, draws, and handles
/// input. Returns `Ok(())` when the user quits.
pub fn run<M: MediaSource, R: ResourceProvider>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaylistController<M, R>,
    events: &Receiver<MediaEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        for media_event in events.try_iter() {
            controller.handle_event(media_event);
        }

        let view = controller.view();
        app.sync_to(&view);
        terminal.draw(|f| ui::draw(f, app, &view, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, &view, controller) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one key press against the snapshot the user was looking at.
/// Returns `true` when shutdown is requested.
pub fn handle_key_event<M: MediaSource, R: ResourceProvider>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    view: &PlaylistView,
    controller: &mut PlaylistController<M, R>,
) -> bool {
    let seek = settings.controls.seek_seconds as f64;
    let step = settings.controls.volume_step;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.next(controller.len());
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.prev(controller.len());
        }
        KeyCode::Enter => {
            let Some(row) = view.tracks.get(app.selected) else {
                return false;
            };
            app.follow_playback_on();
            if let Err(e) = controller.select_id(row.id) {
                warn!(error = %e, "selected row is no longer in the playlist");
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') if view.can_toggle() => {
            app.follow_playback_on();
            controller.toggle_play_pause();
        }
        KeyCode::Char('l') if view.can_navigate() => {
            app.follow_playback_on();
            controller.next();
        }
        KeyCode::Char('h') if view.can_navigate() => {
            app.follow_playback_on();
            controller.previous();
        }
        KeyCode::Char('L') if view.can_toggle() => controller.seek_by(seek),
        KeyCode::Char('H') if view.can_toggle() => controller.seek_by(-seek),
        KeyCode::Char('+') | KeyCode::Char('=') => controller.adjust_volume(step),
        KeyCode::Char('-') => controller.adjust_volume(-step),
        KeyCode::Char('d') => {
            let Some(track) = controller.tracks().get(app.selected) else {
                return false;
            };
            let (id, name) = (track.id, track.display_name.clone());
            match controller.remove_track(id) {
                Ok(()) => app.set_notice(format!("Removed: {name}")),
                Err(e) => warn!(error = %e, "remove failed"),
            }
        }
        KeyCode::Char('e') => {
            let policy = controller.end_policy().toggled();
            controller.set_end_policy(policy);
            debug!(?policy, "end policy changed");
        }
        KeyCode::Char('R') => {
            let entries = scan_dirs(&app.dirs, &settings.library);
            let report = controller.replace_tracks(entries);
            app.follow_playback_on();
            app.set_notice(format!(
                "Reloaded: {} added, {} skipped, {} failed",
                report.accepted, report.skipped, report.failed
            ));
        }
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::FileEntry;
    use crate::media::{Generation, ResourceError, ResourceHandle};
    use crate::playlist::{ControllerOptions, EndPolicy, PlaybackState};
    use crossterm::event::KeyModifiers;

    #[derive(Default)]
    struct SilentMedia;

    impl MediaSource for SilentMedia {
        fn bind(&mut self, _: &ResourceHandle, _: Generation) {}
        fn unbind(&mut self) {}
        fn play(&mut self, _: Generation) {}
        fn pause(&mut self) {}
        fn seek(&mut self, _: Duration) {}
        fn set_volume(&mut self, _: f32) {}
    }

    #[derive(Default)]
    struct CountingResources {
        next: u64,
    }

    impl ResourceProvider for CountingResources {
        fn create(&mut self, entry: &FileEntry) -> Result<ResourceHandle, ResourceError> {
            self.next += 1;
            Ok(ResourceHandle::new(self.next, &entry.path))
        }

        fn release(&mut self, _: ResourceHandle) {}
    }

    fn press(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn setup(n: usize) -> (App, PlaylistController<SilentMedia, CountingResources>) {
        let mut controller = PlaylistController::new(
            SilentMedia,
            CountingResources::default(),
            ControllerOptions::default(),
        );
        controller.add_tracks(
            (0..n).map(|i| FileEntry::new(format!("t{i}"), format!("/m/t{i}.mp3"), "audio/mpeg")),
        );
        let mut app = App::new(Vec::new());
        app.sync_to(&controller.view());
        (app, controller)
    }

    #[test]
    fn cursor_keys_move_without_changing_playback() {
        let settings = config::Settings::default();
        let (mut app, mut c) = setup(3);

        assert!(!handle_key_event(press('k'), &settings, &mut app, &c.view(), &mut c));
        assert_eq!(app.selected, 2);
        assert!(!app.follow_playback);
        assert_eq!(c.current_index(), Some(0));

        handle_key_event(KeyEvent::from(KeyCode::Enter), &settings, &mut app, &c.view(), &mut c);
        assert_eq!(c.current_index(), Some(2));
        assert!(app.follow_playback);
    }

    #[test]
    fn transport_and_volume_keys_reach_the_controller() {
        let settings = config::Settings::default();
        let (mut app, mut c) = setup(2);

        handle_key_event(press('l'), &settings, &mut app, &c.view(), &mut c);
        assert_eq!(c.current_index(), Some(1));
        handle_key_event(press('h'), &settings, &mut app, &c.view(), &mut c);
        assert_eq!(c.current_index(), Some(0));

        handle_key_event(press(' '), &settings, &mut app, &c.view(), &mut c);
        assert_eq!(c.state(), PlaybackState::Paused);

        handle_key_event(press('-'), &settings, &mut app, &c.view(), &mut c);
        assert!((c.volume() - 0.95).abs() < 1e-6);

        handle_key_event(press('e'), &settings, &mut app, &c.view(), &mut c);
        assert_eq!(c.end_policy(), EndPolicy::StopAtEnd);
    }

    #[test]
    fn remove_key_drops_track_under_cursor() {
        let settings = config::Settings::default();
        let (mut app, mut c) = setup(3);
        app.selected = 1;

        handle_key_event(press('d'), &settings, &mut app, &c.view(), &mut c);
        assert_eq!(c.len(), 2);
        assert_eq!(c.current_index(), Some(0));
        assert_eq!(app.notice.as_deref(), Some("Removed: t1"));
    }

    #[test]
    fn quit_key_requests_shutdown() {
        let settings = config::Settings::default();
        let (mut app, mut c) = setup(0);
        assert!(handle_key_event(press('q'), &settings, &mut app, &c.view(), &mut c));
        assert!(!handle_key_event(press('j'), &settings, &mut app, &c.view(), &mut c));
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn transport_keys_follow_the_view_affordances() {
        let settings = config::Settings::default();
        let (mut app, mut c) = setup(2);
        app.follow_playback_off();

        // The snapshot on screen shows an empty playlist.
        let mut empty = c.view();
        empty.tracks.clear();
        empty.current_index = None;
        assert!(!empty.can_navigate());
        assert!(!empty.can_toggle());

        for key in [press('l'), press('h'), press(' '), press('L'), KeyEvent::from(KeyCode::Enter)] {
            assert!(!handle_key_event(key, &settings, &mut app, &empty, &mut c));
        }
        assert_eq!(c.current_index(), Some(0));
        assert_eq!(c.state(), PlaybackState::Loading);
        assert!(!app.follow_playback);
    }
}
