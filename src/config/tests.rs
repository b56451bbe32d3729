use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_tapedeck_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", "/tmp/tapedeck-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/tapedeck-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("tapedeck")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("tapedeck")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_end_policy_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
end_policy = "no-loop"
volume = 0.5

[audio]
quit_fade_out_ms = 0

[controls]
seek_seconds = 9
volume_step = 0.1

[ui]
header_text = "hello"
show_track_numbers = false

[library]
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false
max_depth = 3
display_fields = ["filename"]
display_separator = "::"

[log]
level = "debug"
file = "/tmp/tapedeck.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("TAPEDECK__CONTROLS__SEEK_SECONDS");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.end_policy, EndPolicySetting::StopAtEnd);
    assert_eq!(s.playback.volume, 0.5);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.controls.seek_seconds, 9);
    assert_eq!(s.controls.volume_step, 0.1);
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.ui.show_track_numbers);
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.max_depth, Some(3));
    assert_eq!(s.library.display_fields, vec![DisplayField::Filename]);
    assert_eq!(s.library.display_separator, "::");
    assert_eq!(s.log.level, "debug");
    assert_eq!(
        s.log.file,
        Some(std::path::PathBuf::from("/tmp/tapedeck.log"))
    );
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[controls]
seek_seconds = 30
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("TAPEDECK_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("TAPEDECK__CONTROLS__SEEK_SECONDS", "2");

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.seek_seconds, 2);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "TAPEDECK_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.end_policy, EndPolicySetting::Wrap);
    assert_eq!(s.controls.seek_seconds, 5);
    assert!(s.log.file.is_none());
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.playback.volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions = vec![" . ".to_string()];
    assert!(s.validate().is_err());
}

#[test]
fn default_settings_render_as_loadable_toml() {
    let rendered = Settings::default().to_toml().unwrap();
    assert!(rendered.contains("end_policy = \"wrap\""));
    assert!(!rendered.contains("max_depth"));

    let parsed: Settings = toml::from_str(&rendered).unwrap();
    assert_eq!(parsed.playback.end_policy, EndPolicySetting::Wrap);
    assert_eq!(parsed.library.display_fields, vec![DisplayField::Artist, DisplayField::Title]);
}
