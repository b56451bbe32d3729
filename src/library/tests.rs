use std::fs;
use std::path::Path;

use tempfile::tempdir;

use super::*;
use crate::config::{DisplayField, LibrarySettings};

fn filename_settings() -> LibrarySettings {
    LibrarySettings {
        display_fields: vec![DisplayField::Filename],
        ..LibrarySettings::default()
    }
}

#[test]
fn display_from_fields_can_format_artist_title() {
    let p = Path::new("/tmp/Song.mp3");
    let fields = [DisplayField::Artist, DisplayField::Title];
    assert_eq!(
        display_from_fields(p, Some("Song"), Some("  Artist  "), None, &fields, " - "),
        "Artist - Song"
    );
    assert_eq!(
        display_from_fields(p, Some("Song"), None, None, &fields, " - "),
        "Song"
    );
}

#[test]
fn display_from_fields_falls_back_to_file_stem_without_tags() {
    let p = Path::new("/music/01 Intro.flac");
    assert_eq!(
        display_from_fields(
            p,
            None,
            Some("   "),
            None,
            &[DisplayField::Artist, DisplayField::Title],
            " - "
        ),
        "01 Intro"
    );
}

#[test]
fn file_entry_is_audio_checks_mime_prefix() {
    assert!(FileEntry::new("a", "/a.mp3", "audio/mpeg").is_audio());
    assert!(FileEntry::new("a", "/a.mp3", "Audio/MPEG").is_audio());
    assert!(!FileEntry::new("a", "/a.txt", "text/plain").is_audio());
    assert!(!FileEntry::new("a", "/a", "audio").is_audio());
    assert!(!FileEntry::new("a", "/a", "").is_audio());
}

#[test]
fn mime_for_path_uses_configured_extensions_case_insensitive() {
    let settings = LibrarySettings::default();
    assert_eq!(mime_for_path(Path::new("/a.MP3"), &settings), "audio/mpeg");
    assert_eq!(mime_for_path(Path::new("/a.flac"), &settings), "audio/flac");
    assert_eq!(mime_for_path(Path::new("/a.m4a"), &settings), "audio/mp4");
    assert_eq!(
        mime_for_path(Path::new("/a.txt"), &settings),
        "application/octet-stream"
    );
    assert_eq!(
        mime_for_path(Path::new("/noext"), &settings),
        "application/octet-stream"
    );

    let custom = LibrarySettings {
        extensions: vec![".WMA".to_string()],
        ..LibrarySettings::default()
    };
    assert_eq!(mime_for_path(Path::new("/a.wma"), &custom), "audio/x-wma");
    assert_eq!(
        mime_for_path(Path::new("/a.mp3"), &custom),
        "application/octet-stream"
    );
}

#[test]
fn scan_classifies_files_and_sorts_by_display_case_insensitive() {
    let dir = tempdir().unwrap();

    fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
    fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

    let entries = scan(dir.path(), &filename_settings());
    let names: Vec<&str> = entries.iter().map(|e| e.display_name.as_str()).collect();
    assert_eq!(names, vec!["A", "b", "c.txt"]);
    assert!(entries[0].is_audio());
    assert!(entries[1].is_audio());
    assert!(!entries[2].is_audio());
}

#[test]
fn scan_skips_hidden_files_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
    fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

    let entries = scan(dir.path(), &filename_settings());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].display_name, "visible");

    let with_hidden = LibrarySettings {
        include_hidden: true,
        ..filename_settings()
    };
    assert_eq!(scan(dir.path(), &with_hidden).len(), 2);
}

#[test]
fn scan_respects_recursive_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp3"), b"not real").unwrap();

    let settings = LibrarySettings {
        recursive: false,
        ..filename_settings()
    };
    let entries = scan(dir.path(), &settings);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].display_name, "root");
}

#[test]
fn scan_respects_max_depth() {
    let dir = tempdir().unwrap();
    let d1 = dir.path().join("d1");
    let d2 = d1.join("d2");
    fs::create_dir_all(&d2).unwrap();
    fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
    fs::write(d1.join("one.mp3"), b"not real").unwrap();
    fs::write(d2.join("two.mp3"), b"not real").unwrap();

    // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
    let settings = LibrarySettings {
        max_depth: Some(2),
        ..filename_settings()
    };
    let names: Vec<String> = scan(dir.path(), &settings)
        .into_iter()
        .map(|e| e.display_name)
        .collect();
    assert!(names.contains(&"root".to_string()));
    assert!(names.contains(&"one".to_string()));
    assert!(!names.contains(&"two".to_string()));
}
