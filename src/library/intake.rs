use std::path::Path;

use lofty::file::TaggedFileExt;
use lofty::tag::Accessor;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::display_from_fields;
use super::model::FileEntry;

const OCTET_STREAM: &str = "application/octet-stream";

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn audio_mime(ext: &str) -> String {
    let subtype = match ext {
        "mp3" => "mpeg",
        "flac" => "flac",
        "wav" => "wav",
        "ogg" | "oga" => "ogg",
        "opus" => "opus",
        "m4a" => "mp4",
        "aac" => "aac",
        other => return format!("audio/x-{other}"),
    };
    format!("audio/{subtype}")
}

/// Classify `path` by extension. Extensions listed in `settings` map to an
/// `audio/*` type, everything else is `application/octet-stream`.
pub fn mime_for_path(path: &Path, settings: &LibrarySettings) -> String {
    let Some(ext) = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
    else {
        return OCTET_STREAM.to_string();
    };

    if normalized_extensions(settings).iter().any(|e| e == &ext) {
        audio_mime(&ext)
    } else {
        OCTET_STREAM.to_string()
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn entry_for(path: &Path, settings: &LibrarySettings) -> FileEntry {
    let mime_type = mime_for_path(path, settings);

    if !mime_type.starts_with("audio/") {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN");
        return FileEntry::new(name, path, mime_type);
    }

    let mut title: Option<String> = None;
    let mut artist: Option<String> = None;
    let mut album: Option<String> = None;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                title = tag.title().map(|v| v.into_owned());
                artist = tag.artist().map(|v| v.into_owned());
                album = tag.album().map(|v| v.into_owned());
            }
        }
        Err(e) => debug!(path = %path.display(), error = %e, "no readable tags"),
    }

    let display = display_from_fields(
        path,
        title.as_deref(),
        artist.as_deref(),
        album.as_deref(),
        &settings.display_fields,
        &settings.display_separator,
    );

    FileEntry::new(display, path, mime_type)
}

/// Walk `dir` and return one entry per regular file, sorted by display name
/// (case-insensitive). Non-audio files are included; the playlist filters them.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<FileEntry> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut entries: Vec<FileEntry> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file())
        .map(|e| entry_for(e.path(), settings))
        .collect();

    entries.sort_by_key(|e| e.display_name.to_lowercase());
    debug!(dir = %dir.display(), files = entries.len(), "scanned directory");
    entries
}
