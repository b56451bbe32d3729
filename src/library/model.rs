use std::path::PathBuf;

/// A file offered to the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub display_name: String,
    pub path: PathBuf,
    pub mime_type: String,
}

impl FileEntry {
    pub fn new(
        display_name: impl Into<String>,
        path: impl Into<PathBuf>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            path: path.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Whether the MIME type names an audio resource (`audio/*`).
    pub fn is_audio(&self) -> bool {
        self.mime_type
            .trim()
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("audio/"))
    }
}
