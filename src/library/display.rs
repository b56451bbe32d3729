use std::path::Path;

use crate::config::DisplayField;

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Build the display name of a file from its tags.
///
/// Fields are composed in the configured order; missing tags are skipped.
/// When nothing was produced the file stem is used, so untagged files still
/// get a readable name.
pub fn display_from_fields(
    path: &Path,
    title: Option<&str>,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[DisplayField],
    sep: &str,
) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str());

    let parts: Vec<String> = fields
        .iter()
        .filter_map(|f| match f {
            DisplayField::Title => non_blank(title).map(str::to_string),
            DisplayField::Artist => non_blank(artist).map(str::to_string),
            DisplayField::Album => non_blank(album).map(str::to_string),
            DisplayField::Filename => non_blank(stem).map(str::to_string),
            DisplayField::Path => Some(path.display().to_string()),
        })
        .collect();

    if !parts.is_empty() {
        return parts.join(sep);
    }

    non_blank(title)
        .or(non_blank(stem))
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
