//! Path utilities for naming conversion inputs and outputs.
//!
//! Uploaded file names come from the browser and custom names are typed by
//! the user, so every function here works on the final path component only.
//! A name like `../../etc/passwd` reduces to `passwd`.

use std::path::Path;

/// Extension appended to every converted file.
pub const OUTPUT_EXTENSION: &str = "mp3";

/// Base name used when neither a custom name nor a source name is usable.
pub const FALLBACK_BASE_NAME: &str = "audio";

/// Container extensions we keep when staging an upload on disk.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "m4v", "mov", "mkv", "webm", "avi", "ts", "flv", "wmv",
];

/// Container extension used for uploads without a recognised extension.
const DEFAULT_CONTAINER_EXTENSION: &str = "mp4";

/// Return the final component of a name, accepting both `/` and `\` separators.
///
/// # Examples
///
/// ```
/// use mp3forge_common::paths::final_component;
///
/// assert_eq!(final_component("C:\\Users\\me\\clip.mp4"), "clip.mp4");
/// assert_eq!(final_component("videos/clip.mp4"), "clip.mp4");
/// assert_eq!(final_component("clip.mp4"), "clip.mp4");
/// ```
pub fn final_component(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Strip the last extension from a file name.
///
/// A leading dot is not treated as an extension separator, so `.mp4`
/// stays `.mp4`.
///
/// # Examples
///
/// ```
/// use mp3forge_common::paths::strip_extension;
///
/// assert_eq!(strip_extension("clip.mp4"), "clip");
/// assert_eq!(strip_extension("my.holiday.mp4"), "my.holiday");
/// assert_eq!(strip_extension("clip"), "clip");
/// assert_eq!(strip_extension(".mp4"), ".mp4");
/// ```
pub fn strip_extension(name: &str) -> &str {
    let name = final_component(name);
    let stem_start = name.len() - name.trim_start_matches('.').len();

    match name[stem_start..].rfind('.') {
        Some(idx) => &name[..stem_start + idx],
        None => name,
    }
}

/// Derive the download name for a conversion.
///
/// A non-empty custom base name wins; otherwise the source name without its
/// extension is used. `.mp3` is always appended.
///
/// # Examples
///
/// ```
/// use mp3forge_common::paths::output_file_name;
///
/// assert_eq!(output_file_name("clip.mp4", None), "clip.mp3");
/// assert_eq!(output_file_name("clip.mp4", Some("")), "clip.mp3");
/// assert_eq!(output_file_name("clip.mp4", Some("song")), "song.mp3");
/// ```
pub fn output_file_name(source_name: &str, custom_base_name: Option<&str>) -> String {
    let custom = custom_base_name
        .map(|n| final_component(n.trim()).trim())
        .filter(|n| !n.is_empty());

    let base = match custom {
        Some(name) => name,
        None => strip_extension(source_name.trim()),
    };

    let base = if base.is_empty() || base == "." || base == ".." {
        FALLBACK_BASE_NAME
    } else {
        base
    };

    format!("{}.{}", base, OUTPUT_EXTENSION)
}

/// Check if a path has a video container extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use mp3forge_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("clip.MP4")));
/// assert!(is_video_file(Path::new("/path/to/video.mkv")));
/// assert!(!is_video_file(Path::new("song.mp3")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Extension to use when writing an uploaded container to disk.
///
/// Known video extensions are kept (lowercased) so the decoder can use them
/// as a format hint; anything else is staged as `mp4`.
pub fn staging_extension(source_name: &str) -> String {
    let path = Path::new(final_component(source_name));
    if is_video_file(path) {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_else(|| DEFAULT_CONTAINER_EXTENSION.to_string())
    } else {
        DEFAULT_CONTAINER_EXTENSION.to_string()
    }
}
