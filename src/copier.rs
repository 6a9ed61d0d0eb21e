use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::locate::SubtitleSet;

/// Copy each located subtitle next to the imported media file.
///
/// The destination keeps the media file's directory and stem and swaps the
/// extension for the category suffix, so `movie.mkv` gains `movie.en.srt`,
/// `movie.en.sdh.srt` and `movie.en.forced.srt`. Existing files are
/// overwritten. A failed copy is logged and the remaining categories are
/// still attempted. Returns the number of files copied.
pub fn copy_subtitles(set: &SubtitleSet, media_path: &Path, dry_run: bool) -> usize {
    let targets = [
        (&set.full, "en.srt"),
        (&set.sdh, "en.sdh.srt"),
        (&set.forced, "en.forced.srt"),
    ];

    let mut copied = 0;
    for (subtitle, suffix) in targets {
        let Some(src) = subtitle else {
            continue;
        };
        let dest = media_path.with_extension(suffix);

        if dry_run {
            info!("would copy {} to {}", src.display(), dest.display());
            continue;
        }

        info!("copying {} to {}", src.display(), dest.display());
        match fs::copy(src, &dest) {
            Ok(_) => copied += 1,
            Err(e) => {
                // The sibling categories may still be copyable.
                error!("failed to copy {} to {}: {e}", src.display(), dest.display());
            }
        }
    }

    copied
}
