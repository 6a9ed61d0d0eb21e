use anyhow::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Directory name release groups use for bundled subtitles at the download
/// root.
const SUBS_DIR: &str = "Subs";

/// Movie downloads keep their subtitles directly under `Subs`.
pub fn movie_subs_folder(source_folder: &Path) -> PathBuf {
    source_folder.join(SUBS_DIR)
}

/// Resolve the folder holding one episode's subtitles.
///
/// Season packs nest per-episode subtitle folders under `Subs`, named after
/// the episode file (extension stripped). When that exact folder is missing,
/// fall back to matching the `SxxEyy` tag of the episode filename against
/// the folder names. `None` means the invocation should stop; the reason has
/// already been logged.
pub fn episode_subs_folder(source_folder: &Path, source_path: &Path) -> Result<Option<PathBuf>> {
    let base = source_folder.join(SUBS_DIR);
    if !base.is_dir() {
        error!("Subs folder {} does not exist, can't do anything", base.display());
        return Ok(None);
    }

    if let Some(stem) = source_path.file_stem() {
        let expected = base.join(stem);
        if expected.is_dir() {
            return Ok(Some(expected));
        }
    }

    let Some(episode_name) = source_path.file_name().and_then(|n| n.to_str()) else {
        error!("episode source path {} has no usable file name", source_path.display());
        return Ok(None);
    };

    let season_episode_re = Regex::new(r"(?i)s\d+e\d+").unwrap();

    let Some(tag) = season_episode_re.find(episode_name) else {
        error!("unable to locate subtitles folder for {episode_name}");
        return Ok(None);
    };

    // Index candidate folders by their SxxEyy tag, case-folded so S01E02
    // and s01e02 releases match up.
    let mut folders_by_tag: HashMap<String, PathBuf> = HashMap::new();
    for entry in fs::read_dir(&base)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(m) = season_episode_re.find(name) {
            folders_by_tag.insert(m.as_str().to_lowercase(), path);
        }
    }

    match folders_by_tag.remove(&tag.as_str().to_lowercase()) {
        Some(folder) => {
            info!("using {} for episode {}", folder.display(), episode_name);
            Ok(Some(folder))
        }
        None => {
            error!("unable to locate subtitles folder for {episode_name}");
            Ok(None)
        }
    }
}
