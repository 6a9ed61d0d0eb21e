use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Subtitle files below this size are presumed to cover only forced
/// (untranslated-dialogue) segments rather than a full transcription.
const FORCED_SIZE_THRESHOLD: u64 = 10240;

/// How to tell full, SDH and forced subtitles apart, per release-group
/// convention. Groups never label their files consistently, so the
/// classification leans on file sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Exact RARBG-style names (`2_English.srt` etc.), with the size rules
    /// as fallback. Naming turned out too inconsistent to use by default.
    ByName,
    /// Size-ordered classification, the default.
    BySize,
    /// VTX releases order the same size buckets differently.
    VtxVariant,
}

/// A release-group marker substring mapped to the strategy it selects.
/// Extra rules can be supplied through the config file.
#[derive(Debug, Deserialize)]
pub struct MarkerRule {
    pub marker: String,
    pub strategy: Strategy,
}

const BUILTIN_MARKERS: &[(&str, Strategy)] = &[
    ("vxt", Strategy::VtxVariant),
    ("rarbg", Strategy::BySize),
];

/// Pick the locate strategy from the download's source folder name.
/// Unrecognized sources get the size-based default.
pub fn strategy_for_source(folder_name: &str, extra: &[MarkerRule]) -> Strategy {
    let name = folder_name.to_lowercase();
    for rule in extra {
        if name.contains(&rule.marker.to_lowercase()) {
            return rule.strategy;
        }
    }
    for (marker, strategy) in BUILTIN_MARKERS {
        if name.contains(marker) {
            return *strategy;
        }
    }
    Strategy::BySize
}

/// The subtitles located for one import. Any category may be absent.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SubtitleSet {
    pub full: Option<PathBuf>,
    pub sdh: Option<PathBuf>,
    pub forced: Option<PathBuf>,
}

impl SubtitleSet {
    pub fn is_empty(&self) -> bool {
        self.full.is_none() && self.sdh.is_none() && self.forced.is_none()
    }

    fn assign(&mut self, category: Category, path: PathBuf) {
        match category {
            Category::Full => self.full = Some(path),
            Category::Sdh => self.sdh = Some(path),
            Category::Forced => self.forced = Some(path),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Category {
    Full,
    Sdh,
    Forced,
}

struct CandidateFile {
    path: PathBuf,
    size: u64,
}

/// How a strategy maps size-ordered candidates onto categories.
struct SizeRules {
    /// A lone subtitle file.
    single: Category,
    /// Two files, the smaller one under the forced-size threshold:
    /// (smaller, larger).
    two_under: (Category, Category),
    /// Two files, both at or above the threshold: (smaller, larger).
    two_over: (Category, Category),
    /// Three files, ascending by size.
    three: [Category; 3],
}

const BY_SIZE_RULES: SizeRules = SizeRules {
    single: Category::Full,
    two_under: (Category::Forced, Category::Full),
    two_over: (Category::Full, Category::Sdh),
    three: [Category::Forced, Category::Full, Category::Sdh],
};

const VTX_RULES: SizeRules = SizeRules {
    single: Category::Forced,
    two_under: (Category::Full, Category::Sdh),
    two_over: (Category::Forced, Category::Sdh),
    three: [Category::Full, Category::Forced, Category::Sdh],
};

/// Classify the `.srt` files in `dir` into full/SDH/forced.
///
/// A missing folder is normal (not every release ships subtitles) and yields
/// an empty set; only real filesystem errors propagate.
pub fn locate_subtitles(dir: &Path, strategy: Strategy) -> Result<SubtitleSet> {
    if !dir.is_dir() {
        debug!("{} is not a directory, nothing to classify", dir.display());
        return Ok(SubtitleSet::default());
    }

    match strategy {
        Strategy::ByName => locate_by_name(dir),
        Strategy::BySize => Ok(classify(collect_candidates(dir)?, &BY_SIZE_RULES)),
        Strategy::VtxVariant => Ok(classify(collect_candidates(dir)?, &VTX_RULES)),
    }
}

/// List the `.srt` files to classify, preferring files named "english",
/// sorted by size ascending (filename order breaks ties).
fn collect_candidates(dir: &Path) -> Result<Vec<CandidateFile>> {
    let mut srt_files = Vec::new();

    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".srt") {
            continue;
        }
        let size = entry.metadata()?.len();
        srt_files.push(CandidateFile { path, size });
    }

    srt_files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

    debug!("filtering {} .srt file(s) to English subs", srt_files.len());
    let (mut candidates, rest): (Vec<_>, Vec<_>) = srt_files.into_iter().partition(|c| {
        c.path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_lowercase().contains("english"))
            .unwrap_or(false)
    });

    // Folders with no "english"-named file still get processed using every
    // .srt present. Plenty of releases name their only subtitle after the
    // movie instead.
    if candidates.is_empty() {
        candidates = rest;
    }

    candidates.sort_by_key(|c| c.size);
    Ok(candidates)
}

fn classify(mut candidates: Vec<CandidateFile>, rules: &SizeRules) -> SubtitleSet {
    let mut set = SubtitleSet::default();

    if candidates.len() > 3 {
        warn!(
            "found {} English subs, only considering the 3 smallest",
            candidates.len()
        );
        candidates.truncate(3);
    }

    let mut files = candidates.into_iter();
    match (files.next(), files.next(), files.next()) {
        (None, ..) => {
            info!("no English subs found");
        }
        (Some(only), None, _) => {
            set.assign(rules.single, only.path);
        }
        (Some(smaller), Some(larger), None) => {
            let (small_cat, large_cat) = if smaller.size < FORCED_SIZE_THRESHOLD {
                warn!(
                    "{} is only {} bytes, using the partial-subtitle rules",
                    smaller.path.display(),
                    smaller.size
                );
                rules.two_under
            } else {
                rules.two_over
            };
            set.assign(small_cat, smaller.path);
            set.assign(large_cat, larger.path);
        }
        (Some(first), Some(second), Some(third)) => {
            let [a, b, c] = rules.three;
            set.assign(a, first.path);
            set.assign(b, second.path);
            set.assign(c, third.path);
        }
    }

    set
}

/// RARBG-style lookup by exact file name. When neither the full nor the SDH
/// name is present the naming convention clearly isn't in use, so fall back
/// to the size rules.
fn locate_by_name(dir: &Path) -> Result<SubtitleSet> {
    let mut set = SubtitleSet::default();

    let expected = [
        ("2_English.srt", Category::Full),
        ("3_English.srt", Category::Sdh),
        ("4_English.srt", Category::Forced),
    ];
    for (name, category) in expected {
        let path = dir.join(name);
        if path.is_file() {
            debug!("{} exists", path.display());
            set.assign(category, path);
        } else {
            debug!("{} not found", path.display());
        }
    }

    if set.full.is_none() && set.sdh.is_none() {
        debug!("no exactly-named subs in {}, using size rules", dir.display());
        return Ok(classify(collect_candidates(dir)?, &BY_SIZE_RULES));
    }

    Ok(set)
}
