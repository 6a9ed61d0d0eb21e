use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// The event this invocation was asked to handle, read from the environment
/// Radarr or Sonarr populates before calling the hook. Everything the
/// workflow needs is captured here once, at process entry.
#[derive(Debug, PartialEq, Eq)]
pub enum HookEvent {
    MovieDownload {
        source_folder: PathBuf,
        destination_path: PathBuf,
    },
    EpisodeDownload {
        destination_path: PathBuf,
        source_path: PathBuf,
        source_folder: PathBuf,
    },
    /// Connection test fired from the caller's UI; log-only.
    Test,
    /// Unrecognized event type, or no event variable at all.
    Unhandled(Option<String>),
}

impl HookEvent {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// The lookup is injectable so tests never touch the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(event_type) = lookup("radarr_eventtype") {
            return match event_type.as_str() {
                "Download" => Ok(HookEvent::MovieDownload {
                    source_folder: required(&lookup, "radarr_moviefile_sourcefolder")?,
                    destination_path: required(&lookup, "radarr_moviefile_path")?,
                }),
                "Test" => Ok(HookEvent::Test),
                _ => Ok(HookEvent::Unhandled(Some(event_type))),
            };
        }

        if let Some(event_type) = lookup("sonarr_eventtype") {
            return match event_type.as_str() {
                "Download" => Ok(HookEvent::EpisodeDownload {
                    destination_path: required(&lookup, "sonarr_episodefile_path")?,
                    source_path: required(&lookup, "sonarr_episodefile_sourcepath")?,
                    source_folder: required(&lookup, "sonarr_episodefile_sourcefolder")?,
                }),
                "Test" => Ok(HookEvent::Test),
                _ => Ok(HookEvent::Unhandled(Some(event_type))),
            };
        }

        Ok(HookEvent::Unhandled(None))
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(PathBuf::from)
        .with_context(|| format!("required environment variable {key} is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn from_map(map: &HashMap<String, String>) -> Result<HookEvent> {
        HookEvent::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_movie_download_event() {
        let map = env(&[
            ("radarr_eventtype", "Download"),
            ("radarr_moviefile_sourcefolder", "/downloads/Movie-VXT"),
            ("radarr_moviefile_path", "/movies/Movie (2020)/movie.mkv"),
        ]);
        assert_eq!(
            from_map(&map).unwrap(),
            HookEvent::MovieDownload {
                source_folder: PathBuf::from("/downloads/Movie-VXT"),
                destination_path: PathBuf::from("/movies/Movie (2020)/movie.mkv"),
            }
        );
    }

    #[test]
    fn test_episode_download_event() {
        let map = env(&[
            ("sonarr_eventtype", "Download"),
            ("sonarr_episodefile_path", "/tv/Show/S01/ep.mkv"),
            ("sonarr_episodefile_sourcepath", "/downloads/pack/Show.S01E02.mkv"),
            ("sonarr_episodefile_sourcefolder", "/downloads/pack"),
        ]);
        assert_eq!(
            from_map(&map).unwrap(),
            HookEvent::EpisodeDownload {
                destination_path: PathBuf::from("/tv/Show/S01/ep.mkv"),
                source_path: PathBuf::from("/downloads/pack/Show.S01E02.mkv"),
                source_folder: PathBuf::from("/downloads/pack"),
            }
        );
    }

    #[test]
    fn test_missing_companion_variable_is_fatal() {
        let map = env(&[("radarr_eventtype", "Download")]);
        let err = from_map(&map).unwrap_err();
        assert!(err.to_string().contains("radarr_moviefile_sourcefolder"));
    }

    #[test]
    fn test_test_event() {
        let map = env(&[("radarr_eventtype", "Test")]);
        assert_eq!(from_map(&map).unwrap(), HookEvent::Test);

        let map = env(&[("sonarr_eventtype", "Test")]);
        assert_eq!(from_map(&map).unwrap(), HookEvent::Test);
    }

    #[test]
    fn test_unknown_event_type() {
        let map = env(&[("sonarr_eventtype", "Rename")]);
        assert_eq!(
            from_map(&map).unwrap(),
            HookEvent::Unhandled(Some("Rename".to_string()))
        );
    }

    #[test]
    fn test_no_event_variable() {
        let map = env(&[]);
        assert_eq!(from_map(&map).unwrap(), HookEvent::Unhandled(None));
    }

    #[test]
    fn test_radarr_takes_precedence() {
        // Both present should not happen; Radarr is checked first.
        let map = env(&[
            ("radarr_eventtype", "Test"),
            ("sonarr_eventtype", "Download"),
        ]);
        assert_eq!(from_map(&map).unwrap(), HookEvent::Test);
    }
}
