//! The on-disk frame store.
//!
//! [`FrameStore`] owns the mapping from (video identity, sampling interval,
//! optional category) to a frame directory. The filesystem itself is the
//! cache: a directory that exists is a complete entry and is returned
//! without rebuilding or inspecting its contents. There is no invalidation;
//! stale directories are deleted out of band by the caller.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs,
    path::{Path, PathBuf},
};

use crate::error::FrameError;

/// The identity token of a video, extracted from its locator string.
///
/// Parsed from the `v=<token>` component of a watch-style URL. The token is
/// used verbatim as a path segment of the frame directory.
///
/// # Example
///
/// ```
/// use frameprep::VideoId;
///
/// let id = VideoId::from_url("https://example.com/watch?v=dQw4w9WgXcQ")?;
/// assert_eq!(id.as_str(), "dQw4w9WgXcQ");
/// # Ok::<(), frameprep::FrameError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Extract the identity token from a locator string.
    ///
    /// Takes everything after the last `v=` in the string.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::VideoIdentity`] if the string has no `v=`
    /// component or the token after it is empty.
    pub fn from_url(url: &str) -> Result<Self, FrameError> {
        let token = url
            .rfind("v=")
            .map(|position| &url[position + 2..])
            .filter(|token| !token.is_empty())
            .ok_or_else(|| FrameError::VideoIdentity {
                url: url.to_string(),
            })?;
        Ok(Self(token.to_string()))
    }

    /// The raw identity token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VideoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// A directory-backed cache of prepared frame sets.
///
/// Paths are derived deterministically: the same (identity, interval,
/// category) triple always maps to the same directory, and distinct triples
/// never collide. No other component computes these paths.
///
/// Layout under the store root:
///
/// ```text
/// <root>/images/<id>_<interval_ms>/<offset_ms>.jpg
/// <root>/imagenet/<category>/prepared-video-frames/<id>_<interval_ms>/<offset_ms>.jpg
/// ```
#[derive(Debug, Clone)]
pub struct FrameStore {
    root: PathBuf,
}

impl FrameStore {
    /// Create a store rooted at `root`.
    ///
    /// The root is not created until the first build.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory a frame set for this triple lives in (whether or not
    /// it exists yet).
    pub fn directory_for(
        &self,
        video_id: &VideoId,
        interval_ms: u64,
        category: Option<&str>,
    ) -> PathBuf {
        let leaf = format!("{}_{}", video_id.as_str(), interval_ms);
        match category {
            Some(category) => self
                .root
                .join("imagenet")
                .join(category)
                .join("prepared-video-frames")
                .join(leaf),
            None => self.root.join("images").join(leaf),
        }
    }

    /// Return the frame directory for this triple, building it if absent.
    ///
    /// If the directory already exists it is returned immediately: the
    /// builder is never invoked and the contents are not validated. This is
    /// an at-most-once-build cache — a builder that failed partway on an
    /// earlier call leaves a partially-populated directory that later calls
    /// treat as a hit.
    ///
    /// On a miss the directory (and any missing parents) is created first,
    /// then `builder` is invoked with its path to populate it.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Io`] if the directory cannot be created, or
    /// whatever error the builder produces.
    pub fn get_or_build<F>(
        &self,
        video_id: &VideoId,
        interval_ms: u64,
        category: Option<&str>,
        builder: F,
    ) -> Result<PathBuf, FrameError>
    where
        F: FnOnce(&Path) -> Result<(), FrameError>,
    {
        let directory = self.directory_for(video_id, interval_ms, category);
        if directory.exists() {
            log::debug!("Frame cache hit: {}", directory.display());
            return Ok(directory);
        }

        log::debug!("Frame cache miss, building {}", directory.display());
        fs::create_dir_all(&directory)?;
        builder(&directory)?;
        log::info!("Built frame directory {}", directory.display());
        Ok(directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_taken_after_the_last_v_token() {
        let id = VideoId::from_url("https://example.com/watch?feature=x&v=abc123").unwrap();
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn id_parse_is_greedy() {
        // Two `v=` components: the token after the last one wins.
        let id = VideoId::from_url("https://example.com/watch?v=first&v=second").unwrap();
        assert_eq!(id.as_str(), "second");
    }

    #[test]
    fn missing_token_is_an_error() {
        assert!(matches!(
            VideoId::from_url("https://example.com/watch"),
            Err(FrameError::VideoIdentity { .. })
        ));
    }

    #[test]
    fn empty_token_is_an_error() {
        assert!(matches!(
            VideoId::from_url("https://example.com/watch?v="),
            Err(FrameError::VideoIdentity { .. })
        ));
    }

    #[test]
    fn generic_directory_layout() {
        let store = FrameStore::new("/data");
        let id = VideoId::from_url("x?v=abc").unwrap();
        assert_eq!(
            store.directory_for(&id, 2000, None),
            PathBuf::from("/data/images/abc_2000"),
        );
    }

    #[test]
    fn categorized_directory_layout() {
        let store = FrameStore::new("/data");
        let id = VideoId::from_url("x?v=abc").unwrap();
        assert_eq!(
            store.directory_for(&id, 2000, Some("n01440764")),
            PathBuf::from("/data/imagenet/n01440764/prepared-video-frames/abc_2000"),
        );
    }

    #[test]
    fn distinct_triples_map_to_distinct_paths() {
        let store = FrameStore::new("/data");
        let id_a = VideoId::from_url("x?v=a").unwrap();
        let id_b = VideoId::from_url("x?v=b").unwrap();

        let paths = [
            store.directory_for(&id_a, 1000, None),
            store.directory_for(&id_a, 2000, None),
            store.directory_for(&id_b, 1000, None),
            store.directory_for(&id_a, 1000, Some("cat")),
        ];
        for (i, left) in paths.iter().enumerate() {
            for right in &paths[i + 1..] {
                assert_ne!(left, right);
            }
        }
    }
}
