//! Append-only log of every query enqueued with `play`, one per line. The log is
//! the pool autoplay draws from.

use rand::seq::IndexedRandom;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::music_manager::MusicResult;

pub struct SongHistory {
    path: PathBuf,
    entries: Mutex<Vec<String>>,
}

impl SongHistory {
    /// Reads the log at `path`. A missing file is an empty history; lines are
    /// taken as-is apart from skipping blank ones.
    pub async fn load(path: impl Into<PathBuf>) -> MusicResult<Self> {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No song history at {:?}, starting empty", path);
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} songs from history {:?}", entries.len(), path);
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Remembers `query` and appends it to the log. The in-memory pool is
    /// updated even if the write fails.
    pub async fn record(&self, query: &str) -> MusicResult<()> {
        let line = query.replace(['\r', '\n'], " ");
        self.entries.lock().await.push(line.clone());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{line}\n").as_bytes()).await?;
        file.flush().await?;

        debug!("Recorded '{}' in song history", line);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Unique queries, in order of first request
    pub async fn distinct(&self) -> Vec<String> {
        let entries = self.entries.lock().await;
        let mut seen = HashSet::new();
        entries
            .iter()
            .filter(|entry| seen.insert(entry.as_str()))
            .cloned()
            .collect()
    }

    /// A uniformly random pick among the unique queries
    pub async fn pick_random(&self) -> Option<String> {
        let distinct = self.distinct().await;
        distinct.choose(&mut rand::rng()).cloned()
    }
}
