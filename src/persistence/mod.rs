//! Score persistence
//!
//! The simulation only sees [`ScoreRequest`]s and fetched entry lists. Stores
//! here do the actual work:
//! - `MemoryScoreStore`: in-process, for tests and demos
//! - `JsonFileScoreStore`: versionless JSON file with tmp-then-rename writes
//! - `LocalStorageScoreStore`: browser LocalStorage (wasm32 only)
//!
//! `ScoreWorker` runs a store on a background thread so requests never stall
//! the frame loop.

use std::fmt;

use crate::highscores::{HighScores, MAX_HIGH_SCORES, ScoreEntry, ScoreRequest};
use crate::platform::now_ms;

/// Failure talking to a score store
#[derive(Debug)]
pub enum ScoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Backing storage not reachable
    Unavailable,
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::Io(e) => write!(f, "score storage I/O error: {}", e),
            ScoreError::Json(e) => write!(f, "score data malformed: {}", e),
            ScoreError::Unavailable => write!(f, "score storage unavailable"),
        }
    }
}

impl std::error::Error for ScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScoreError::Io(e) => Some(e),
            ScoreError::Json(e) => Some(e),
            ScoreError::Unavailable => None,
        }
    }
}

impl From<std::io::Error> for ScoreError {
    fn from(e: std::io::Error) -> Self {
        ScoreError::Io(e)
    }
}

impl From<serde_json::Error> for ScoreError {
    fn from(e: serde_json::Error) -> Self {
        ScoreError::Json(e)
    }
}

/// Where finished matches are stored
pub trait ScoreStore {
    /// Top entries, score-descending, at most [`MAX_HIGH_SCORES`]
    fn fetch_scores(&mut self) -> Result<Vec<ScoreEntry>, ScoreError>;

    /// Store a score and return the stored entry
    fn submit_score(&mut self, name: &str, score: u64) -> Result<ScoreEntry, ScoreError>;
}

fn new_entry(name: &str, score: u64) -> ScoreEntry {
    ScoreEntry {
        name: name.to_string(),
        score,
        date: now_ms(),
    }
}

/// Scores kept in memory only
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    scores: HighScores,
    /// Fail every call (for exercising error paths)
    pub offline: bool,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn fetch_scores(&mut self) -> Result<Vec<ScoreEntry>, ScoreError> {
        if self.offline {
            return Err(ScoreError::Unavailable);
        }
        Ok(self.scores.entries.clone())
    }

    fn submit_score(&mut self, name: &str, score: u64) -> Result<ScoreEntry, ScoreError> {
        if self.offline {
            return Err(ScoreError::Unavailable);
        }
        let entry = new_entry(name, score);
        self.scores.insert(entry.clone());
        Ok(entry)
    }
}

/// Scores in a JSON file on disk
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileScoreStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileScoreStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<HighScores, ScoreError> {
        if !self.path.exists() {
            log::info!("No high scores file at {:?}, starting fresh", self.path);
            return Ok(HighScores::new());
        }
        let json = std::fs::read_to_string(&self.path)?;
        let scores: HighScores = serde_json::from_str(&json)?;
        Ok(HighScores::from_entries(scores.entries))
    }

    fn save(&self, scores: &HighScores) -> Result<(), ScoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(scores)?;
        // Write beside the target, then swap in
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for JsonFileScoreStore {
    fn fetch_scores(&mut self) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(self.load()?.entries)
    }

    fn submit_score(&mut self, name: &str, score: u64) -> Result<ScoreEntry, ScoreError> {
        let mut scores = self.load()?;
        let entry = new_entry(name, score);
        if scores.insert(entry.clone()).is_some() {
            self.save(&scores)?;
        }
        Ok(entry)
    }
}

/// Scores in browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageScoreStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageScoreStore {
    const STORAGE_KEY: &'static str = "brick_rally_highscores";

    fn storage() -> Result<web_sys::Storage, ScoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(ScoreError::Unavailable)
    }

    fn load() -> Result<HighScores, ScoreError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                let scores: HighScores = serde_json::from_str(&json)?;
                Ok(HighScores::from_entries(scores.entries))
            }
            Ok(None) => Ok(HighScores::new()),
            Err(_) => Err(ScoreError::Unavailable),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageScoreStore {
    fn fetch_scores(&mut self) -> Result<Vec<ScoreEntry>, ScoreError> {
        Ok(Self::load()?.entries)
    }

    fn submit_score(&mut self, name: &str, score: u64) -> Result<ScoreEntry, ScoreError> {
        let mut scores = Self::load()?;
        let entry = new_entry(name, score);
        if scores.insert(entry.clone()).is_some() {
            let json = serde_json::to_string(&scores)?;
            Self::storage()?
                .set_item(Self::STORAGE_KEY, &json)
                .map_err(|_| ScoreError::Unavailable)?;
            log::info!("High scores saved ({} entries)", scores.entries.len());
        }
        Ok(entry)
    }
}

/// Run one request against a store, returning the refreshed list
///
/// A failed submit is logged and the board is still re-fetched.
pub fn service<S: ScoreStore + ?Sized>(
    store: &mut S,
    request: &ScoreRequest,
) -> Result<Vec<ScoreEntry>, ScoreError> {
    if let ScoreRequest::Submit { name, score } = request {
        match store.submit_score(name, *score) {
            Ok(entry) => log::info!("Stored score {} for {}", entry.score, entry.name),
            Err(e) => log::warn!("Failed to submit score: {}", e),
        }
    }
    let mut entries = store.fetch_scores()?;
    entries.truncate(MAX_HIGH_SCORES);
    Ok(entries)
}

/// Background thread servicing score requests one at a time
#[cfg(not(target_arch = "wasm32"))]
pub struct ScoreWorker {
    requests: std::sync::mpsc::Sender<ScoreRequest>,
    results: std::sync::mpsc::Receiver<Result<Vec<ScoreEntry>, ScoreError>>,
    in_flight: std::cell::Cell<usize>,
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreWorker {
    /// Move `store` onto a worker thread
    pub fn spawn<S: ScoreStore + Send + 'static>(mut store: S) -> Self {
        use std::sync::mpsc::channel;

        let (req_tx, req_rx) = channel::<ScoreRequest>();
        let (res_tx, res_rx) = channel();

        std::thread::spawn(move || {
            for request in req_rx {
                let result = service(&mut store, &request);
                if res_tx.send(result).is_err() {
                    break;
                }
            }
            log::debug!("Score worker stopped");
        });

        Self {
            requests: req_tx,
            results: res_rx,
            in_flight: std::cell::Cell::new(0),
        }
    }

    /// Queue a request; never blocks
    pub fn request(&self, request: ScoreRequest) {
        if self.requests.send(request).is_err() {
            log::warn!("Score worker is gone, request dropped");
            return;
        }
        self.in_flight.set(self.in_flight.get() + 1);
    }

    /// Requests queued but not yet collected
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    /// Latest completed result, if any arrived since the last poll
    pub fn poll(&self) -> Option<Result<Vec<ScoreEntry>, ScoreError>> {
        let mut latest = None;
        for result in self.results.try_iter() {
            self.in_flight.set(self.in_flight.get().saturating_sub(1));
            latest = Some(result);
        }
        latest
    }

    /// Block until the next result arrives; `None` when nothing is queued
    pub fn wait(&self) -> Option<Result<Vec<ScoreEntry>, ScoreError>> {
        if self.in_flight.get() == 0 {
            return None;
        }
        let result = self.results.recv().ok();
        self.in_flight.set(self.in_flight.get().saturating_sub(1));
        result
    }

    /// Block until every queued request is done, returning the last result
    pub fn finish(&self) -> Option<Result<Vec<ScoreEntry>, ScoreError>> {
        let mut latest = None;
        while let Some(result) = self.wait() {
            latest = Some(result);
        }
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_orders_and_caps() {
        let mut store = MemoryScoreStore::new();
        for i in 1..=12 {
            store.submit_score("p", i * 10).expect("online");
        }
        let entries = store.fetch_scores().expect("online");
        assert_eq!(entries.len(), MAX_HIGH_SCORES);
        assert_eq!(entries[0].score, 120);
        assert_eq!(entries[9].score, 30);
    }

    #[test]
    fn test_submit_returns_entry() {
        let mut store = MemoryScoreStore::new();
        let entry = store.submit_score("ann", 70).expect("online");
        assert_eq!(entry.name, "ann");
        assert_eq!(entry.score, 70);
        assert!(entry.date > 0.0);
    }

    #[test]
    fn test_service_submit_then_fetch() {
        let mut store = MemoryScoreStore::new();
        let request = ScoreRequest::Submit {
            name: "bo".to_string(),
            score: 40,
        };
        let entries = service(&mut store, &request).expect("online");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "bo");
    }

    #[test]
    fn test_service_offline_is_error() {
        let mut store = MemoryScoreStore::new();
        store.offline = true;
        let result = service(&mut store, &ScoreRequest::Refresh);
        assert!(matches!(result, Err(ScoreError::Unavailable)));
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("brick-rally-test-{}", std::process::id()));
        let path = dir.join("scores.json");
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileScoreStore::new(&path);
        assert!(store.fetch_scores().expect("empty").is_empty());
        store.submit_score("ann", 300).expect("write");
        store.submit_score("bo", 500).expect("write");

        let mut reopened = JsonFileScoreStore::new(&path);
        let names: Vec<_> = reopened
            .fetch_scores()
            .expect("read")
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["bo", "ann"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_json_file_store_corrupt_is_error() {
        let dir = std::env::temp_dir().join(format!("brick-rally-corrupt-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("scores.json");
        std::fs::write(&path, "not json").expect("write");

        let mut store = JsonFileScoreStore::new(&path);
        assert!(matches!(store.fetch_scores(), Err(ScoreError::Json(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_worker_services_requests_in_order() {
        let worker = ScoreWorker::spawn(MemoryScoreStore::new());
        worker.request(ScoreRequest::Submit {
            name: "ann".to_string(),
            score: 90,
        });
        worker.request(ScoreRequest::Refresh);

        let first = worker.wait().expect("result").expect("online");
        assert_eq!(first.len(), 1);
        let second = worker.wait().expect("result").expect("online");
        assert_eq!(second[0].score, 90);
        assert_eq!(worker.in_flight(), 0);
        assert!(worker.wait().is_none());
    }

    #[test]
    fn test_worker_finish_drains_queue() {
        let worker = ScoreWorker::spawn(MemoryScoreStore::new());
        for score in [10, 30, 20] {
            worker.request(ScoreRequest::Submit {
                name: "p".to_string(),
                score,
            });
        }
        let last = worker.finish().expect("result").expect("online");
        let scores: Vec<_> = last.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![30, 20, 10]);
        assert!(worker.poll().is_none());
    }
}
