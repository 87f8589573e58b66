//! In-memory statistics store implementation.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use loglens_core::result::AppResult;
use loglens_entity::stats::LogStats;

use crate::store::StatsStore;

/// Statistics store held in process memory, keyed by file id.
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    stats: Mutex<BTreeMap<String, LogStats>>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn insert(&self, stats: &LogStats) -> AppResult<bool> {
        let mut map = self.stats.lock().unwrap_or_else(|e| e.into_inner());
        if map.contains_key(&stats.file_id) {
            return Ok(false);
        }
        map.insert(stats.file_id.clone(), stats.clone());
        Ok(true)
    }

    async fn find_by_file_id(&self, file_id: &str) -> AppResult<Option<LogStats>> {
        let map = self.stats.lock().unwrap_or_else(|e| e.into_inner());
        Ok(map.get(file_id).cloned())
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<LogStats>> {
        let map = self.stats.lock().unwrap_or_else(|e| e.into_inner());
        let mut all: Vec<LogStats> = map.values().cloned().collect();
        all.sort_by(|a, b| b.processed_at.cmp(&a.processed_at));
        all.truncate(limit.max(0) as usize);
        Ok(all)
    }
}
