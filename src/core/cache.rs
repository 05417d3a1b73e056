use crate::domain::model::AggregateResult;
use crate::domain::ports::TimeProvider;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

struct CacheEntry {
    result: AggregateResult,
    timestamp: i64,
    /// 同一毫秒插入時用來決定淘汰順序
    sequence: u64,
}

struct CacheState {
    entries: HashMap<String, CacheEntry>,
    next_sequence: u64,
}

/// 搜尋結果快取：TTL 到期視為未命中，超過容量時淘汰最舊的一筆
pub struct SearchCache {
    ttl_millis: i64,
    capacity: usize,
    clock: Arc<dyn TimeProvider>,
    state: Mutex<CacheState>,
}

impl SearchCache {
    pub fn new(ttl: Duration, capacity: usize, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            ttl_millis: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            capacity,
            clock,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                next_sequence: 0,
            }),
        }
    }

    pub async fn get(&self, key: &str) -> Option<AggregateResult> {
        let now = self.clock.now_millis();
        let mut state = self.state.lock().await;

        let expired = match state.entries.get(key) {
            Some(entry) => now.saturating_sub(entry.timestamp) >= self.ttl_millis,
            None => return None,
        };
        if expired {
            tracing::debug!(key, "Cache entry expired");
            state.entries.remove(key);
            return None;
        }

        state.entries.get(key).map(|entry| {
            let mut result = entry.result.clone();
            result.cached = true;
            result
        })
    }

    pub async fn insert(&self, key: String, result: AggregateResult) {
        let timestamp = self.clock.now_millis();
        let mut state = self.state.lock().await;

        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.entries.insert(
            key,
            CacheEntry {
                result,
                timestamp,
                sequence,
            },
        );

        if state.entries.len() > self.capacity {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, entry)| (entry.timestamp, entry.sequence))
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                tracing::debug!(key = %oldest, "Evicting oldest cache entry");
                state.entries.remove(&oldest);
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.state.lock().await.entries.clear();
    }
}

/// 快取鍵：排序後的技能與地區名稱，順序不同視為同一查詢
pub fn cache_key(skills: &[String], region_names: &[String]) -> String {
    let mut skills = skills.to_vec();
    skills.sort();
    let mut locations = region_names.to_vec();
    locations.sort();

    serde_json::json!({ "skills": skills, "locations": locations }).to_string()
}
