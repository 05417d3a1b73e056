use crate::domain::model::{Region, SourceResult};
use async_trait::async_trait;

/// 單一外部求職來源。實作不得向外傳遞錯誤，失敗時回傳 `status: error`。
#[async_trait]
pub trait JobSource: Send + Sync {
    fn id(&self) -> &str;

    fn display_name(&self) -> &str;

    /// 使用者可直接開啟的搜尋連結
    fn search_url(&self, keyword: &str) -> String;

    async fn search(&self, skills: &[String], regions: &[Region]) -> SourceResult;
}

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Current time in milliseconds since epoch
    fn now_millis(&self) -> i64;
}

pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
