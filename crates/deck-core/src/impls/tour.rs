//! GuideTour の実装
//!
//! - **InMemoryGuideTour**: プロセス内だけで記録（テスト・既定）
//! - **JsonFileGuideTour**: 完了済みキーを JSON ファイルに保存（ブラウザの localStorage 相当）

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::ports::{GuideTour, TourKey};

#[derive(Default)]
pub struct InMemoryGuideTour {
    finished: Mutex<HashSet<TourKey>>,
}

impl InMemoryGuideTour {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finished(keys: &[TourKey]) -> Self {
        Self {
            finished: Mutex::new(keys.iter().copied().collect()),
        }
    }
}

impl GuideTour for InMemoryGuideTour {
    fn is_finished(&self, key: TourKey) -> bool {
        self.finished
            .lock()
            .map(|set| set.contains(&key))
            .unwrap_or(false)
    }

    fn finish(&self, key: TourKey) {
        if let Ok(mut set) = self.finished.lock() {
            set.insert(key);
        }
    }
}

/// 完了状態をファイルに保存する GuideTour
///
/// 読み込み・書き込みの失敗はガイドを出すかどうかの判断にしか影響しないので、
/// エラーにはせず warn ログに残して続行します。
pub struct JsonFileGuideTour {
    path: PathBuf,
    cache: InMemoryGuideTour,
}

impl JsonFileGuideTour {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let keys: Vec<TourKey> = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!(path = %path.display(), %error, "ignoring unreadable tour state");
                Vec::new()
            }),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "failed to read tour state");
                Vec::new()
            }
        };
        Self {
            path,
            cache: InMemoryGuideTour::finished(&keys),
        }
    }

    fn persist(&self) {
        let keys: Vec<TourKey> = match self.cache.finished.lock() {
            Ok(set) => set.iter().copied().collect(),
            Err(_) => return,
        };
        let result = serde_json::to_string(&keys)
            .map_err(std::io::Error::other)
            .and_then(|raw| std::fs::write(&self.path, raw));
        if let Err(error) = result {
            tracing::warn!(path = %self.path.display(), %error, "failed to persist tour state");
        }
    }
}

impl GuideTour for JsonFileGuideTour {
    fn is_finished(&self, key: TourKey) -> bool {
        self.cache.is_finished(key)
    }

    fn finish(&self, key: TourKey) {
        self.cache.finish(key);
        self.persist();
    }
}
