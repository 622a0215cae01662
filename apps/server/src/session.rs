//! Server-side sessions keyed by an opaque cookie token.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use stockfolio_core::construction::{ConstructedPortfolio, ConstructionKey};
use tokio::sync::RwLock;

pub const SESSION_COOKIE: &str = "sf_session";

const TOKEN_BYTES: usize = 32;

/// Last construction result, reused while the request key stays the same.
#[derive(Debug, Clone)]
pub struct CachedConstruction {
    pub key: ConstructionKey,
    pub result: ConstructedPortfolio,
}

#[derive(Debug, Clone)]
pub struct SessionData {
    pub user_id: i32,
    pub username: String,
    pub investment_amount: Option<f64>,
    pub last_construction: Option<CachedConstruction>,
    last_seen: Instant,
}

impl SessionData {
    fn new(user_id: i32, username: String) -> Self {
        Self {
            user_id,
            username,
            investment_amount: None,
            last_construction: None,
            last_seen: Instant::now(),
        }
    }

    /// The cached result for `key`, if that is what was built last.
    pub fn cached_construction(&self, key: &ConstructionKey) -> Option<&ConstructedPortfolio> {
        self.last_construction
            .as_ref()
            .filter(|cached| &cached.key == key)
            .map(|cached| &cached.result)
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    ttl: Duration,
}

fn new_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Starts a session and returns its token.
    pub async fn create(&self, user_id: i32, username: &str) -> String {
        let token = new_token();
        let mut sessions = self.sessions.write().await;
        let ttl = self.ttl;
        sessions.retain(|_, data| data.last_seen.elapsed() < ttl);
        sessions.insert(token.clone(), SessionData::new(user_id, username.to_string()));
        token
    }

    /// A snapshot of the session, refreshing its idle timer. Expired sessions
    /// are dropped and read as absent.
    pub async fn get(&self, token: &str) -> Option<SessionData> {
        let mut sessions = self.sessions.write().await;
        let expired = match sessions.get_mut(token) {
            None => return None,
            Some(data) if data.last_seen.elapsed() >= self.ttl => true,
            Some(data) => {
                data.last_seen = Instant::now();
                return Some(data.clone());
            }
        };
        if expired {
            sessions.remove(token);
        }
        None
    }

    /// Applies `change` to a live session. Returns false if it is gone.
    pub async fn update<F>(&self, token: &str, change: F) -> bool
    where
        F: FnOnce(&mut SessionData),
    {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(token) {
            Some(data) => {
                change(data);
                true
            }
            None => false,
        }
    }

    pub async fn destroy(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tokens_are_unique_and_url_safe() {
        let store = SessionStore::new(Duration::from_secs(60));
        let first = store.create(1, "asha").await;
        let second = store.create(1, "asha").await;
        assert_ne!(first, second);
        assert_eq!(first.len(), 43);
        assert!(first
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[tokio::test]
    async fn session_round_trip_and_destroy() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(7, "ravi").await;

        let data = store.get(&token).await.unwrap();
        assert_eq!(data.user_id, 7);
        assert_eq!(data.username, "ravi");
        assert!(data.investment_amount.is_none());

        assert!(
            store
                .update(&token, |data| data.investment_amount = Some(250_000.0))
                .await
        );
        assert_eq!(
            store.get(&token).await.unwrap().investment_amount,
            Some(250_000.0)
        );

        store.destroy(&token).await;
        assert!(store.get(&token).await.is_none());
        assert!(!store.update(&token, |_| {}).await);
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let store = SessionStore::new(Duration::from_millis(20));
        let token = store.create(1, "asha").await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(store.get(&token).await.is_none());
    }

    #[tokio::test]
    async fn cache_lookup_requires_matching_key() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(1, "asha").await;
        let key = ConstructionKey {
            index_symbol: "NIFTY50".to_string(),
            total_capital: 200_000.0,
            no_of_stocks: 10,
        };
        let result = ConstructedPortfolio {
            portfolio: Vec::new(),
            total_invested: 199_500.0,
            free_cash: 500.0,
            no_of_stocks: 10,
        };
        store
            .update(&token, |data| {
                data.last_construction = Some(CachedConstruction {
                    key: key.clone(),
                    result,
                })
            })
            .await;

        let data = store.get(&token).await.unwrap();
        assert!(data.cached_construction(&key).is_some());
        let other = ConstructionKey {
            no_of_stocks: 11,
            ..key
        };
        assert!(data.cached_construction(&other).is_none());
    }
}
