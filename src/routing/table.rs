use sha1::{Digest, Sha1};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::storage::UrlConfig;

pub const DEFAULT_KEY_LENGTH: usize = 6;

/// First `len` lowercase hex characters of SHA-1(`url`)
///
/// `len` is clamped to the 40 characters a SHA-1 digest renders to.
pub fn short_key(url: &str, len: usize) -> String {
    let mut key = hex::encode(Sha1::digest(url.as_bytes()));
    key.truncate(len);
    key
}

/// A key that was claimed by more than one distinct URL during a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub key: String,
    pub replaced: String,
    pub winner: String,
}

/// Short key → destination URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: HashMap<String, String>,
    collisions: Vec<Collision>,
}

impl RouteTable {
    /// Build a table with one entry per URL, walking `config.urls` in order.
    ///
    /// A later URL whose key is already taken by a different URL replaces it;
    /// the overwrite is recorded in [`collisions`](Self::collisions).
    pub fn build(config: &UrlConfig, key_length: usize) -> Self {
        let mut routes = HashMap::with_capacity(config.urls.len());
        let mut collisions = Vec::new();

        for url in &config.urls {
            let key = short_key(url, key_length);
            debug!("made: {} --> {}", key, url);

            if let Some(previous) = routes.insert(key.clone(), url.clone())
                && previous != *url
            {
                warn!(
                    "Short key collision on {}: {} replaced by {}",
                    key, previous, url
                );
                collisions.push(Collision {
                    key,
                    replaced: previous,
                    winner: url.clone(),
                });
            }
        }

        Self {
            routes,
            collisions,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.routes.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.routes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(urls: &[&str]) -> UrlConfig {
        UrlConfig::new(urls.iter().map(|u| u.to_string()).collect())
    }

    #[test]
    fn test_short_key_known_digest() {
        // sha1("abc") = a9993e364706816aba3e25717850c26c9cd0d89d
        assert_eq!(short_key("abc", 6), "a9993e");
        assert_eq!(short_key("abc", 40), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(short_key("abc", 100).len(), 40);
    }

    #[test]
    fn test_short_key_is_lowercase_hex() {
        let key = short_key("https://example.com/a", DEFAULT_KEY_LENGTH);
        assert_eq!(key.len(), DEFAULT_KEY_LENGTH);
        assert!(key.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_build_is_deterministic() {
        let cfg = config(&["https://example.com/a", "https://example.com/b"]);
        let first = RouteTable::build(&cfg, DEFAULT_KEY_LENGTH);
        let second = RouteTable::build(&cfg, DEFAULT_KEY_LENGTH);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);

        for (key, url) in first.iter() {
            assert_eq!(key, short_key(url, DEFAULT_KEY_LENGTH));
        }
    }

    #[test]
    fn test_duplicate_url_is_not_a_collision() {
        let cfg = config(&["https://example.com/a", "https://example.com/a"]);
        let table = RouteTable::build(&cfg, DEFAULT_KEY_LENGTH);
        assert_eq!(table.len(), 1);
        assert!(table.collisions().is_empty());
    }

    #[test]
    fn test_collision_later_url_wins() {
        // With a one-character key, 17 distinct URLs must share a key.
        let urls: Vec<String> = (0..17).map(|i| format!("https://example.com/{}", i)).collect();
        let cfg = UrlConfig::new(urls.clone());
        let table = RouteTable::build(&cfg, 1);

        assert!(table.len() <= 16);
        assert!(!table.collisions().is_empty());

        for collision in table.collisions() {
            assert_ne!(collision.replaced, collision.winner);
        }

        // Every key resolves to the last URL in config order that produced it.
        for (key, url) in table.iter() {
            let last = urls
                .iter()
                .rev()
                .find(|u| short_key(u, 1) == key)
                .unwrap();
            assert_eq!(url, last);
        }
    }

    #[test]
    fn test_empty_key_never_matches() {
        let table = RouteTable::build(&config(&["https://example.com/a"]), 6);
        assert!(table.get("").is_none());
        assert!(table.get("zzzzzz").is_none());
    }
}
