use serde::de::MapAccess;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use subtle::ConstantTimeEq;

use super::fields::{self, FoldedFields};
use crate::errors::{HashlinkerError, Result};

/// How the two caller credentials are checked against the stored pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Accept when at least one credential matches; rejects only when both
    /// mismatch. Compatible with existing deployments.
    #[default]
    Any,
    /// Accept only when both credentials match
    All,
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::All => write!(f, "all"),
        }
    }
}

impl std::str::FromStr for AuthMode {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" => Ok(Self::Any),
            "all" => Ok(Self::All),
            _ => Err(format!("Invalid auth mode: '{}'. Valid: any, all", s)),
        }
    }
}

/// Credential pair stored in the secrets file: `{"AuthTok": .., "SecretAuth": ..}`
///
/// Field names are matched case-insensitively when reading.
#[derive(Clone, Default, Serialize)]
pub struct Secrets {
    #[serde(rename = "AuthTok")]
    pub auth_tok: String,
    #[serde(rename = "SecretAuth")]
    pub secret_auth: String,
}

impl FoldedFields for Secrets {
    const EXPECTING: &'static str = "a secrets object";

    fn read_field<'de, A: MapAccess<'de>>(
        &mut self,
        key: &str,
        map: &mut A,
    ) -> std::result::Result<bool, A::Error> {
        match key {
            "authtok" => self.auth_tok = fields::string(map)?,
            "secretauth" => self.secret_auth = fields::string(map)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl<'de> Deserialize<'de> for Secrets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        fields::deserialize_folded(deserializer)
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("auth_tok", &"<redacted>")
            .field("secret_auth", &"<redacted>")
            .finish()
    }
}

impl Secrets {
    pub fn new(auth_tok: impl Into<String>, secret_auth: impl Into<String>) -> Self {
        Self {
            auth_tok: auth_tok.into(),
            secret_auth: secret_auth.into(),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|e| {
            let msg = format!("could not read secrets file {}: {}", path.display(), e);
            match e.kind() {
                ErrorKind::NotFound => HashlinkerError::not_found(msg),
                _ => HashlinkerError::file_operation(msg),
            }
        })?;
        serde_json::from_slice(&content).map_err(|e| {
            HashlinkerError::serialization(format!(
                "could not parse secrets file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Compare the supplied credentials in constant time
    pub fn authorize(&self, auth_tok: &str, secret_auth: &str, mode: AuthMode) -> bool {
        let tok_ok: bool = self.auth_tok.as_bytes().ct_eq(auth_tok.as_bytes()).into();
        let secret_ok: bool = self
            .secret_auth
            .as_bytes()
            .ct_eq(secret_auth.as_bytes())
            .into();

        match mode {
            AuthMode::Any => tok_ok || secret_ok,
            AuthMode::All => tok_ok && secret_ok,
        }
    }

    pub fn verify(&self, auth_tok: &str, secret_auth: &str, mode: AuthMode) -> Result<()> {
        if self.authorize(auth_tok, secret_auth, mode) {
            Ok(())
        } else {
            Err(HashlinkerError::unauthorized(
                "supplied credentials do not match",
            ))
        }
    }
}

/// Secrets file handle. Every `load` goes back to disk so rotated
/// credentials apply without a restart.
#[derive(Debug, Clone)]
pub struct SecretsStore {
    path: PathBuf,
}

impl SecretsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Secrets> {
        Secrets::load(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stored() -> Secrets {
        Secrets::new("token", "secret")
    }

    #[test]
    fn test_any_mode_accepts_single_match() {
        let s = stored();
        assert!(s.authorize("token", "secret", AuthMode::Any));
        assert!(s.authorize("token", "wrong", AuthMode::Any));
        assert!(s.authorize("wrong", "secret", AuthMode::Any));
        assert!(!s.authorize("wrong", "wrong", AuthMode::Any));
    }

    #[test]
    fn test_all_mode_requires_both() {
        let s = stored();
        assert!(s.authorize("token", "secret", AuthMode::All));
        assert!(!s.authorize("token", "wrong", AuthMode::All));
        assert!(!s.authorize("wrong", "secret", AuthMode::All));
        assert!(!s.authorize("", "", AuthMode::All));
    }

    #[test]
    fn test_verify_returns_unauthorized() {
        let err = stored().verify("x", "y", AuthMode::Any).unwrap_err();
        assert!(matches!(err, HashlinkerError::Unauthorized(_)));
    }

    #[test]
    fn test_load_accepts_both_field_spellings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secrets.json");

        fs::write(&path, r#"{"AuthTok": "a", "SecretAuth": "b"}"#).unwrap();
        let s = Secrets::load(&path).unwrap();
        assert_eq!(s.auth_tok, "a");
        assert_eq!(s.secret_auth, "b");

        fs::write(&path, r#"{"authTok": "c", "secretAuth": "d"}"#).unwrap();
        let s = SecretsStore::new(&path).load().unwrap();
        assert_eq!(s.auth_tok, "c");
        assert_eq!(s.secret_auth, "d");
    }

    #[test]
    fn test_load_lower_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secrets.json");
        fs::write(&path, r#"{"authtok": "tok", "SECRETAUTH": "sec"}"#).unwrap();

        let s = Secrets::load(&path).unwrap();
        assert_eq!(s.auth_tok, "tok");
        assert_eq!(s.secret_auth, "sec");
        assert!(!s.authorize("", "", AuthMode::Any));
    }

    #[test]
    fn test_load_null_fields_are_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secrets.json");
        fs::write(&path, r#"{"AuthTok": null, "SecretAuth": "sec"}"#).unwrap();

        let s = Secrets::load(&path).unwrap();
        assert_eq!(s.auth_tok, "");
        assert_eq!(s.secret_auth, "sec");
    }

    #[test]
    fn test_debug_redacts() {
        let out = format!("{:?}", stored());
        assert!(!out.contains("token"));
        assert!(!out.contains("secret\""));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = SecretsStore::new(dir.path().join("missing.json"))
            .load()
            .unwrap_err();
        assert!(matches!(err, HashlinkerError::NotFound(_)));
    }
}
