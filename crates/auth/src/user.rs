//! User credential records.

use serde::{Deserialize, Serialize};

use marketledger_core::{DomainError, DomainResult, Record};

/// Ledger key of a user: `"<login>@<password>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserKey {
    login: String,
    password: String,
}

impl UserKey {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl core::fmt::Display for UserKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}@{}", self.login, self.password)
    }
}

/// Value stored under a [`UserKey`]: the caller-supplied hash, as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord {
    pub hash: String,
}

impl UserRecord {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }
}

impl Record for UserRecord {
    const KIND: &'static str = "user";

    fn encode(&self) -> DomainResult<Vec<u8>> {
        Ok(self.hash.as_bytes().to_vec())
    }

    fn decode(bytes: &[u8]) -> DomainResult<Self> {
        let hash = String::from_utf8(bytes.to_vec())
            .map_err(|e| DomainError::malformed(format!("{}: {e}", Self::KIND)))?;
        Ok(Self { hash })
    }
}

/// Command: RegisterUser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUser {
    pub login: String,
    pub password: String,
    pub hash: String,
}

impl RegisterUser {
    pub fn key(&self) -> UserKey {
        UserKey::new(self.login.clone(), self.password.clone())
    }

    pub fn record(&self) -> UserRecord {
        UserRecord::new(self.hash.clone())
    }
}
