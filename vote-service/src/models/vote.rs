use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use std::fmt;
use std::str::FromStr;

/// One of the two ballot options. The wire values `a` and `b` are what the
/// downstream worker tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    A,
    B,
}

impl Choice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::A => "a",
            Choice::B => "b",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Choice {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" => Ok(Choice::A),
            "b" => Ok(Choice::B),
            "" => Err(AppError::BadRequest(anyhow::anyhow!(
                "form field `vote` must not be empty"
            ))),
            other => Err(AppError::BadRequest(anyhow::anyhow!(
                "unknown vote option `{}`",
                other
            ))),
        }
    }
}

/// Client-held identity carried in the `voter_id` cookie.
///
/// Not authenticated and not unique per person: anything the client sends
/// back is taken as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoterId(String);

impl VoterId {
    /// A fresh random 64-bit id as 16 lower-case hex digits.
    pub fn generate() -> Self {
        Self(hex::encode(rand::random::<u64>().to_be_bytes()))
    }

    /// Wrap a value read back from the client. Empty values are treated as
    /// absent.
    pub fn from_client(value: &str) -> Option<Self> {
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The message appended to the `votes` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter_id: String,
    pub vote: String,
}

impl VoteRecord {
    pub fn new(voter_id: &VoterId, choice: Choice) -> Self {
        Self {
            voter_id: voter_id.as_str().to_string(),
            vote: choice.as_str().to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string(self).map_err(|e| AppError::InternalError(e.into()))
    }
}
