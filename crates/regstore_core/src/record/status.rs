//! Record lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Verification status of a record.
///
/// Valid transitions:
/// - `Pending -> Verified` on verify
/// - any status `-> Revision` on edit
/// - `Revision -> <status before the edit>` on undo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Submitted, awaiting verification.
    #[default]
    Pending,
    /// Verified.
    Verified,
    /// Edited after submission.
    Revision,
}

impl Status {
    /// All statuses, in display order.
    pub const ALL: [Status; 3] = [Status::Pending, Status::Verified, Status::Revision];

    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Revision => "revision",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "verified" => Ok(Self::Verified),
            "revision" => Ok(Self::Revision),
            other => Err(format!("unknown status: {other}")),
        }
    }
}
