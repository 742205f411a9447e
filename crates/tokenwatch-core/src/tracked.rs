use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

// ---------------------------------------------------------------------------
// TrackedToken
// ---------------------------------------------------------------------------

/// One operator-declared token to report on. Membership is supplied through
/// the token file, never discovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedToken {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessor: Option<String>,
}

impl TrackedToken {
    pub fn new(name: Option<&str>, accessor: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            accessor: accessor.map(str::to_string),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("No name")
    }

    /// The accessor, if present and non-blank.
    pub fn accessor(&self) -> Option<&str> {
        self.accessor
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

// ---------------------------------------------------------------------------
// TokenFile
// ---------------------------------------------------------------------------

/// On-disk shape of the tracked-token source: `tokens: [{accessor, name?}]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenFile {
    #[serde(default)]
    pub tokens: Vec<TrackedToken>,
}

impl TokenFile {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let file: TokenFile = serde_yaml::from_str(&data)?;
        Ok(file)
    }

    /// Read the source fresh, folding any read or parse failure into a
    /// condition string instead of an error: a broken source means "zero
    /// tracked tokens, tell the operator", never a core fault.
    pub fn load_or_report(path: &Path) -> (Vec<TrackedToken>, Option<String>) {
        match Self::load(path) {
            Ok(file) => (file.tokens, None),
            Err(e) => (
                Vec::new(),
                Some(format!("token source {} unreadable: {e}", path.display())),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
