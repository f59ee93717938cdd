use serde::{Deserialize, Serialize};

/// Processing policy applied to both image normalization and table cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// Pass the recognizer output through verbatim, blank filler included.
    Raw,
    /// Crop image whitespace, pad a clean border, and drop fully-empty
    /// rows/columns from the recognized table.
    Enhanced,
}

impl std::fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingMode::Raw => write!(f, "raw"),
            ProcessingMode::Enhanced => write!(f, "enhanced"),
        }
    }
}

impl std::str::FromStr for ProcessingMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(ProcessingMode::Raw),
            "enhanced" => Ok(ProcessingMode::Enhanced),
            other => Err(format!("Unknown processing mode: '{other}'")),
        }
    }
}
