//! Editor tool and output location choices

use serde::{Deserialize, Serialize};

/// Active editor tool; exactly one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Arrow,
    Rectangle,
    Ellipse,
    Text,
    Select,
}

/// Where to save the exported image
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSaveLocation {
    /// Save to Pictures folder
    #[default]
    Pictures,
    /// Save to Documents folder
    Documents,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_serde_names() {
        assert_eq!(serde_json::to_string(&Tool::Select).unwrap(), "\"select\"");
        let tool: Tool = serde_json::from_str("\"rectangle\"").unwrap();
        assert_eq!(tool, Tool::Rectangle);
    }
}
