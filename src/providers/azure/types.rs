//! Azure Content Safety response shapes

use serde::{Deserialize, Serialize};

/// Body of a `text:analyze` / `image:analyze` response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureAnalyzeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories_analysis: Option<Vec<AzureCategoryAnalysis>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AzureCategoryAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// 0-6 severity; the four-level output mode only uses 0, 2, 4, 6
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<i64>,
}
