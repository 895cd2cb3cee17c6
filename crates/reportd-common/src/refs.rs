use serde::{Deserialize, Serialize};

/// Reference to a report definition held by the report-execution
/// collaborator. This core never resolves it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportDefinitionRef {
    pub uuid: String,

    /// Display name, when the producer knows it.
    #[serde(default)]
    pub name: Option<String>,
}

/// Reference to a cohort definition used to scope the subject
/// population. Evaluation happens elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CohortDefinitionRef {
    pub uuid: String,

    #[serde(default)]
    pub name: Option<String>,
}

/// The user who submitted a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRef {
    pub uuid: String,

    #[serde(default)]
    pub username: Option<String>,
}
