pub type DocumentId = String;

/// Processing status reported by the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentStatus {
    /// Uploaded but text extraction has not finished.
    #[default]
    Pending,
    Completed,
    Failed,
}

/// A knowledge-base entry as listed by the document gateway. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub file_type: String,
    pub folder_path: Option<String>,
    pub tags: Vec<String>,
    pub status: DocumentStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
}

impl Identity {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}
