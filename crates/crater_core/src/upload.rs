/// Progress of the upload batch as seen by the UI.
///
/// Mirrors the orchestrator: one percentage for the file currently
/// transferring, reset to zero once the batch is done.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadState {
    uploading: bool,
    progress: u8,
    file_index: usize,
    file_count: usize,
}

impl UploadState {
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Zero-based index of the file currently transferring.
    pub fn file_index(&self) -> usize {
        self.file_index
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    pub(crate) fn begin(&mut self, file_count: usize) {
        *self = Self {
            uploading: true,
            progress: 0,
            file_index: 0,
            file_count,
        };
    }

    pub(crate) fn record_progress(&mut self, file_index: usize, percent: u8) {
        self.file_index = file_index;
        self.progress = percent.min(100);
    }

    pub(crate) fn finish(&mut self) {
        *self = Self::default();
    }
}
