//! Handle identifying one photo to the update pipeline.

/// External identity of an asset: the library uuid plus a display filename.
///
/// Callers that only have a uuid (the CLI, for instance) get the uuid
/// echoed as the filename in notifications.
#[derive(Debug, Clone)]
pub struct PhotoHandle {
    pub uuid: String,
    pub filename: String,
}

impl PhotoHandle {
    pub fn new(uuid: impl Into<String>) -> Self {
        let uuid = uuid.into();
        Self {
            filename: uuid.clone(),
            uuid,
        }
    }

    pub fn with_filename(uuid: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            filename: filename.into(),
        }
    }
}
