/// Movie primary keys are UUIDs assigned by the caller before insertion.
pub type MovieId = uuid::Uuid;

/// Viewer identities arrive from the auth layer as UUIDs.
pub type ViewerId = uuid::Uuid;
