/// Records exchanged with the backend and held by the stores.
pub mod models;
/// Key-value storage for persisted client preferences.
pub mod preferences;
/// Error types shared by the storage backends.
pub mod storage;
