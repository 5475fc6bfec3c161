use thiserror::Error;

/// Failures of the durable storage slot and the document codec.
///
/// None of these are fatal: the persistence adapter logs them and carries on.
#[derive(Debug, Error)]
pub enum PersistError {
	#[error("storage is unavailable")]
	Unavailable,

	#[error("failed to read storage key {key:?}")]
	Read { key: String },

	#[error("failed to write storage key {key:?}")]
	Write { key: String },

	#[error("failed to encode graph document")]
	Encode(#[source] serde_json::Error),

	#[error("failed to decode graph document")]
	Decode(#[source] serde_json::Error),
}

pub type PersistResult<T> = Result<T, PersistError>;
