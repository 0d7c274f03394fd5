pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
impl From<porter_storage::Error> for Error {
	fn from(err: porter_storage::Error) -> Self {
		match err {
			porter_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			porter_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			porter_storage::Error::NotFound(message) => Self::NotFound { message },
			porter_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}
impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
