use mongodb::error::{Error as MongoError, ErrorKind};

/// Storage failures as the services see them. Only `NotFound` and
/// `AlreadyExists` carry meaning for callers; the rest end up as 500s.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Unique index violation (`users.email`, `categories.name`, `settings.key`)
    #[error("Already Exists: {0}")]
    AlreadyExists(String),
    #[error("Validation Error: {0}")]
    ValidationError(String),
    #[error("Database Error: {0}")]
    DatabaseError(String),
    #[error("Connection Error: {0}")]
    ConnectionError(String),
    #[error("Serialization Error: {0}")]
    SerializationError(String),
    #[error("Repository Error: {0}")]
    Generic(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        RepositoryError::NotFound(msg.into())
    }

    pub fn already_exists<T: Into<String>>(msg: T) -> Self {
        RepositoryError::AlreadyExists(msg.into())
    }

    pub fn database<T: Into<String>>(msg: T) -> Self {
        RepositoryError::DatabaseError(msg.into())
    }
}

/// Field named in an E11000 message (`... dup key: { email: "a@b.c" }`)
fn duplicate_field(message: &str) -> Option<&str> {
    let (_, rest) = message.split_once("dup key: {")?;
    let field = rest.trim_start().split(':').next()?.trim();
    (!field.is_empty()).then_some(field)
}

impl From<MongoError> for RepositoryError {
    fn from(err: MongoError) -> Self {
        let message = err.to_string();
        match err.kind.as_ref() {
            ErrorKind::Write(_) | ErrorKind::BulkWrite(_) if message.contains("E11000") => {
                let field = duplicate_field(&message).unwrap_or("unique field");
                RepositoryError::AlreadyExists(format!("Duplicate key: {}", field))
            }
            ErrorKind::Write(_) => RepositoryError::DatabaseError(format!("Write error: {}", message)),
            ErrorKind::InvalidArgument { .. } => RepositoryError::ValidationError(message),
            ErrorKind::Authentication { .. } | ErrorKind::Io(_) | ErrorKind::ServerSelection { .. } => {
                RepositoryError::ConnectionError(message)
            }
            _ => RepositoryError::Generic(Box::new(err)),
        }
    }
}

impl From<bson::ser::Error> for RepositoryError {
    fn from(err: bson::ser::Error) -> Self {
        RepositoryError::SerializationError(format!("BSON serialization error: {}", err))
    }
}

impl From<bson::de::Error> for RepositoryError {
    fn from(err: bson::de::Error) -> Self {
        RepositoryError::SerializationError(format!("BSON deserialization error: {}", err))
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
