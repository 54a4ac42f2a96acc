use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    StoreUnavailable,
    TaskNotFound,
    ResourceNotFound,
    ClientNotFound,
    ValidationError,
    Unauthorized,
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::ClientNotFound => "CLIENT_NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct WeekloadError {
    pub code: ErrorCode,
    pub message: String,
}

impl WeekloadError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "weekload is not initialized. Run `weekload init` first.",
        )
    }

    pub fn store_unavailable(detail: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::StoreUnavailable,
            format!("Store unavailable: {}", detail.into()),
        )
    }

    pub fn task_not_found(id: i64) -> Self {
        Self::new(ErrorCode::TaskNotFound, format!("Task not found: {id}"))
    }

    pub fn resource_not_found(id: i64) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("Resource not found: {id}"),
        )
    }

    pub fn client_not_found(id: i64) -> Self {
        Self::new(ErrorCode::ClientNotFound, format!("Client not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(action: &str) -> Self {
        Self::new(
            ErrorCode::Unauthorized,
            format!("Admin role required to {action}"),
        )
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

impl From<rusqlite::Error> for WeekloadError {
    fn from(e: rusqlite::Error) -> Self {
        Self::database(e.to_string())
    }
}
