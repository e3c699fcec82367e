use shared::{
    domain::CatalogId,
    error::{ApiError, ErrorCode},
};
use thiserror::Error;

/// Shown instead of the raw backend text when a delete is blocked by rows
/// that still reference the item.
pub const CONSTRAINT_DELETE_MESSAGE: &str =
    "cannot delete — item is referenced by other records; remove references first.";

/// Substrings that backends put in referential-integrity failures when they
/// do not send a structured code.
const CONSTRAINT_MARKERS: &[&str] = &[
    "foreign key",
    "foreignkey",
    "protectederror",
    "protected foreign",
    "referenced",
    "en uso",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    Required,
    #[error("name already exists")]
    Duplicate { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    ConstraintViolation,
    Validation,
    NotFound,
    Unknown,
}

/// Failure reported by the remote catalog for a fetch or mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?}: {detail}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub detail: String,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn unknown(detail: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Unknown, detail)
    }

    /// Best-effort classification of an unstructured failure text.
    pub fn from_detail(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let kind = if looks_like_constraint_violation(&detail) {
            RemoteErrorKind::ConstraintViolation
        } else {
            RemoteErrorKind::Unknown
        };
        Self { kind, detail }
    }

    pub fn is_constraint_violation(&self) -> bool {
        self.kind == RemoteErrorKind::ConstraintViolation
    }

    /// Notification text for a failed `action` ("add", "update", "delete")
    /// on a `label` ("obra social", ...).
    pub fn user_message(&self, action: &str, label: &str) -> String {
        if action == "delete" && self.is_constraint_violation() {
            return CONSTRAINT_DELETE_MESSAGE.to_string();
        }
        match self.kind {
            RemoteErrorKind::NotFound => {
                format!("could not {action} {label}: it no longer exists; reload the list")
            }
            _ if self.detail.trim().is_empty() => format!("could not {action} {label}"),
            _ => format!("could not {action} {label}: {}", self.detail),
        }
    }
}

impl From<ApiError> for RemoteError {
    fn from(value: ApiError) -> Self {
        let kind = match value.code {
            ErrorCode::ConstraintViolation => RemoteErrorKind::ConstraintViolation,
            ErrorCode::Validation => RemoteErrorKind::Validation,
            ErrorCode::NotFound => RemoteErrorKind::NotFound,
            ErrorCode::Unknown | ErrorCode::Internal => {
                return Self::from_detail(value.message);
            }
            ErrorCode::Unauthorized | ErrorCode::Forbidden => RemoteErrorKind::Unknown,
        };
        Self::new(kind, value.message)
    }
}

pub fn looks_like_constraint_violation(detail: &str) -> bool {
    let lower = detail.to_lowercase();
    CONSTRAINT_MARKERS.iter().any(|marker| lower.contains(marker))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("another change is still being saved")]
    Busy,
    #[error("item {0} is no longer in the list")]
    StaleItem(CatalogId),
}
