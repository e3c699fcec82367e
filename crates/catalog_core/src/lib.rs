//! Client-side management of catalog "master lists": validation, the
//! add/edit/delete manager, and the controller that owns the list.

pub mod confirmation;
pub mod controller;
pub mod error;
pub mod http;
pub mod manager;
pub mod notify;
pub mod remote;
pub mod validation;

pub use confirmation::{ConfirmationGate, FixedConfirmation};
pub use controller::CatalogController;
pub use error::{ManagerError, RemoteError, RemoteErrorKind, ValidationError};
pub use http::HttpCatalogClient;
pub use manager::{
    CatalogHost, DeleteOutcome, EditSession, InputChange, InputKey, KeyHandling, ManagerConfig,
    MasterListManager, SaveOutcome, SessionMode,
};
pub use notify::Notifier;
pub use remote::RemoteCatalog;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
