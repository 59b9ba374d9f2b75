pub mod config;
pub mod error;
pub mod facade;
pub mod local;
pub mod storage;

pub use config::{Credentials, FacadeConfig, StorageSettings};
pub use error::{Error, Result};
pub use facade::{DeleteOutcome, ObjectStorage};
pub use storage::{ObjectAcl, ObjectClient, UPLOAD_ACL};
