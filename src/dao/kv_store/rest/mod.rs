mod config;
mod error;
mod store;

pub use config::RestConfig;
pub use error::RestDaoError;
pub use store::RestKvStore;

use crate::dao::storage::StorageError;

impl From<RestDaoError> for StorageError {
    fn from(err: RestDaoError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}
