//! External service integrations.

pub mod scoring_client {
    pub use crate::scoring_client::*;
}

pub mod db_storage {
    pub use crate::db_storage::*;
}

pub mod store {
    pub use crate::store::*;
}
