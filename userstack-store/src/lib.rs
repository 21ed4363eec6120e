//! User record storage for userstack
//!
//! A single key-value collection of [`User`] records keyed by `id`, behind the
//! [`RecordStore`] trait. [`EphemeralStore`] keeps records in memory;
//! [`DynamoDbStore`] talks to a DynamoDB table.

mod dynamodb;
mod ephemeral;
mod model;
mod traits;


pub use dynamodb::{DynamoDbStore, DynamoDbStoreConfig};
pub use ephemeral::EphemeralStore;
pub use model::{NewUser, User, UserUpdate};
pub use traits::{RecordStore, StoreError};
