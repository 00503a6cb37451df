pub mod error;
pub mod store;
pub mod update;
pub mod value;

pub use error::StoreError;
pub use store::{Page, ResourceStore, StoredResource};
pub use update::UpdateBuilder;
pub use value::SqlValue;
