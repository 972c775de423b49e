pub mod core;
pub mod store_object;

pub use self::core::{RowCountPolicy, Store, WriteOutcome};
pub use store_object::GenericStore;
