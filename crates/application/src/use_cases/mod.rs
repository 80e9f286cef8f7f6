//! Application use cases (business logic orchestration).

mod open_collection;

pub use open_collection::OpenCollection;
