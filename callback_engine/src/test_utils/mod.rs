mod in_memory;
mod prepare_env;

pub use in_memory::{InMemoryStorefront, StaticTransactionLookup};
pub use prepare_env::prepare_test_env;
