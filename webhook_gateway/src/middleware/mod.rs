mod header_guard;

pub use header_guard::{ApiKeyRule, HeaderGuardFactory, HeaderGuardService, HeaderRules};
