mod notification_signature;

pub use notification_signature::{notification_signature, verify_notification_signature, SignatureError};
