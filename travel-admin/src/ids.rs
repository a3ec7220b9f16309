//! Client-side token generation
//!
//! Reviews and users carry a `user_id` token generated on the client when a
//! draft is created. It is unrelated to the document key, which the
//! storage backend assigns.

use uuid::Uuid;

pub trait TokenSource: Send + Sync {
    fn next_token(&self) -> String;
}

/// Random UUID v4 tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokens;

impl TokenSource for UuidTokens {
    fn next_token(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
