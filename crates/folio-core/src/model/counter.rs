use serde::{Deserialize, Serialize};

/// Body of every `/api/visitor-count` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountReply {
    pub count: u64,
}

impl CountReply {
    pub fn new(count: u64) -> Self {
        Self { count }
    }

    /// Degraded reply used whenever the store is unavailable.
    pub fn sentinel() -> Self {
        Self { count: 0 }
    }
}
