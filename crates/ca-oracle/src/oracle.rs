//! The `Oracle` trait — the single seam to the external reasoning service.

use async_trait::async_trait;

use crate::{OracleRequest, OracleResult};

/// Cumulative token counts reported by an oracle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens:     u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    pub fn total(self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }

    /// Tokens spent between `earlier` and `self`.
    pub fn since(self, earlier: TokenUsage) -> u64 {
        self.total().saturating_sub(earlier.total())
    }
}

/// A stateless text-completion service.
///
/// Implementations must be shareable across agents (`Send + Sync`); the
/// dispatch pipeline holds them as `Arc<dyn Oracle>`.  Errors cover transport
/// failures and timeouts only: a reply that is *present but useless* is
/// returned as `Ok` and judged by the caller.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn request(&self, request: OracleRequest) -> OracleResult<String>;

    /// Tokens consumed so far.  Oracles that do not meter return zero.
    fn usage(&self) -> TokenUsage {
        TokenUsage::default()
    }
}
