// src/crawl/policy.rs
// =============================================================================
// Decides how far the crawl keeps going from a given profile.
//
// Depth counts hops since the last accepted profile:
// - an accepted profile (one with an OIDC issuer) resets its neighbors to 0
// - an ignored profile hands its neighbors depth + 1
// - nothing at or beyond max_depth expands its neighbors at all
//
// So chains of valid profiles can be followed forever, but a chain of
// invalid or unreachable ones dies out after max_depth hops.
// =============================================================================

use clap::ValueEnum;

/// When neighbors restart at depth 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResetPolicy {
    /// Only neighbors of accepted profiles restart at 0
    AcceptedOnly,
    /// Every neighbor restarts at 0 (the crawl is then unbounded)
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthPolicy {
    max_depth: u32,
    reset: ResetPolicy,
}

impl DepthPolicy {
    pub fn new(max_depth: u32, reset: ResetPolicy) -> Self {
        Self { max_depth, reset }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn reset(&self) -> ResetPolicy {
        self.reset
    }

    /// Whether an item at `depth` may expand its neighbors
    pub fn expands(&self, depth: u32) -> bool {
        depth < self.max_depth
    }

    /// Depth assigned to a neighbor of an item at `depth`
    pub fn neighbor_depth(&self, depth: u32, accepted: bool) -> u32 {
        match self.reset {
            ResetPolicy::Always => 0,
            ResetPolicy::AcceptedOnly if accepted => 0,
            ResetPolicy::AcceptedOnly => depth.saturating_add(1),
        }
    }
}

impl Default for DepthPolicy {
    fn default() -> Self {
        Self::new(3, ResetPolicy::AcceptedOnly)
    }
}
