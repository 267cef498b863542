use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, B256};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::*;

/// Serializable contents of an [`InMemoryLedger`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub consumed: Vec<(Address, B256)>,
    pub claim_counts: Vec<(Address, Address, u32)>,
}

#[derive(Debug, Default)]
struct LedgerState {
    consumed: HashSet<(Address, B256)>,
    claim_counts: HashMap<(Address, Address), u32>,
}

/// In-process claim ledger. One mutex serializes every `record_claim`.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a ledger from a snapshot.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        let state = LedgerState {
            consumed: snapshot.consumed.into_iter().collect(),
            claim_counts: snapshot
                .claim_counts
                .into_iter()
                .map(|(scope, claimant, count)| ((scope, claimant), count))
                .collect(),
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// Capture the current contents, sorted for stable output.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let state = self.state.lock();

        let mut consumed: Vec<_> = state.consumed.iter().copied().collect();
        consumed.sort();

        let mut claim_counts: Vec<_> = state
            .claim_counts
            .iter()
            .map(|((scope, claimant), count)| (*scope, *claimant, *count))
            .collect();
        claim_counts.sort();

        LedgerSnapshot {
            consumed,
            claim_counts,
        }
    }

    /// Number of consumed claims across all scopes.
    /// Number of consumed claims across every scope.
    pub fn consumed_count(&self) -> usize {
        self.state.lock().consumed.len()
    }
}

impl ClaimLedger for InMemoryLedger {
    fn is_consumed(&self, scope: &Address, key: &B256) -> bool {
        self.state.lock().consumed.contains(&(*scope, *key))
    }

    fn claim_count(&self, scope: &Address, claimant: &Address) -> u32 {
        self.state
            .lock()
            .claim_counts
            .get(&(*scope, *claimant))
            .copied()
            .unwrap_or(0)
    }

    fn record_claim(
        &self,
        scope: Address,
        key: B256,
        claimant: Address,
        limit: Option<u32>,
    ) -> LedgerResult<ClaimReceipt> {
        let mut state = self.state.lock();

        if state.consumed.contains(&(scope, key)) {
            return Err(LedgerError::AlreadyConsumed(key));
        }

        let current = state
            .claim_counts
            .get(&(scope, claimant))
            .copied()
            .unwrap_or(0);
        if let Some(limit) = limit {
            if current >= limit {
                return Err(LedgerError::ClaimLimitExceeded { claimant, limit });
            }
        }

        let claim_count = current.saturating_add(1);
        state.claim_counts.insert((scope, claimant), claim_count);
        state.consumed.insert((scope, key));

        debug!(%scope, %key, %claimant, claim_count, "claim recorded");

        Ok(ClaimReceipt {
            scope,
            key,
            claimant,
            claim_count,
        })
    }
}
