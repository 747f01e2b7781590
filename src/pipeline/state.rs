//! Deploy-and-publish state machine.
//!
//! # States
//! - Start: nothing has happened yet
//! - Deploying: contract-creation transaction in flight
//! - Deployed: address known, nothing published yet
//! - Publishing: exporting and publishing the address
//! - Done: every enabled sink has the address
//! - Failed: absorbing; reachable from Deploying or Publishing
//!
//! # State Transitions
//! ```text
//! Start → Deploying → Deployed → Publishing → Done
//!            │                       │
//!            └────────→ Failed ←─────┘
//! ```
//!
//! No transition returns to an earlier state.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Deploying,
    Deployed,
    Publishing,
    Done,
    Failed,
}

impl Stage {
    pub fn can_transition_to(self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Start, Stage::Deploying)
                | (Stage::Deploying, Stage::Deployed)
                | (Stage::Deploying, Stage::Failed)
                | (Stage::Deployed, Stage::Publishing)
                | (Stage::Publishing, Stage::Done)
                | (Stage::Publishing, Stage::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Deploying => "deploying",
            Stage::Deployed => "deployed",
            Stage::Publishing => "publishing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal pipeline transition {from} → {to}")]
pub struct IllegalTransition {
    pub from: Stage,
    pub to: Stage,
}

/// Records the stages a run passes through.
#[derive(Debug, Clone)]
pub struct StageTracker {
    history: Vec<Stage>,
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StageTracker {
    pub fn new() -> Self {
        Self {
            history: vec![Stage::Start],
        }
    }

    pub fn current(&self) -> Stage {
        self.history.last().copied().unwrap_or(Stage::Start)
    }

    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    pub fn advance(&mut self, next: Stage) -> Result<(), IllegalTransition> {
        let from = self.current();
        if !from.can_transition_to(next) {
            return Err(IllegalTransition { from, to: next });
        }
        tracing::debug!(from = %from, to = %next, "Pipeline stage");
        self.history.push(next);
        Ok(())
    }
}
