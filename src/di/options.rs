//! Container policies, loadable from the `[container]` config section.

use serde::Deserialize;

/// What to do when resolution reaches a type that is still being populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Hand out the cached, partially injected instance.
    #[default]
    Allow,
    /// Fail with `DiError::CircularDependency`.
    Forbid,
}

/// What to do when two concrete types provide the same contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Keep the first implementation in scan order.
    #[default]
    FirstWins,
    /// Fail the registry build with `DiError::AmbiguousBinding`.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContainerOptions {
    pub cycles: CyclePolicy,
    pub ambiguity: AmbiguityPolicy,
}
