use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// The single error type produced by this crate.
///
/// The first six variants mirror the parse/model errors `scratchstack-aspen`
/// carried. The remaining five are the evaluation-boundary kinds: `GraphError`,
/// `NotFound`, and `BadInput` propagate to the caller; `ConditionUnresolvable`
/// is never returned across the evaluation boundary itself (an unresolvable
/// variable or operator makes its condition evaluate to `false`, fail-closed);
/// `RenderError` covers a statement with neither `Action` nor `NotAction`.
#[derive(Debug, Eq, PartialEq)]
pub enum EvalError {
    InvalidAction(String),
    InvalidConditionOperator(String),
    InvalidPolicyVersion(String),
    InvalidPrincipal(String),
    InvalidResource(String),
    InvalidSubstitution(String),
    GraphError(String),
    NotFound(String),
    BadInput(String),
    ConditionUnresolvable(String),
    RenderError(String),
}

impl Display for EvalError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::InvalidAction(action) => write!(f, "Invalid action: {}", action),
            Self::InvalidConditionOperator(operator) => write!(f, "Invalid condition operator: {}", operator),
            Self::InvalidPolicyVersion(version) => write!(f, "Invalid policy version: {}", version),
            Self::InvalidPrincipal(principal) => write!(f, "Invalid principal: {}", principal),
            Self::InvalidResource(resource) => write!(f, "Invalid resource: {}", resource),
            Self::InvalidSubstitution(element) => write!(f, "Invalid variable substitution: {}", element),
            Self::GraphError(msg) => write!(f, "Graph error: {}", msg),
            Self::NotFound(what) => write!(f, "Not found: {}", what),
            Self::BadInput(what) => write!(f, "Bad input: {}", what),
            Self::ConditionUnresolvable(what) => write!(f, "Condition unresolvable: {}", what),
            Self::RenderError(what) => write!(f, "{}", what),
        }
    }
}

impl Error for EvalError {}
