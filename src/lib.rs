#![warn(clippy::all)]

//! Graph-backed AWS IAM policy evaluation and identity-transform materialisation.
//!
//! The crate is organized the way an Aspen-style policy engine is laid out:
//! a wire model for policy documents (`policy`, `statement`, `action`,
//! `principal`, `resource`, `condition`, `effect`), a small runtime-identity
//! layer (`identity`, `arn`) those documents are evaluated against, and the
//! graph/discovery/resolution/materialize/render/api modules layered on top
//! that turn a population of documents plus a role graph into concrete
//! answers: can this actor do this action, and what would granting it cost.

pub mod action;
pub mod arn;
pub mod condition;
pub mod effect;
pub mod error;
pub mod eval;
pub mod identity;
pub mod policy;
pub mod principal;
pub mod resource;
pub mod serutil;
pub mod statement;
pub mod wildcard;

pub mod arn_param;
pub mod config;
pub mod discovery;
pub mod graph;
pub mod materialize;
pub mod model;
pub mod render;
pub mod resolution;

mod api;

pub use {
    action::{Action, ActionList},
    api::Evaluator,
    condition::{op as condop, Condition, ConditionMap, ConditionOp, Variant},
    effect::Effect,
    error::EvalError,
    eval::{Context, ContextBuilder, ContextBuilderError, Decision},
    policy::{Policy, PolicyBuilder, PolicyBuilderError, PolicyVersion},
    principal::{AwsPrincipal, Principal, SpecifiedPrincipal, SpecifiedPrincipalBuilder, SpecifiedPrincipalBuilderError},
    resource::{Resource, ResourceArn, ResourceList},
    statement::{Statement, StatementBuilder, StatementBuilderError, StatementList},
};
