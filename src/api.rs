//! Evaluation entry points (component I): the six operations spec.md §4.I
//! names, implemented as methods on an [`Evaluator`] that owns a single
//! `Arc<G>` graph handle rather than free functions taking a driver
//! argument each time — matching the teacher's preference for small owned
//! structs over module-level globals (spec.md §9: "no global mutable state
//! required").

use {
    crate::{
        discovery::{inbound_role_assumption_paths, resource_output_paths, unresolved_output_paths},
        graph::{GraphDriver, NodeId, NodeKind},
        materialize::{materialise_identity_transforms, DEFAULT_WORKERS},
        model::action_path::ActionPathSet,
        render::render_statement,
        resolution::{resolve_resource_against_identity, resolve_assume_role},
        EvalError,
    },
    serde_json::Value,
    std::sync::Arc,
};

/// Owns a graph handle and exposes the policy-evaluation API over it.
pub struct Evaluator<G: GraphDriver> {
    driver: Arc<G>,
}

impl<G: GraphDriver + 'static> Evaluator<G> {
    pub fn new(driver: Arc<G>) -> Self {
        Self { driver }
    }

    /// The resolved set of output policy (RSOP) paths for a principal: every
    /// (action, resource) it can reach once resource and identity policies
    /// have been combined.
    pub async fn principal_rsop(&self, principal_id: NodeId) -> Result<ActionPathSet, EvalError> {
        let identity_set = unresolved_output_paths(self.driver.as_ref(), principal_id).await?;
        resolve_resource_against_identity(ActionPathSet::new(), identity_set)
    }

    /// Every principal with any access into `target_arn`, resolved against
    /// each principal's identity policies.
    pub async fn resource_inbound(&self, target_arn: &str) -> Result<ActionPathSet, EvalError> {
        let resource_set = resource_output_paths(self.driver.as_ref(), target_arn).await?;
        let mut identity_set = ActionPathSet::new();
        for principal_arn in resource_set.principal_arns() {
            identity_set.add_path_set(self.identity_paths_for_arn(&principal_arn).await?);
        }
        resolve_resource_against_identity(resource_set, identity_set)
    }

    /// As [`Self::resource_inbound`], filtered to a single action.
    pub async fn resource_inbound_with_action(&self, target_arn: &str, action: &str) -> Result<ActionPathSet, EvalError> {
        let resolved = self.resource_inbound(target_arn).await?;
        let action = action.to_ascii_lowercase();
        Ok(resolved.into_vec().into_iter().filter(|e| e.action.eq_ignore_ascii_case(&action)).collect())
    }

    /// All resolved actions a principal can take against a resource,
    /// regardless of which policy (resource or identity) admitted it.
    pub async fn actions_between(&self, principal_arn: &str, target_arn: &str) -> Result<Vec<String>, EvalError> {
        let resolved = self.resource_inbound(target_arn).await?;
        let principal_arn = principal_arn.to_string();
        let mut actions: Vec<String> = resolved
            .into_vec()
            .into_iter()
            .filter(|e| e.principal_arn == principal_arn)
            .map(|e| e.action)
            .collect();
        actions.sort();
        actions.dedup();
        Ok(actions)
    }

    /// Every principal that can assume `role_id`, after applying the
    /// same-account-direct-principal / identity-policy resolution rules.
    pub async fn role_inbound_assumption(&self, role_id: NodeId) -> Result<ActionPathSet, EvalError> {
        let resource_set = inbound_role_assumption_paths(self.driver.as_ref(), role_id).await?;
        let mut identity_set = ActionPathSet::new();
        for principal_arn in resource_set.principal_arns() {
            identity_set.add_path_set(self.identity_paths_for_arn(&principal_arn).await?);
        }
        resolve_assume_role(resource_set, identity_set)
    }

    /// Run the identity-transform materialiser over every role in the
    /// graph. Returns the number of roles that produced at least one
    /// `IdentityTransform` edge.
    pub async fn materialise_identity_transforms(&self) -> Result<u64, EvalError> {
        let roles: Vec<NodeId> = self
            .driver
            .nodes_by_kind(NodeKind::AwsRole)
            .await?
            .into_iter()
            .map(|n| n.id)
            .collect();
        materialise_identity_transforms(Arc::clone(&self.driver), roles, DEFAULT_WORKERS).await
    }

    /// Render the resolved statement (or statements) behind one of the
    /// graph's `AWSStatement` nodes, for display/debugging.
    pub async fn render_statement(&self, statement_id: NodeId) -> Result<Value, EvalError> {
        render_statement(self.driver.as_ref(), statement_id).await
    }

    async fn identity_paths_for_arn(&self, principal_arn: &str) -> Result<ActionPathSet, EvalError> {
        for kind in [NodeKind::AwsUser, NodeKind::AwsRole, NodeKind::AwsGroup] {
            if let Some(node) = self.driver.node_by_property(kind, "arn", principal_arn).await? {
                return unresolved_output_paths(self.driver.as_ref(), node.id).await;
            }
        }
        Ok(ActionPathSet::new())
    }
}
