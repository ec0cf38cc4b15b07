//! Identity-transform materialiser (component G): for every role, resolve
//! inbound assume-role paths against identity policies and persist the
//! survivors as `IdentityTransform` edges.
//!
//! Grounded on the worker-pool / bounded-channel shape of
//! `com-junkawasaki-kotoba`'s deploy/scaling pipeline, adapted to a plain
//! `tokio::sync::mpsc` fan-out since this crate has no metrics/scaling
//! concerns of its own — just "N roles, W workers, one write per role".

use {
    crate::{
        discovery::{inbound_role_assumption_paths, unresolved_output_paths},
        graph::{EdgeKind, GraphDriver, NewEdge, NodeId},
        model::action_path::ActionPathSet,
        resolution::resolve_assume_role,
        EvalError,
    },
    log::{debug, error, info},
    std::sync::{atomic::{AtomicU64, Ordering}, Arc},
    tokio::sync::mpsc,
};

/// The identity-transform pipelines the materialiser runs. All three share
/// the same shape; they differ only in the action matched and the edge
/// `name` property recorded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransformKind {
    AssumeRole,
    UpdateAssumeRolePolicy,
    CreateAccessKey,
}

impl TransformKind {
    pub fn edge_name(&self) -> &'static str {
        match self {
            Self::AssumeRole => "sts:assumerole",
            Self::UpdateAssumeRolePolicy => "iam:updateassumerolepolicy",
            Self::CreateAccessKey => "iam:createaccesskey",
        }
    }
}

/// Default worker-pool size, per spec.md §4.G ("default 1000 logical
/// workers... or pin to a bounded async channel"); capped to a sane number
/// of concurrent graph calls for an in-memory or locally-run driver.
pub const DEFAULT_WORKERS: usize = 64;

/// Materialise `sts:assumerole` identity transforms for every role in
/// `roles`, using up to `workers` concurrent tasks against `driver`.
/// Per-role failures are logged and do not abort the run; the returned
/// count is the number of roles that produced at least one transform edge.
pub async fn materialise_identity_transforms<G: GraphDriver + 'static>(
    driver: Arc<G>,
    roles: Vec<NodeId>,
    workers: usize,
) -> Result<u64, EvalError> {
    let total = roles.len();
    let (tx, mut rx) = mpsc::channel::<NodeId>(total.max(1));
    for role in roles {
        tx.send(role)
            .await
            .map_err(|_| EvalError::GraphError("materialiser job queue closed".to_string()))?;
    }
    drop(tx);

    let completed = Arc::new(AtomicU64::new(0));
    let successful = Arc::new(AtomicU64::new(0));
    let rx = Arc::new(tokio::sync::Mutex::new(rx));

    let mut handles = Vec::with_capacity(workers);
    for _ in 0..workers.max(1) {
        let driver = Arc::clone(&driver);
        let rx = Arc::clone(&rx);
        let completed = Arc::clone(&completed);
        let successful = Arc::clone(&successful);

        handles.push(tokio::spawn(async move {
            loop {
                let role = {
                    let mut guard = rx.lock().await;
                    guard.recv().await
                };
                let Some(role) = role else { break };

                match materialise_role(driver.as_ref(), role).await {
                    Ok(wrote) => {
                        if wrote {
                            successful.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    Err(e) => error!("materialise_identity_transforms: role {role}: {e}"),
                }

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % 100 == 0 {
                    info!("materialise_identity_transforms: {done}/{total} roles processed");
                }
            }
        }));
    }

    for handle in handles {
        let _ = handle.await;
    }

    Ok(successful.load(Ordering::Relaxed))
}

/// Resolve and write the `sts:assumerole` transforms for a single role.
/// Returns `true` if any edge was written.
async fn materialise_role<G: GraphDriver>(driver: &G, role_id: NodeId) -> Result<bool, EvalError> {
    let resource_set = inbound_role_assumption_paths(driver, role_id).await?;
    if resource_set.is_empty() {
        return Ok(false);
    }

    let mut identity_set = ActionPathSet::new();
    for principal_arn in resource_set.principal_arns() {
        if let Some(principal) = driver.node_by_property(crate::graph::NodeKind::AwsUser, "arn", &principal_arn).await? {
            identity_set.add_path_set(unresolved_output_paths(driver, principal.id).await?);
        } else if let Some(principal) = driver.node_by_property(crate::graph::NodeKind::AwsRole, "arn", &principal_arn).await? {
            identity_set.add_path_set(unresolved_output_paths(driver, principal.id).await?);
        }
    }

    let resolved = resolve_assume_role(resource_set, identity_set)?;
    if resolved.is_empty() {
        debug!("materialise_role: role {role_id} has no resolved assume-role paths");
        return Ok(false);
    }

    let edges: Vec<NewEdge> = resolved
        .iter()
        .map(|entry| {
            NewEdge::new(entry.principal_id, role_id, EdgeKind::IdentityTransform)
                .with_property("name", TransformKind::AssumeRole.edge_name())
                .with_property("layer", 2i64)
        })
        .collect();

    driver.write_edges(edges).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::graph::{MemoryGraph, NodeKind, PropertyValue},
        pretty_assertions::assert_eq,
    };

    #[test_log::test(tokio::test)]
    async fn test_materialise_writes_identity_transform_edge() {
        let graph = Arc::new(MemoryGraph::new());
        let role = graph.add_node(NodeKind::AwsRole).await;
        graph.set_property(role, "arn", PropertyValue::from("arn:aws:iam::111:role/R")).await;

        let policy_doc = graph.add_node(NodeKind::AwsAssumeRolePolicy).await;
        graph.add_edge(policy_doc, role, EdgeKind::TypeOf).await;

        let statement = graph.add_node(NodeKind::AwsStatement).await;
        graph.set_property(statement, "effect", PropertyValue::from("Allow")).await;
        graph.add_edge(policy_doc, statement, EdgeKind::AttachedTo).await;

        let action = graph.add_node(NodeKind::AwsAction).await;
        graph.set_property(action, "name", PropertyValue::from("sts:assumerole")).await;
        graph.add_edge(statement, action, EdgeKind::Action).await;

        let trustee = graph.add_node(NodeKind::AwsUser).await;
        graph.set_property(trustee, "arn", PropertyValue::from("arn:aws:iam::111:user/U")).await;
        graph.add_edge(statement, trustee, EdgeKind::Principal).await;

        let processed = materialise_identity_transforms(Arc::clone(&graph), vec![role], 4).await.unwrap();
        assert_eq!(processed, 1);

        let out = graph.outbound(trustee, &[EdgeKind::IdentityTransform]).await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].end, role);
    }
}
