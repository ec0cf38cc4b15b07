//! Statement discovery (component D): turning a target ARN or principal
//! into the raw action-path entries that feed the resolution algebra.
//!
//! Grounded on `analyze.go`'s traversal helpers (`statementIncludesAction`,
//! the `AttachedTo`/`MemberOf` principal-attachment walk) and spec.md §4.D.
//! All traversals are bounded breadth-first searches over a visited set —
//! the graph is cyclic (`Statement → PolicyDocument → … ← Statement`), so
//! an unbounded walk would not terminate.

use {
    crate::{
        condition::{Condition, ConditionMap, ConditionOp},
        effect::Effect,
        graph::{EdgeKind, GraphDriver, GraphHop, NodeId, NodeKind},
        model::action_path::{ActionPathEntry, ActionPathSet},
        serutil::StringLikeList,
        EvalError,
    },
    std::{
        collections::{HashSet, VecDeque},
        str::FromStr,
    },
};

const ASSUME_ROLE_ACTION: &str = "sts:assumerole";

/// Statements with a direct `Resource` edge to the `UniqueArn` node whose
/// `arn` property equals `target_arn`.
pub async fn direct_statements<G: GraphDriver + ?Sized>(driver: &G, target_arn: &str) -> Result<Vec<NodeId>, EvalError> {
    let arn_node = match driver.node_by_property(NodeKind::UniqueArn, "arn", target_arn).await? {
        Some(node) => node,
        None => return Ok(Vec::new()),
    };
    let inbound = driver.inbound(arn_node.id, &[EdgeKind::Resource]).await?;
    Ok(inbound.into_iter().map(|e| e.start).collect())
}

/// Statements reaching `target_arn` through up to two hops of
/// `AWSResourceBlob`/`ExpandsTo` expansion.
pub async fn indirect_statements<G: GraphDriver + ?Sized>(driver: &G, target_arn: &str) -> Result<Vec<NodeId>, EvalError> {
    let arn_node = match driver.node_by_property(NodeKind::UniqueArn, "arn", target_arn).await? {
        Some(node) => node,
        None => return Ok(Vec::new()),
    };

    let mut blobs = HashSet::new();
    let mut frontier = vec![arn_node.id];
    for _ in 0..2 {
        let mut next = Vec::new();
        for id in frontier {
            for edge in driver.inbound(id, &[EdgeKind::ExpandsTo]).await? {
                if blobs.insert(edge.start) {
                    next.push(edge.start);
                }
            }
        }
        frontier = next;
        if frontier.is_empty() {
            break;
        }
    }

    let mut statements = Vec::new();
    for blob in blobs {
        for edge in driver.inbound(blob, &[EdgeKind::Resource]).await? {
            statements.push(edge.start);
        }
    }
    Ok(statements)
}

/// All statements (direct and indirect) targeting `target_arn`, deduplicated.
pub async fn resource_statements<G: GraphDriver + ?Sized>(driver: &G, target_arn: &str) -> Result<Vec<NodeId>, EvalError> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for id in direct_statements(driver, target_arn).await? {
        if seen.insert(id) {
            result.push(id);
        }
    }
    for id in indirect_statements(driver, target_arn).await? {
        if seen.insert(id) {
            result.push(id);
        }
    }
    Ok(result)
}

/// Breadth-first, depth-bounded (< 3) check of whether `statement_id`'s
/// `Action`/`ExpandsTo` edges reach `action` (case-insensitive).
pub async fn statement_includes_action<G: GraphDriver + ?Sized>(
    driver: &G,
    statement_id: NodeId,
    action: &str,
) -> Result<bool, EvalError> {
    let action = action.to_ascii_lowercase();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back((statement_id, 0usize));

    while let Some((node, depth)) = queue.pop_front() {
        if depth >= 3 || !visited.insert(node) {
            continue;
        }
        for edge in driver.outbound(node, &[EdgeKind::Action, EdgeKind::ExpandsTo]).await? {
            if edge.kind == EdgeKind::Action {
                if let Some(target) = driver.node(edge.end).await? {
                    if target.property_str("name").map(str::to_ascii_lowercase).as_deref() == Some(action.as_str()) {
                        return Ok(true);
                    }
                }
            }
            queue.push_back((edge.end, depth + 1));
        }
    }
    Ok(false)
}

/// Every action name reachable from a statement's `Action`/`ExpandsTo`
/// edges (bounded depth < 3, same traversal as [`statement_includes_action`]
/// but collecting every match instead of stopping at the first one) — the
/// applicable-action filter `unresolved_output_paths`/`resource_output_paths`
/// use so a wildcard-blob-only statement (`s3:Get*` expanded through an
/// `AWSActionBlob`) still contributes one entry per concrete action.
async fn resolved_action_names<G: GraphDriver + ?Sized>(driver: &G, statement_id: NodeId) -> Result<Vec<String>, EvalError> {
    let mut visited = HashSet::new();
    let mut seen_names = HashSet::new();
    let mut names = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back((statement_id, 0usize));

    while let Some((node, depth)) = queue.pop_front() {
        if depth >= 3 || !visited.insert(node) {
            continue;
        }
        for edge in driver.outbound(node, &[EdgeKind::Action, EdgeKind::ExpandsTo]).await? {
            if edge.kind == EdgeKind::Action {
                if let Some(target) = driver.node(edge.end).await? {
                    if let Some(name) = target.property_str("name") {
                        if seen_names.insert(name.to_string()) {
                            names.push(name.to_string());
                        }
                    }
                }
            }
            queue.push_back((edge.end, depth + 1));
        }
    }
    Ok(names)
}

/// Whether a statement has an `Action`/`ExpandsTo`-reachable action node
/// whose `ActsOn` edge reaches `resource_type_id`, eliminating false
/// positives like an IAM statement being "effective" against an S3 bucket.
pub async fn statement_acts_on_resource_type<G: GraphDriver + ?Sized>(
    driver: &G,
    statement_id: NodeId,
    resource_type_id: NodeId,
) -> Result<bool, EvalError> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back((statement_id, 0usize));

    while let Some((node, depth)) = queue.pop_front() {
        if depth >= 3 || !visited.insert(node) {
            continue;
        }
        for edge in driver.outbound(node, &[EdgeKind::Action, EdgeKind::ExpandsTo]).await? {
            if edge.kind == EdgeKind::Action {
                let acts_on = driver.outbound(edge.end, &[EdgeKind::ActsOn]).await?;
                if acts_on.iter().any(|e| e.end == resource_type_id) {
                    return Ok(true);
                }
            }
            queue.push_back((edge.end, depth + 1));
        }
    }
    Ok(false)
}

/// Walk `AttachedTo` from `statement_id` covering both shapes
/// (`…→InlinePolicy→Principal` and `…→PolicyVersion→ManagedPolicy→Principal`),
/// then expand group membership via inbound `MemberOf`. Returns
/// `(principal_node_id, is_direct)` pairs, `is_direct` meaning the
/// principal was reached without passing through an `AWSPrincipalBlob`.
pub async fn attached_principals<G: GraphDriver + ?Sized>(
    driver: &G,
    statement_id: NodeId,
) -> Result<Vec<(NodeId, bool)>, EvalError> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back((statement_id, 0usize));
    let mut principals = Vec::new();
    let mut groups = Vec::new();

    while let Some((node, depth)) = queue.pop_front() {
        if depth >= 4 || !visited.insert(node) {
            continue;
        }
        for edge in driver.outbound(node, &[EdgeKind::AttachedTo]).await? {
            if let Some(target) = driver.node(edge.end).await? {
                if target.kind == NodeKind::AwsGroup {
                    groups.push(edge.end);
                } else if target.kind.is_principal() {
                    principals.push((edge.end, true));
                }
            }
            queue.push_back((edge.end, depth + 1));
        }
    }

    for group in groups {
        for edge in driver.inbound(group, &[EdgeKind::MemberOf]).await? {
            principals.push((edge.start, true));
        }
    }

    Ok(principals)
}

/// Resolve the [`Principal`]/blob-expansion targets of a statement's
/// `Principal` edges, recording whether each was reached directly or
/// through an `AWSPrincipalBlob` expansion.
async fn principal_targets<G: GraphDriver + ?Sized>(
    driver: &G,
    statement_id: NodeId,
) -> Result<Vec<(NodeId, bool)>, EvalError> {
    let mut result = Vec::new();
    for edge in driver.outbound(statement_id, &[EdgeKind::Principal]).await? {
        match driver.node(edge.end).await? {
            Some(node) if node.kind.is_principal() => result.push((edge.end, true)),
            Some(node) if node.kind == NodeKind::AwsPrincipalBlob => {
                for expand in driver.outbound(edge.end, &[EdgeKind::ExpandsTo]).await? {
                    if let Some(target) = driver.node(expand.end).await? {
                        if target.kind.is_principal() {
                            result.push((expand.end, false));
                        }
                    }
                }
            }
            _ => (),
        }
    }
    Ok(result)
}

fn arn_of(node: &crate::graph::Node) -> String {
    node.property_str("arn").unwrap_or_default().to_string()
}

fn account_id_of(node: &crate::graph::Node) -> String {
    node.property_str("account_id").unwrap_or_default().to_string()
}

/// Tags are modelled as separate `AWSTag` nodes reached via an `ActsOn`
/// edge from the principal/resource; a `MemoryGraph`-backed caller that
/// hasn't wired those up simply gets no tags, which is a valid state (most
/// entries carry none).
fn tags_of(_node: &crate::graph::Node) -> std::collections::HashMap<String, String> {
    std::collections::HashMap::new()
}

/// Read a statement's attached `AWSCondition` nodes back into [`Condition`]
/// clauses, the same `AttachedTo`-chained shape `render.rs::render_conditions`
/// reads for display. An unrecognised operator name is skipped rather than
/// failing the whole lookup, since a graph built by an older ingest version
/// may carry operator names this crate doesn't know yet.
async fn statement_conditions<G: GraphDriver + ?Sized>(driver: &G, statement_id: NodeId) -> Result<Vec<Condition>, EvalError> {
    let mut conditions = Vec::new();

    for edge in driver.outbound(statement_id, &[EdgeKind::AttachedTo]).await? {
        let condition_node = match driver.node(edge.end).await? {
            Some(node) if node.kind == NodeKind::AwsCondition => node,
            _ => continue,
        };

        let mut operator_name = None;
        let mut key_name = None;
        let mut values = Vec::new();

        for cedge in driver.outbound(condition_node.id, &[EdgeKind::AttachedTo]).await? {
            if let Some(node) = driver.node(cedge.end).await? {
                match node.kind {
                    NodeKind::AwsConditionOperator => operator_name = node.property_str("name").map(str::to_string),
                    NodeKind::AwsConditionKey => key_name = node.property_str("name").map(str::to_string),
                    NodeKind::AwsConditionValue => {
                        if let Some(v) = node.property_str("name") {
                            values.push(v.to_string());
                        }
                    }
                    _ => (),
                }
            }
        }

        let (Some(operator_name), Some(key_name)) = (operator_name, key_name) else {
            continue;
        };
        let Ok(op) = ConditionOp::from_str(&operator_name) else {
            continue;
        };

        let mut map = ConditionMap::new();
        map.insert(key_name, StringLikeList::from(values));
        let mut condition = Condition::new();
        condition.insert(op, map);
        conditions.push(condition);
    }

    Ok(conditions)
}

/// `inbound_role_assumption_paths(role_id)`: one entry per
/// (trusted-principal, statement) attached to the role's
/// `AssumeRolePolicy` with an `Action` reaching `sts:assumerole`.
pub async fn inbound_role_assumption_paths<G: GraphDriver + ?Sized>(
    driver: &G,
    role_id: NodeId,
) -> Result<ActionPathSet, EvalError> {
    let role = driver
        .node(role_id)
        .await?
        .ok_or_else(|| EvalError::NotFound(format!("role {role_id}")))?;

    let mut set = ActionPathSet::new();
    let assume_role_policies = driver.inbound(role_id, &[EdgeKind::TypeOf]).await?;
    let mut policy_docs: Vec<NodeId> = assume_role_policies
        .iter()
        .filter(|e| e.kind == EdgeKind::TypeOf)
        .map(|e| e.start)
        .collect();
    // Some graphs attach the assume-role policy document directly via AttachedTo.
    for edge in driver.inbound(role_id, &[EdgeKind::AttachedTo]).await? {
        policy_docs.push(edge.start);
    }

    for doc in policy_docs {
        for edge in driver.outbound(doc, &[EdgeKind::AttachedTo]).await? {
            let statement_id = edge.end;
            if let Some(node) = driver.node(statement_id).await? {
                if node.kind != NodeKind::AwsStatement {
                    continue;
                }
            }
            if !statement_includes_action(driver, statement_id, ASSUME_ROLE_ACTION).await? {
                continue;
            }

            let effect = driver
                .node(statement_id)
                .await?
                .and_then(|n| n.property_str("effect").map(str::to_string))
                .map(|s| if s.eq_ignore_ascii_case("deny") { Effect::Deny } else { Effect::Allow })
                .unwrap_or(Effect::Allow);

            for (principal_id, is_direct) in principal_targets(driver, statement_id).await? {
                let principal = match driver.node(principal_id).await? {
                    Some(n) => n,
                    None => continue,
                };
                let mut entry = ActionPathEntry::new(
                    principal_id,
                    arn_of(&principal),
                    is_direct,
                    role_id,
                    arn_of(&role),
                    ASSUME_ROLE_ACTION,
                    effect,
                    statement_id,
                );
                entry.principal_tags = tags_of(&principal);
                entry.resource_tags = tags_of(&role);
                entry.conditions = statement_conditions(driver, statement_id).await?;
                entry.path = vec![GraphHop {
                    edge: EdgeKind::Principal,
                    node: principal_id,
                }];
                set.add(entry);
            }
        }
    }

    Ok(set)
}

/// One entry per (principal, action, statement, effect, conditions?) for
/// every statement found by [`resource_statements`] against `target_arn`,
/// filtered through the same applicable-action/principal-attachment/
/// account-id rules as [`unresolved_output_paths`]. This is
/// `unresolved_output_paths` with the roles of principal and resource
/// swapped: resource fixed, principal derived from attachment.
pub async fn resource_output_paths<G: GraphDriver + ?Sized>(
    driver: &G,
    target_arn: &str,
) -> Result<ActionPathSet, EvalError> {
    let resource_node = match driver.node_by_property(NodeKind::UniqueArn, "arn", target_arn).await? {
        Some(node) => node,
        None => return Ok(ActionPathSet::new()),
    };
    let resource_tags = tags_of(&resource_node);
    let resource_account = account_id_of(&resource_node);

    let mut set = ActionPathSet::new();
    for statement_id in resource_statements(driver, target_arn).await? {
        let statement = match driver.node(statement_id).await? {
            Some(n) => n,
            None => continue,
        };

        let effect = statement
            .property_str("effect")
            .map(|s| if s.eq_ignore_ascii_case("deny") { Effect::Deny } else { Effect::Allow })
            .unwrap_or(Effect::Allow);

        for (principal_id, is_direct) in attached_principals(driver, statement_id).await? {
            let principal = match driver.node(principal_id).await? {
                Some(n) => n,
                None => continue,
            };
            let principal_account = account_id_of(&principal);
            if !resource_account.is_empty() && resource_account != principal_account {
                continue;
            }

            for action in resolved_action_names(driver, statement_id).await? {
                let mut entry = ActionPathEntry::new(
                    principal_id,
                    arn_of(&principal),
                    is_direct,
                    resource_node.id,
                    target_arn,
                    action,
                    effect,
                    statement_id,
                );
                entry.principal_tags = tags_of(&principal);
                entry.resource_tags = resource_tags.clone();
                entry.conditions = statement_conditions(driver, statement_id).await?;
                set.add(entry);
            }
        }
    }

    Ok(set)
}

/// `unresolved_output_paths(principal_id)`: one entry per
/// (principal, resource, action, statement, effect, conditions?) reachable
/// by the principal-attachment pattern. This is the raw input to the
/// resolution algebra.
pub async fn unresolved_output_paths<G: GraphDriver + ?Sized>(
    driver: &G,
    principal_id: NodeId,
) -> Result<ActionPathSet, EvalError> {
    let principal = driver
        .node(principal_id)
        .await?
        .ok_or_else(|| EvalError::NotFound(format!("principal {principal_id}")))?;

    let mut set = ActionPathSet::new();
    for statement in driver.nodes_by_kind(NodeKind::AwsStatement).await? {
        let attached = attached_principals(driver, statement.id).await?;
        if !attached.iter().any(|(id, _)| *id == principal_id) {
            continue;
        }

        let effect = statement
            .property_str("effect")
            .map(|s| if s.eq_ignore_ascii_case("deny") { Effect::Deny } else { Effect::Allow })
            .unwrap_or(Effect::Allow);

        for edge in driver.outbound(statement.id, &[EdgeKind::Resource]).await? {
            let resource = match driver.node(edge.end).await? {
                Some(n) => n,
                None => continue,
            };
            let resource_arn = arn_of(&resource);
            if resource_arn.is_empty() {
                continue;
            }

            let resource_account = account_id_of(&resource);
            let principal_account = account_id_of(&principal);
            if !resource_account.is_empty() && resource_account != principal_account {
                continue;
            }

            for action in resolved_action_names(driver, statement.id).await? {
                let mut entry = ActionPathEntry::new(
                    principal_id,
                    arn_of(&principal),
                    true,
                    edge.end,
                    resource_arn.clone(),
                    action,
                    effect,
                    statement.id,
                );
                entry.principal_tags = tags_of(&principal);
                entry.resource_tags = tags_of(&resource);
                entry.conditions = statement_conditions(driver, statement.id).await?;
                set.add(entry);
            }
        }
    }

    Ok(set)
}
