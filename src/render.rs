//! Policy object renderer (component H): reconstructs the canonical IAM
//! JSON shape (`{"Statement": [{"Effect", "Action"|"NotAction", ...}]}`)
//! directly from graph nodes, the inverse of statement discovery.
//!
//! Conditions are attached to a statement, and a condition's operator/key/
//! value are attached to the condition, all via the generic `AttachedTo`
//! edge — the graph schema names `AWSCondition`/`AWSConditionOperator`/
//! `AWSConditionKey`/`AWSConditionValue` node kinds but no dedicated edge
//! kind for the relationship, so `AttachedTo` (already used for the
//! policy-document attachment chain) does double duty here; see DESIGN.md.

use {
    crate::{
        effect::Effect,
        graph::{EdgeKind, GraphDriver, NodeId, NodeKind},
        EvalError,
    },
    serde_json::{json, Map, Value},
};

async fn action_names<G: GraphDriver + ?Sized>(driver: &G, statement_id: NodeId, kind: EdgeKind) -> Result<Vec<String>, EvalError> {
    let mut names = Vec::new();
    for edge in driver.outbound(statement_id, &[kind]).await? {
        if let Some(node) = driver.node(edge.end).await? {
            if let Some(name) = node.property_str("name") {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

async fn resource_arns<G: GraphDriver + ?Sized>(driver: &G, statement_id: NodeId, kind: EdgeKind) -> Result<Vec<String>, EvalError> {
    let mut arns = Vec::new();
    for edge in driver.outbound(statement_id, &[kind]).await? {
        if let Some(node) = driver.node(edge.end).await? {
            if let Some(arn) = node.property_str("arn") {
                arns.push(arn.to_string());
            }
        }
    }
    Ok(arns)
}

async fn principal_arns<G: GraphDriver + ?Sized>(driver: &G, statement_id: NodeId, kind: EdgeKind) -> Result<Vec<String>, EvalError> {
    let mut arns = Vec::new();
    for edge in driver.outbound(statement_id, &[kind]).await? {
        match driver.node(edge.end).await? {
            Some(node) if node.kind == NodeKind::AwsPrincipalBlob => {
                for expand in driver.outbound(edge.end, &[EdgeKind::ExpandsTo]).await? {
                    if let Some(target) = driver.node(expand.end).await? {
                        if let Some(arn) = target.property_str("arn") {
                            arns.push(arn.to_string());
                        }
                    }
                }
            }
            Some(node) => {
                if let Some(arn) = node.property_str("arn") {
                    arns.push(arn.to_string());
                }
            }
            None => (),
        }
    }
    Ok(arns)
}

fn as_json_list(values: Vec<String>) -> Value {
    match values.len() {
        1 => Value::String(values.into_iter().next().unwrap()),
        _ => Value::Array(values.into_iter().map(Value::String).collect()),
    }
}

async fn render_conditions<G: GraphDriver + ?Sized>(driver: &G, statement_id: NodeId) -> Result<Option<Value>, EvalError> {
    let mut by_operator: Map<String, Value> = Map::new();

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

        if let (Some(operator), Some(key)) = (operator_name, key_name) {
            let key_map = by_operator.entry(operator).or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(map) = key_map {
                map.insert(key, as_json_list(values));
            }
        }
    }

    if by_operator.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Value::Object(by_operator)))
    }
}

/// Render a single statement node as the canonical IAM JSON object.
/// Returns [`EvalError::RenderError`] when the statement has neither an
/// `Action` nor a `NotAction` edge.
pub async fn render_statement<G: GraphDriver + ?Sized>(driver: &G, statement_id: NodeId) -> Result<Value, EvalError> {
    let statement = driver
        .node(statement_id)
        .await?
        .ok_or_else(|| EvalError::NotFound(format!("statement {statement_id}")))?;

    let effect = statement
        .property_str("effect")
        .map(|s| if s.eq_ignore_ascii_case("deny") { Effect::Deny } else { Effect::Allow })
        .unwrap_or(Effect::Allow);

    let actions = action_names(driver, statement_id, EdgeKind::Action).await?;
    let not_actions = action_names(driver, statement_id, EdgeKind::NotAction).await?;
    if actions.is_empty() && not_actions.is_empty() {
        return Err(EvalError::RenderError(format!(
            "statement {statement_id} has neither Action nor NotAction"
        )));
    }

    let resources = resource_arns(driver, statement_id, EdgeKind::Resource).await?;
    let not_resources = resource_arns(driver, statement_id, EdgeKind::NotResource).await?;

    let principals = principal_arns(driver, statement_id, EdgeKind::Principal).await?;
    let not_principals = principal_arns(driver, statement_id, EdgeKind::NotPrincipal).await?;

    let mut object = Map::new();
    if let Some(sid) = statement.property_str("sid") {
        object.insert("Sid".to_string(), Value::String(sid.to_string()));
    }
    object.insert("Effect".to_string(), Value::String(effect.to_string()));

    if !actions.is_empty() {
        object.insert("Action".to_string(), as_json_list(actions));
    } else {
        object.insert("NotAction".to_string(), as_json_list(not_actions));
    }

    if !resources.is_empty() {
        object.insert("Resource".to_string(), as_json_list(resources));
    } else if !not_resources.is_empty() {
        object.insert("NotResource".to_string(), as_json_list(not_resources));
    }

    if !principals.is_empty() {
        object.insert("Principal".to_string(), json!({ "AWS": as_json_list(principals) }));
    } else if !not_principals.is_empty() {
        object.insert("NotPrincipal".to_string(), json!({ "AWS": as_json_list(not_principals) }));
    }

    if let Some(conditions) = render_conditions(driver, statement_id).await? {
        object.insert("Condition".to_string(), conditions);
    }

    Ok(Value::Object(object))
}

/// Render every statement attached to a policy document.
pub async fn render_policy_document<G: GraphDriver + ?Sized>(driver: &G, document_id: NodeId) -> Result<Value, EvalError> {
    let mut statements = Vec::new();
    for edge in driver.outbound(document_id, &[EdgeKind::AttachedTo]).await? {
        if let Some(node) = driver.node(edge.end).await? {
            if node.kind == NodeKind::AwsStatement {
                statements.push(render_statement(driver, edge.end).await?);
            }
        }
    }
    Ok(json!({ "Version": "2012-10-17", "Statement": statements }))
}
