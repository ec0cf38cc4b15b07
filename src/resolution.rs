//! Resolution algebra (component F): combines a resource-policy and an
//! identity-policy [`ActionPathSet`] into a resolved allow-set.
//!
//! Grounded line-for-line on `analyze.go`'s `ResolveAssumeRolePaths` and
//! `ResolveResourceAgainstIdentityPolicies`; the two entry points share
//! steps 1–4 and differ only in step 5 (intersection vs. union).

use {
    crate::{
        eval::{Context, Decision},
        identity::{PrincipalActor, SessionData, SessionValue},
        model::action_path::{ActionPathEntry, ActionPathSet},
        EvalError, PolicyVersion,
    },
};

/// Build the evaluation [`Context`] an entry's conditions are resolved
/// against, populating the fixed context-key table from spec.md §4.E:
/// `aws:PrincipalArn`, `aws:PrincipalAccount`, `aws:PrincipalTag/<name>`,
/// `aws:ResourceAccount`, `aws:ResourceTag/<name>`. Any other `${...}`
/// variable is simply absent from the session data, which is what makes it
/// resolve to `false` rather than erroring (see [`resolve_conditions`]).
fn context_for_entry(entry: &ActionPathEntry) -> Result<Context, EvalError> {
    let mut session_data = SessionData::new();
    session_data.insert("aws:PrincipalArn", SessionValue::from(entry.principal_arn.as_str()));
    session_data.insert("aws:PrincipalAccount", SessionValue::from(entry.principal_account_id()));
    session_data.insert("aws:ResourceAccount", SessionValue::from(entry.resource_account_id()));

    for (name, value) in &entry.principal_tags {
        session_data.insert(format!("aws:PrincipalTag/{name}"), SessionValue::from(value.as_str()));
    }
    for (name, value) in &entry.resource_tags {
        session_data.insert(format!("aws:ResourceTag/{name}"), SessionValue::from(value.as_str()));
    }

    Context::builder()
        .action(entry.action.clone())
        .actor(PrincipalActor::default())
        .session_data(session_data)
        .service("")
        .build()
        .map_err(|e| EvalError::BadInput(e.to_string()))
}

/// Evaluate an entry's conditions (AND across the entry's condition
/// clauses, each itself AND-across-keys/OR-across-values per
/// [`crate::condition::Condition::matches`]). An entry with no conditions
/// trivially resolves to `true`.
pub fn resolve_conditions(entry: &ActionPathEntry) -> Result<bool, EvalError> {
    if entry.conditions.is_empty() {
        return Ok(true);
    }

    let context = context_for_entry(entry)?;
    for condition in &entry.conditions {
        if !condition.matches(&context, PolicyVersion::V2012_10_17)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Steps 1–4 shared by both resolution entry points: split by conditional
/// effect, remove everything an unconditional deny matches, remove
/// everything a true conditional deny matches, promote true conditional
/// allows. Returns the surviving (resource_allow, identity_allow) sets —
/// every cond-allow that resolved true has already been folded in.
fn resolve_common(resource_set: ActionPathSet, identity_set: ActionPathSet) -> Result<(ActionPathSet, ActionPathSet), EvalError> {
    let (mut resource_allow, resource_deny, mut resource_cond_allow, resource_cond_deny) =
        resource_set.split_by_conditional_effect();
    let (mut identity_allow, identity_deny, mut identity_cond_allow, identity_cond_deny) =
        identity_set.split_by_conditional_effect();

    let mut deny_set = ActionPathSet::new();
    deny_set.add_path_set(resource_deny);
    deny_set.add_path_set(identity_deny);

    for deny in deny_set.iter() {
        resource_allow.remove_by_equality(deny);
        resource_cond_allow.remove_by_equality(deny);
        identity_allow.remove_by_equality(deny);
        identity_cond_allow.remove_by_equality(deny);
    }

    let mut cond_deny_set = ActionPathSet::new();
    cond_deny_set.add_path_set(resource_cond_deny);
    cond_deny_set.add_path_set(identity_cond_deny);

    for cond_deny in cond_deny_set.iter() {
        if resolve_conditions(cond_deny)? {
            resource_allow.remove_by_equality(cond_deny);
            resource_cond_allow.remove_by_equality(cond_deny);
            identity_allow.remove_by_equality(cond_deny);
            identity_cond_allow.remove_by_equality(cond_deny);
        }
    }

    for cond_allow in resource_cond_allow.iter() {
        match resolve_conditions(cond_allow) {
            Ok(true) => resource_allow.add(cond_allow.clone()),
            Ok(false) => (),
            Err(e) => {
                log::debug!("Skipping unresolvable resource cond-allow entry: {}", e);
            }
        }
    }
    for cond_allow in identity_cond_allow.iter() {
        match resolve_conditions(cond_allow) {
            Ok(true) => identity_allow.add(cond_allow.clone()),
            Ok(false) => (),
            Err(e) => {
                log::debug!("Skipping unresolvable identity cond-allow entry: {}", e);
            }
        }
    }

    Ok((resource_allow, identity_allow))
}

/// `resolve_assume_role(resource_set, identity_set)`: used for
/// `AssumeRolePolicy`. Step 5 is an intersection, except for AWS's
/// same-account-direct-principal short-circuit (property 5 in spec.md
/// §8): a direct, same-account resource-allow is admitted without any
/// identity-policy requirement at all.
pub fn resolve_assume_role(resource_set: ActionPathSet, identity_set: ActionPathSet) -> Result<ActionPathSet, EvalError> {
    let (resource_allow, identity_allow) = resolve_common(resource_set, identity_set)?;
    let mut resolved = ActionPathSet::new();

    for entry in resource_allow.iter() {
        let same_account = entry.principal_account_id() == entry.resource_account_id();
        if entry.is_principal_direct && same_account {
            resolved.add(entry.clone());
        } else if identity_allow.contains(entry) {
            resolved.add(entry.clone());
        }
    }

    Ok(resolved)
}

/// `resolve_resource_against_identity(resource_set, identity_set)`: used
/// for general resource-access evaluation. Step 5 is a union: every
/// surviving resource-allow and identity-allow entry is admitted.
pub fn resolve_resource_against_identity(
    resource_set: ActionPathSet,
    identity_set: ActionPathSet,
) -> Result<ActionPathSet, EvalError> {
    let (resource_allow, identity_allow) = resolve_common(resource_set, identity_set)?;
    let mut resolved = ActionPathSet::new();
    resolved.add_path_set(identity_allow);
    resolved.add_path_set(resource_allow);
    Ok(resolved)
}

/// The outcome of resolving an action-path set down to a yes/no answer for
/// a single (principal, action, resource) triple, mirroring [`Decision`].
pub fn decision_for(set: &ActionPathSet, key: (&str, &str, &str)) -> Decision {
    if set.iter().any(|e| e.key() == key) {
        Decision::Allow
    } else {
        Decision::DefaultDeny
    }
}
