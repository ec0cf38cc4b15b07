//! Runtime identity and session-value types.
//!
//! This replaces the `scratchstack-aws-principal` path dependency the teacher
//! crate used (not present in this workspace as a fetchable crate). The shape
//! mirrors what `eval.rs`, `principal/aws.rs`, and the condition operators
//! already expect of it: a principal actor is a list of [`PrincipalIdentity`]
//! values, a request carries [`SessionData`] keyed by context-variable name,
//! and each value is a [`SessionValue`].
//!
//! Named `PrincipalActor` rather than `Principal` to avoid colliding with
//! [`crate::principal::Principal`], the policy-document `Principal` element —
//! the two are distinct concepts the teacher kept in separate crates.

use {
    crate::EvalError,
    chrono::{DateTime, Utc},
    std::{collections::HashMap, fmt, net::IpAddr, str::FromStr},
};

/// A single context-variable value, as carried in [`SessionData`].
#[derive(Clone, Debug, PartialEq)]
pub enum SessionValue {
    Null,
    String(String),
    Integer(i64),
    Bool(bool),
    Binary(Vec<u8>),
    IpAddr(IpAddr),
    Timestamp(DateTime<Utc>),
}

impl SessionValue {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render this value the way it would appear substituted into a policy
    /// variable (`${aws:username}` etc): the closest textual representation,
    /// used by [`crate::eval::Context::subst_vars_plain`].
    pub fn as_variable_value(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Binary(b) => base64::encode(b),
            Self::IpAddr(ip) => ip.to_string(),
            Self::Timestamp(ts) => ts.to_rfc3339(),
        }
    }
}

impl From<&str> for SessionValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for SessionValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for SessionValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<bool> for SessionValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// The context-variable values available during policy evaluation, keyed by
/// names such as `aws:username` or `aws:PrincipalTag/team`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionData {
    values: HashMap<String, SessionValue>,
}

impl SessionData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&SessionValue> {
        self.values.get(key)
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, value: SessionValue) -> Option<SessionValue> {
        self.values.insert(key.into(), value)
    }
}

impl<const N: usize> From<[(&str, SessionValue); N]> for SessionData {
    fn from(pairs: [(&str, SessionValue); N]) -> Self {
        let mut values = HashMap::with_capacity(N);
        for (k, v) in pairs {
            values.insert(k.to_string(), v);
        }
        Self {
            values,
        }
    }
}

/// The source a [`PrincipalIdentity`] was issued by. Only `Aws` is modelled;
/// the enum is kept open for parity with the teacher's intent (federated and
/// service principals do not carry an ARN and are matched by name instead).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrincipalSource {
    Aws,
    Federated,
    Service,
}

/// A single identity an actor can present as: an IAM user, role, the account
/// root, an assumed-role session, a federated user, or a service principal.
#[derive(Clone, Debug, PartialEq)]
pub enum PrincipalIdentity {
    User(User),
    Role(Role),
    RootUser(RootUser),
    AssumedRole(AssumedRole),
    FederatedUser(FederatedUser),
    Service(String),
}

impl PrincipalIdentity {
    pub fn source(&self) -> PrincipalSource {
        match self {
            Self::FederatedUser(_) => PrincipalSource::Federated,
            Self::Service(_) => PrincipalSource::Service,
            _ => PrincipalSource::Aws,
        }
    }
}

impl TryFrom<&PrincipalIdentity> for crate::arn::Arn {
    type Error = EvalError;

    fn try_from(identity: &PrincipalIdentity) -> Result<Self, Self::Error> {
        match identity {
            PrincipalIdentity::User(u) => Ok(u.to_arn()),
            PrincipalIdentity::Role(r) => Ok(r.to_arn()),
            PrincipalIdentity::RootUser(r) => Ok(r.to_arn()),
            PrincipalIdentity::AssumedRole(a) => Ok(a.to_arn()),
            PrincipalIdentity::FederatedUser(_) | PrincipalIdentity::Service(_) => {
                Err(EvalError::InvalidPrincipal("identity has no ARN representation".to_string()))
            }
        }
    }
}

macro_rules! identity_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for PrincipalIdentity {
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }
    };
}

/// An IAM user: `arn:{partition}:iam::{account_id}:user{path}{name}`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    partition: String,
    account_id: String,
    path: String,
    name: String,
}

impl User {
    pub fn new(partition: &str, account_id: &str, path: &str, name: &str) -> Result<Self, EvalError> {
        Ok(Self {
            partition: partition.to_string(),
            account_id: account_id.to_string(),
            path: normalize_path(path),
            name: name.to_string(),
        })
    }

    pub fn to_arn(&self) -> crate::arn::Arn {
        crate::arn::Arn::new(&self.partition, "iam", "", &self.account_id, &format!("user{}{}", self.path, self.name))
    }
}

impl FromStr for User {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_arn_resource(s, "user").map(|(partition, account_id, path, name)| Self {
            partition,
            account_id,
            path,
            name,
        })
    }
}

identity_from!(User, User);

/// An IAM role: `arn:{partition}:iam::{account_id}:role{path}{name}`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Role {
    partition: String,
    account_id: String,
    path: String,
    name: String,
}

impl Role {
    pub fn new(partition: &str, account_id: &str, path: &str, name: &str) -> Result<Self, EvalError> {
        Ok(Self {
            partition: partition.to_string(),
            account_id: account_id.to_string(),
            path: normalize_path(path),
            name: name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn to_arn(&self) -> crate::arn::Arn {
        crate::arn::Arn::new(&self.partition, "iam", "", &self.account_id, &format!("role{}{}", self.path, self.name))
    }
}

impl FromStr for Role {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_arn_resource(s, "role").map(|(partition, account_id, path, name)| Self {
            partition,
            account_id,
            path,
            name,
        })
    }
}

identity_from!(Role, Role);

/// The root user of an account: `arn:{partition}:iam::{account_id}:root`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RootUser {
    partition: String,
    account_id: String,
}

impl RootUser {
    pub fn new(partition: &str, account_id: &str) -> Self {
        Self {
            partition: partition.to_string(),
            account_id: account_id.to_string(),
        }
    }

    pub fn to_arn(&self) -> crate::arn::Arn {
        crate::arn::Arn::new(&self.partition, "iam", "", &self.account_id, "root")
    }
}

identity_from!(RootUser, RootUser);

/// An STS assumed-role session: `arn:{partition}:sts::{account_id}:assumed-role/{role_name}/{session_name}`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssumedRole {
    partition: String,
    account_id: String,
    role_name: String,
    session_name: String,
}

impl AssumedRole {
    pub fn new(partition: &str, account_id: &str, role_name: &str, session_name: &str) -> Self {
        Self {
            partition: partition.to_string(),
            account_id: account_id.to_string(),
            role_name: role_name.to_string(),
            session_name: session_name.to_string(),
        }
    }

    pub fn to_arn(&self) -> crate::arn::Arn {
        crate::arn::Arn::new(
            &self.partition,
            "sts",
            "",
            &self.account_id,
            &format!("assumed-role/{}/{}", self.role_name, self.session_name),
        )
    }
}

identity_from!(AssumedRole, AssumedRole);

/// A federated (identity-broker) user, identified by provider and name rather than ARN.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FederatedUser {
    pub provider: String,
    pub name: String,
}

identity_from!(FederatedUser, FederatedUser);

/// An AWS service principal, e.g. `ec2.amazonaws.com`, identified by name
/// rather than ARN.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Service {
    name: String,
    path: Option<String>,
    dns_suffix: String,
}

impl Service {
    pub fn new(name: &str, path: Option<&str>, dns_suffix: &str) -> Result<Self, EvalError> {
        Ok(Self {
            name: name.to_string(),
            path: path.map(str::to_string),
            dns_suffix: dns_suffix.to_string(),
        })
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}.{}/{}", self.name, self.dns_suffix, path),
            None => write!(f, "{}.{}", self.name, self.dns_suffix),
        }
    }
}

impl From<Service> for PrincipalIdentity {
    fn from(service: Service) -> Self {
        Self::Service(service.to_string())
    }
}

fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else if !path.starts_with('/') {
        format!("/{path}")
    } else {
        path.to_string()
    }
}

fn from_arn_resource(s: &str, kind: &str) -> Result<(String, String, String, String), EvalError> {
    let arn = crate::arn::Arn::from_str(s)?;
    let resource = arn.resource();
    let prefix = format!("{kind}/");
    if !resource.starts_with(&prefix) {
        return Err(EvalError::InvalidPrincipal(s.to_string()));
    }
    let rest = &resource[prefix.len() - 1..]; // keep the leading '/'
    let name_start = rest.rfind('/').map(|i| i + 1).unwrap_or(0);
    let path = if name_start == 0 { "/".to_string() } else { rest[..name_start].to_string() };
    let name = rest[name_start..].to_string();
    Ok((arn.partition().to_string(), arn.account_id().to_string(), path, name))
}

/// An actor presenting as one or more [`PrincipalIdentity`] values. A list
/// rather than a single identity because a request can be made in the
/// context of more than one active identity (e.g. a role session carrying
/// its originating user).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrincipalActor {
    identities: Vec<PrincipalIdentity>,
}

impl PrincipalActor {
    pub fn identities(&self) -> &[PrincipalIdentity] {
        &self.identities
    }
}

impl From<Vec<PrincipalIdentity>> for PrincipalActor {
    fn from(identities: Vec<PrincipalIdentity>) -> Self {
        Self {
            identities,
        }
    }
}

impl fmt::Display for PrincipalActor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for identity in &self.identities {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            match identity {
                PrincipalIdentity::User(u) => write!(f, "{}", u.to_arn())?,
                PrincipalIdentity::Role(r) => write!(f, "{}", r.to_arn())?,
                PrincipalIdentity::RootUser(r) => write!(f, "{}", r.to_arn())?,
                PrincipalIdentity::AssumedRole(a) => write!(f, "{}", a.to_arn())?,
                PrincipalIdentity::FederatedUser(fu) => write!(f, "{}:{}", fu.provider, fu.name)?,
                PrincipalIdentity::Service(s) => write!(f, "{s}")?,
            }
        }
        Ok(())
    }
}
