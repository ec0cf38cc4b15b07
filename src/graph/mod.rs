//! Typed graph abstraction: node/edge kinds (component B) and the
//! `GraphDriver` contract (component A) the rest of the crate evaluates
//! against.
//!
//! Node and edge kinds are carried verbatim from
//! `graphschema/aws/aws.go` in the original system: they are part of the
//! external ingest contract and must not be renamed. The evaluator never
//! compares kind labels as free strings; every comparison goes through
//! [`NodeKind`]/[`EdgeKind`].

mod memory;

pub use memory::MemoryGraph;

use {
    crate::EvalError,
    std::collections::HashMap,
    std::fmt::{Display, Formatter, Result as FmtResult},
};

/// Opaque node handle. Never interpreted as anything but an index into the
/// driver's backing store.
pub type NodeId = u64;

/// A node kind, as ingested into the graph.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeKind {
    AwsAccount,
    AwsEntity,
    AwsTag,
    AwsAction,
    AwsActionBlob,
    AwsResourceBlob,
    AwsPrincipalBlob,
    AwsConditionKey,
    AwsConditionValue,
    AwsConditionOperator,
    AwsCondition,
    AwsStatement,
    AwsPolicyDocument,
    AwsPolicyVersion,
    AwsManagedPolicy,
    AwsInlinePolicy,
    AwsAssumeRolePolicy,
    AwsRole,
    AwsUser,
    AwsGroup,
    UniqueArn,
    AwsResourceType,
}

impl NodeKind {
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::AwsAccount => "AWSAccount",
            Self::AwsEntity => "AWSBase",
            Self::AwsTag => "AWSTag",
            Self::AwsAction => "AWSAction",
            Self::AwsActionBlob => "AWSActionBlob",
            Self::AwsResourceBlob => "AWSResourceBlob",
            Self::AwsPrincipalBlob => "AWSPrincipalBlob",
            Self::AwsConditionKey => "AWSConditionKey",
            Self::AwsConditionValue => "AWSConditionValue",
            Self::AwsConditionOperator => "AWSConditionOperator",
            Self::AwsCondition => "AWSCondition",
            Self::AwsStatement => "AWSStatement",
            Self::AwsPolicyDocument => "AWSPolicyDocument",
            Self::AwsPolicyVersion => "AWSPolicyVersion",
            Self::AwsManagedPolicy => "AWSManagedPolicy",
            Self::AwsInlinePolicy => "AWSInlinePolicy",
            Self::AwsAssumeRolePolicy => "AWSAssumeRolePolicy",
            Self::AwsRole => "AWSRole",
            Self::AwsUser => "AWSUser",
            Self::AwsGroup => "AWSGroup",
            Self::UniqueArn => "UniqueArn",
            Self::AwsResourceType => "AWSResourceType",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Some(match s {
            "AWSAccount" => Self::AwsAccount,
            "AWSBase" => Self::AwsEntity,
            "AWSTag" => Self::AwsTag,
            "AWSAction" => Self::AwsAction,
            "AWSActionBlob" => Self::AwsActionBlob,
            "AWSResourceBlob" => Self::AwsResourceBlob,
            "AWSPrincipalBlob" => Self::AwsPrincipalBlob,
            "AWSConditionKey" => Self::AwsConditionKey,
            "AWSConditionValue" => Self::AwsConditionValue,
            "AWSConditionOperator" => Self::AwsConditionOperator,
            "AWSCondition" => Self::AwsCondition,
            "AWSStatement" => Self::AwsStatement,
            "AWSPolicyDocument" => Self::AwsPolicyDocument,
            "AWSPolicyVersion" => Self::AwsPolicyVersion,
            "AWSManagedPolicy" => Self::AwsManagedPolicy,
            "AWSInlinePolicy" => Self::AwsInlinePolicy,
            "AWSAssumeRolePolicy" => Self::AwsAssumeRolePolicy,
            "AWSRole" => Self::AwsRole,
            "AWSUser" => Self::AwsUser,
            "AWSGroup" => Self::AwsGroup,
            "UniqueArn" => Self::UniqueArn,
            "AWSResourceType" => Self::AwsResourceType,
            _ => return None,
        })
    }

    /// Whether this kind is one of the principal kinds (user, role, group).
    pub fn is_principal(&self) -> bool {
        matches!(self, Self::AwsUser | Self::AwsRole | Self::AwsGroup)
    }
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.as_label())
    }
}

/// An edge kind.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EdgeKind {
    ActsOn,
    Action,
    NotAction,
    AttachedTo,
    ExpandsTo,
    Resource,
    NotResource,
    Principal,
    NotPrincipal,
    MemberOf,
    TypeOf,
    IdentityTransform,
}

impl EdgeKind {
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::ActsOn => "ActsOn",
            Self::Action => "Action",
            Self::NotAction => "NotAction",
            Self::AttachedTo => "AttachedTo",
            Self::ExpandsTo => "ExpandsTo",
            Self::Resource => "Resource",
            Self::NotResource => "NotResource",
            Self::Principal => "Principal",
            Self::NotPrincipal => "NotPrincipal",
            Self::MemberOf => "MemberOf",
            Self::TypeOf => "TypeOf",
            Self::IdentityTransform => "IdentityTransform",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Some(match s {
            "ActsOn" => Self::ActsOn,
            "Action" => Self::Action,
            "NotAction" => Self::NotAction,
            "AttachedTo" => Self::AttachedTo,
            "ExpandsTo" => Self::ExpandsTo,
            "Resource" => Self::Resource,
            "NotResource" => Self::NotResource,
            "Principal" => Self::Principal,
            "NotPrincipal" => Self::NotPrincipal,
            "MemberOf" => Self::MemberOf,
            "TypeOf" => Self::TypeOf,
            "IdentityTransform" => Self::IdentityTransform,
            _ => return None,
        })
    }
}

impl Display for EdgeKind {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.as_label())
    }
}

/// A node property value. The backing store is schemaless; this crate only
/// needs strings, integers, and booleans.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Bool(bool),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A node as returned by a [`GraphDriver`].
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub properties: HashMap<String, PropertyValue>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            properties: HashMap::new(),
        }
    }

    pub fn with_property<K: Into<String>, V: Into<PropertyValue>>(mut self, key: K, value: V) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(PropertyValue::as_str)
    }
}

/// An edge as returned by a [`GraphDriver`].
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub start: NodeId,
    pub end: NodeId,
    pub kind: EdgeKind,
    pub properties: HashMap<String, PropertyValue>,
}

impl Edge {
    pub fn new(start: NodeId, end: NodeId, kind: EdgeKind) -> Self {
        Self {
            start,
            end,
            kind,
            properties: HashMap::new(),
        }
    }
}

/// One hop of a traversal result, retained for UI path display
/// (`ActionPathEntry::path`).
#[derive(Clone, Debug, PartialEq)]
pub struct GraphHop {
    pub edge: EdgeKind,
    pub node: NodeId,
}

/// A new edge to write, keyed for idempotent creation on (start, end, kind,
/// name) by the driver.
#[derive(Clone, Debug, PartialEq)]
pub struct NewEdge {
    pub start: NodeId,
    pub end: NodeId,
    pub kind: EdgeKind,
    pub properties: HashMap<String, PropertyValue>,
}

impl NewEdge {
    pub fn new(start: NodeId, end: NodeId, kind: EdgeKind) -> Self {
        Self {
            start,
            end,
            kind,
            properties: HashMap::new(),
        }
    }

    pub fn with_property<K: Into<String>, V: Into<PropertyValue>>(mut self, key: K, value: V) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// The graph-database driver contract (component A). A real implementation
/// wraps a Cypher-capable store; [`MemoryGraph`] is the in-memory reference
/// implementation used throughout the test suite.
///
/// Every method returns [`EvalError::GraphError`] on transport, parse, or
/// consistency failure. Reads observe a single consistent snapshot; writes
/// are batched and fail atomically.
#[async_trait::async_trait]
pub trait GraphDriver: Send + Sync {
    /// Fetch a single node by id.
    async fn node(&self, id: NodeId) -> Result<Option<Node>, EvalError>;

    /// All nodes of a given kind.
    async fn nodes_by_kind(&self, kind: NodeKind) -> Result<Vec<Node>, EvalError>;

    /// The first node of `kind` whose property `key` equals `value`.
    async fn node_by_property(&self, kind: NodeKind, key: &str, value: &str) -> Result<Option<Node>, EvalError>;

    /// Outbound edges from `id` restricted to `kinds` (empty means all kinds).
    async fn outbound(&self, id: NodeId, kinds: &[EdgeKind]) -> Result<Vec<Edge>, EvalError>;

    /// Inbound edges to `id` restricted to `kinds` (empty means all kinds).
    async fn inbound(&self, id: NodeId, kinds: &[EdgeKind]) -> Result<Vec<Edge>, EvalError>;

    /// Commit a batch of new edges in a single write transaction. Creation
    /// is idempotent, keyed on (start, end, kind's `name` property).
    async fn write_edges(&self, edges: Vec<NewEdge>) -> Result<(), EvalError>;
}
