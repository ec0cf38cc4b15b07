use {
    crate::{wildcard, EvalError, Context, PolicyVersion},
    crate::arn::Arn,
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

const PARTITION_START: usize = 4;

/// An Amazon Resource Name (ARN) statement in an IAM Aspen policy.
///
/// This is used to match [crate::arn::Arn] objects from a resource statement in the IAM Aspen policy language. For example,
/// an [ResourceArn] created from `arn:aws*:ec2:us-*-?:123456789012:instance/i-*` would match the following [Arn]
/// objects:
/// * `arn:aws:ec2:us-east-1:123456789012:instance/i-1234567890abcdef0`
/// * `arn:aws-us-gov:ec2:us-west-2:123456789012:instance/i-1234567890abcdef0`
///
/// Patterns are similar to glob statements with a few differences:
/// * The `*` character matches any number of characters, including none, within a single segment of the ARN.
/// * The `?` character matches any single character within a single segment of the ARN.
///
/// [ResourceArn] objects are immutable.
#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct ResourceArn {
    arn: String,
    service_start: usize,
    region_start: usize,
    account_id_start: usize,
    resource_start: usize,
}

impl ResourceArn {
    /// Create a new ARN pattern from the specified components.
    ///
    /// * `partition` - The partition the resource is in.
    /// * `service` - The service the resource belongs to.
    /// * `region` - The region the resource is in.
    /// * `account_id` - The account ID the resource belongs to.
    /// * `resource` - The resource name.
    pub fn new(partition: &str, service: &str, region: &str, account_id: &str, resource: &str) -> Self {
        let arn = format!("arn:{partition}:{service}:{region}:{account_id}:{resource}");
        let service_start = PARTITION_START + partition.len() + 1;
        let region_start = service_start + service.len() + 1;
        let account_id_start = region_start + region.len() + 1;
        let resource_start = account_id_start + account_id.len() + 1;

        Self {
            arn,
            service_start,
            region_start,
            account_id_start,
            resource_start,
        }
    }

    /// Retrieve the partition string pattern.
    #[inline]
    pub fn partition_pattern(&self) -> &str {
        &self.arn[PARTITION_START..self.service_start - 1]
    }

    /// Retrieve the service string pattern.
    #[inline]
    pub fn service_pattern(&self) -> &str {
        &self.arn[self.service_start..self.region_start - 1]
    }

    /// Retrieve the region string pattern.
    #[inline]
    pub fn region_pattern(&self) -> &str {
        &self.arn[self.region_start..self.account_id_start - 1]
    }

    /// Retrieve the account ID string pattern.
    #[inline]
    pub fn account_id_pattern(&self) -> &str {
        &self.arn[self.account_id_start..self.resource_start - 1]
    }

    /// Retrieve the resource name string pattern.
    #[inline]
    pub fn resource_pattern(&self) -> &str {
        &self.arn[self.resource_start..]
    }

    /// Indicates whether this [ResourceArn] matches the candidate [Arn], given the request [Context] ad using variable
    /// substitution rules according to the specified [PolicyVersion].
    ///
    /// # Example
    /// ```
    /// # use iam_policy_graph::{Context, PolicyVersion, Resource, ResourceArn};
    /// # use crate::arn::Arn;
    /// # use crate::identity::{PrincipalActor as Principal, User, SessionData, SessionValue};
    /// # use std::str::FromStr;
    /// let actor = Principal::from(vec![User::from_str("arn:aws:iam::123456789012:user/exampleuser").unwrap().into()]);
    /// let s3_object_arn = Arn::from_str("arn:aws:s3:::examplebucket/exampleuser/my-object").unwrap();
    /// let resources = vec![s3_object_arn.clone()];
    /// let session_data = SessionData::from([("aws:username", SessionValue::from("exampleuser"))]);
    /// let context = Context::builder()
    ///     .service("s3").action("GetObject").actor(actor).resources(resources)
    ///     .session_data(session_data).build().unwrap();
    /// let resource_arn = ResourceArn::new("aws", "s3", "", "", "examplebucket/${aws:username}/*");
    /// assert!(resource_arn.matches(&context, PolicyVersion::V2012_10_17, &s3_object_arn).unwrap());
    ///
    /// let bad_s3_object_arn = Arn::from_str("arn:aws:s3:::examplebucket/other-user/object").unwrap();
    /// assert!(!resource_arn.matches(&context, PolicyVersion::V2012_10_17, &bad_s3_object_arn).unwrap());
    /// ```
    pub fn matches(&self, context: &Context, pv: PolicyVersion, candidate: &Arn) -> Result<bool, EvalError> {
        let partition_pattern = self.partition_pattern();
        let service_pattern = self.service_pattern();
        let region_pattern = self.region_pattern();
        let account_id_pattern = self.account_id_pattern();
        let resource_pattern = context.matcher(self.resource_pattern(), pv)?;

        let partition_match = wildcard::matches(partition_pattern, candidate.partition());
        let service_match = wildcard::matches(service_pattern, candidate.service());
        let region_match = wildcard::matches(region_pattern, candidate.region());
        let account_id_match = wildcard::matches(account_id_pattern, candidate.account_id());
        let resource_match = wildcard::matches(&resource_pattern, candidate.resource());
        let result = partition_match && service_match && region_match && account_id_match && resource_match;

        log::trace!("arn_pattern_matches: pattern={:?}, candidate={} -> partition match={} service match={} region match={} account_id match={} resource={:?} vs {:?} ({}) -> result={}", self, candidate, partition_match, service_match, region_match, account_id_match, resource_pattern, candidate.resource(), resource_match, result);

        Ok(result)
    }
}

impl FromStr for ResourceArn {
    type Err = EvalError;

    /// Create an [ResourceArn] from a string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(6, ':').collect();
        if parts.len() != 6 || parts[0] != "arn" {
            return Err(EvalError::InvalidResource(s.to_string()));
        }

        let arn = s.to_string();
        let service_start = PARTITION_START + parts[1].len() + 1;
        let region_start = service_start + parts[2].len() + 1;
        let account_id_start = region_start + parts[3].len() + 1;
        let resource_start = account_id_start + parts[4].len() + 1;

        Ok(Self {
            arn,
            service_start,
            region_start,
            account_id_start,
            resource_start,
        })
    }
}

impl Display for ResourceArn {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.arn)
    }
}
