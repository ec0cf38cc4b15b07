use {
    crate::EvalError,
    lazy_static::lazy_static,
    regex::Regex,
    crate::arn::Arn,
    crate::identity::{PrincipalIdentity, PrincipalSource},
    serde::{
        de::{self, Deserializer, Unexpected, Visitor},
        ser::Serializer,
        Deserialize, Serialize,
    },
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

lazy_static! {
    static ref AWS_ACCOUNT_ID: Regex = Regex::new(r"^\d{12}$").unwrap();
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AwsPrincipal {
    Account(String),
    Any,
    Arn(Arn),
}

impl AwsPrincipal {
    pub fn matches(&self, identity: &PrincipalIdentity) -> bool {
        if identity.source() != PrincipalSource::Aws {
            return false;
        }

        match self {
            Self::Any => true,
            Self::Account(account_id) => {
                let identity_arn: Arn = identity.try_into().expect("AWS principal identity must have an ARN");
                identity_arn.account_id() == account_id
            }
            Self::Arn(arn) => {
                let identity_arn: Arn = identity.try_into().expect("AWS principal identity must have an ARN");
                identity_arn == *arn
            }
        }
    }
}

impl Display for AwsPrincipal {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Account(account_id) => f.write_str(account_id),
            Self::Any => f.write_str("*"),
            Self::Arn(arn) => arn.fmt(f),
        }
    }
}

impl FromStr for AwsPrincipal {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, EvalError> {
        if s == "*" {
            Ok(Self::Any)
        } else if AWS_ACCOUNT_ID.is_match(s) {
            Ok(AwsPrincipal::Account(s.to_string()))
        } else {
            match Arn::from_str(s) {
                Ok(arn) => Ok(AwsPrincipal::Arn(arn)),
                Err(_) => Err(EvalError::InvalidPrincipal(s.to_string())),
            }
        }
    }
}

struct AwsPrincipalVisitor {}

impl<'de> Visitor<'de> for AwsPrincipalVisitor {
    type Value = AwsPrincipal;

    fn expecting(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "AWS account ID or ARN pattern")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        match AwsPrincipal::from_str(v) {
            Ok(principal) => Ok(principal),
            Err(_) => Err(E::invalid_value(Unexpected::Str(v), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for AwsPrincipal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(AwsPrincipalVisitor {})
    }
}

impl Serialize for AwsPrincipal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AwsPrincipal::Account(account_id) => serializer.serialize_str(account_id),
            AwsPrincipal::Any => serializer.serialize_str("*"),
            AwsPrincipal::Arn(arn_pattern) => serializer.serialize_str(arn_pattern.to_string().as_str()),
        }
    }
}
