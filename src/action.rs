use {
    crate::{display_json, EvalError},
    log::debug,
    serde::{
        de::{self, Deserializer, IntoDeserializer, SeqAccess, Unexpected, Visitor},
        ser::Serializer,
        Deserialize, Serialize,
    },
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        ops::Index,
        str::FromStr,
    },
};

#[derive(Clone, Debug, Eq, Serialize)]
#[serde(untagged)]
pub enum ActionList {
    Single(Action),
    List(Vec<Action>),
}

impl PartialEq for ActionList {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Single(ref action), Self::Single(ref other_action)) => action == other_action,
            (Self::List(ref action_list), Self::List(ref other_action_list)) => action_list == other_action_list,
            (Self::Single(ref action), Self::List(ref other_action_list)) => {
                other_action_list.len() == 1 && action == &other_action_list[0]
            }
            (Self::List(ref action_list), Self::Single(ref other_action)) => {
                action_list.len() == 1 && &action_list[0] == other_action
            }
        }
    }
}

impl ActionList {
    pub fn to_vec(&self) -> Vec<&Action> {
        match self {
            Self::Single(ref action) => vec![action],
            Self::List(ref action_list) => {
                let mut result = Vec::with_capacity(action_list.len());
                for action in action_list {
                    result.push(action);
                }
                result
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(_) => false,
            Self::List(ref action_list) => action_list.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::List(ref action_list) => action_list.len(),
        }
    }
}

impl From<Action> for ActionList {
    fn from(action: Action) -> Self {
        Self::Single(action)
    }
}

impl From<Vec<Action>> for ActionList {
    fn from(actions: Vec<Action>) -> Self {
        Self::List(actions)
    }
}

impl Index<usize> for ActionList {
    type Output = Action;

    fn index(&self, index: usize) -> &Self::Output {
        match self {
            Self::Single(ref action) => {
                if index == 0 {
                    action
                } else {
                    panic!("index out of bounds: the len is 1 but the index is {}", index)
                }
            }
            Self::List(ref action_list) => &action_list[index],
        }
    }
}

display_json!(ActionList);

struct ActionListVisitor;

impl<'de> Visitor<'de> for ActionListVisitor {
    type Value = ActionList;

    fn expecting(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "a string or a list of strings")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ActionList::Single(Action::deserialize(v.into_deserializer())?))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut result = match access.size_hint() {
            Some(size) => Vec::with_capacity(size),
            None => Vec::new(),
        };

        while let Some(resource) = access.next_element()? {
            result.push(resource);
        }

        Ok(ActionList::List(result))
    }
}

impl<'de> Deserialize<'de> for ActionList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ActionListVisitor)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Action {
    Any,
    Specific {
        service: String,
        action: String,
    },
}

impl Action {
    pub fn new<S: Into<String>, A: Into<String>>(service: S, action: A) -> Result<Self, EvalError> {
        let service = service.into();
        let action = action.into();

        if service.is_empty() {
            debug!("Action '{service}:{action}' has an empty service.");
            return Err(EvalError::InvalidAction(format!("{}:{}", service, action)));
        }

        if action.is_empty() {
            debug!("Action '{service}:{action}' has an empty service.");
            return Err(EvalError::InvalidAction(format!("{}:{}", service, action)));
        }

        if !service.is_ascii() || !action.is_ascii() {
            debug!("Action '{service}:{action}' is not ASCII.");
            return Err(EvalError::InvalidAction(format!("{}:{}", service, action)));
        }

        for (i, c) in service.bytes().enumerate() {
            if !c.is_ascii_alphanumeric() && !(i > 0 && i < service.len() - 1 && (c == b'-' || c == b'_')) {
                debug!("Action '{service}:{action}' has an invalid service.");
                return Err(EvalError::InvalidAction(format!("{}:{}", service, action)));
            }
        }

        for (i, c) in action.bytes().enumerate() {
            if !c.is_ascii_alphanumeric() && c != b'*' && !(i > 0 && i < action.len() - 1 && (c == b'-' || c == b'_')) {
                debug!("Action '{service}:{action}' has an invalid action.");
                return Err(EvalError::InvalidAction(format!("{}:{}", service, action)));
            }
        }

        Ok(Action::Specific {
            service,
            action,
        })
    }

    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    #[inline]
    pub fn is_specific(&self) -> bool {
        matches!(self, Self::Specific { .. })
    }

    #[inline]
    pub fn service(&self) -> &str {
        match self {
            Self::Any => "*",
            Self::Specific {
                service,
                ..
            } => service,
        }
    }

    #[inline]
    pub fn action(&self) -> &str {
        match self {
            Self::Any => "*",
            Self::Specific {
                action,
                ..
            } => action,
        }
    }
}

impl FromStr for Action {
    type Err = EvalError;
    fn from_str(v: &str) -> Result<Self, Self::Err> {
        if v == "*" {
            return Ok(Self::Any);
        }

        let parts: Vec<&str> = v.split(':').collect();
        if parts.len() != 2 {
            return Err(EvalError::InvalidAction(v.to_string()));
        }

        let service = parts[0];
        let action = parts[1];

        Action::new(service, action)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Any => f.write_str("*"),
            Self::Specific {
                service,
                action,
            } => write!(f, "{}:{}", service, action),
        }
    }
}

struct ActionVisitor {}
impl<'de> Visitor<'de> for ActionVisitor {
    type Value = Action;

    fn expecting(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "service:action or \"*\"")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        match Action::from_str(v) {
            Ok(action) => Ok(action),
            Err(_) => Err(E::invalid_value(Unexpected::Str(v), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ActionVisitor {})
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Any => serializer.serialize_str("*"),
            Self::Specific {
                service,
                action,
            } => serializer.serialize_str(&format!("{}:{}", service, action)),
        }
    }
}
