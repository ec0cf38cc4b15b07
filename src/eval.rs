use {
    crate::{arn::Arn, identity::PrincipalActor, identity::SessionData, wildcard, EvalError, PolicyVersion},
    derive_builder::Builder,
    std::fmt::{Display, Formatter, Result as FmtResult},
};

/// The request under evaluation: who is acting, on what action and
/// resources, in what service, with what session context.
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct Context {
    #[builder(setter(into))]
    action: String,
    actor: PrincipalActor,
    #[builder(default)]
    resources: Vec<Arn>,
    session_data: SessionData,

    #[builder(setter(into))]
    service: String,
}

impl Context {
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    #[inline]
    pub fn action(&self) -> &str {
        &self.action
    }

    #[inline]
    pub fn actor(&self) -> &PrincipalActor {
        &self.actor
    }

    #[inline]
    pub fn resources(&self) -> &Vec<Arn> {
        &self.resources
    }

    #[inline]
    pub fn session_data(&self) -> &SessionData {
        &self.session_data
    }

    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Build the match pattern for `s` under the given policy version: under
    /// `2012-10-17`, `${...}` variables are substituted with their session
    /// value (escaped so they're matched literally); under older (or no)
    /// versions, `s` is used as-is. Either way, the result is a pattern
    /// `wildcard::matches` can match a candidate string against.
    pub fn matcher<T: AsRef<str>>(&self, s: T, pv: PolicyVersion) -> Result<String, EvalError> {
        match pv {
            PolicyVersion::None | PolicyVersion::V2008_10_17 => Ok(s.as_ref().to_string()),
            PolicyVersion::V2012_10_17 => self.subst_vars(s.as_ref()),
        }
    }

    /// Substitute `${...}` variables in `s`, escaping `*` and `?` in the
    /// substituted values so they are matched as literal characters rather
    /// than reinterpreted as wildcards.
    pub fn subst_vars(&self, s: &str) -> Result<String, EvalError> {
        let mut i = s.chars();
        let mut pattern = String::with_capacity(s.len());

        while let Some(c) = i.next() {
            match c {
                '$' => {
                    let c = i.next().ok_or_else(|| EvalError::InvalidSubstitution(s.to_string()))?;
                    if c != '{' {
                        return Err(EvalError::InvalidSubstitution(s.to_string()));
                    }

                    let mut var = String::new();
                    loop {
                        let c = i.next().ok_or_else(|| EvalError::InvalidSubstitution(s.to_string()))?;

                        if c == '}' {
                            break;
                        }

                        var.push(c);
                    }

                    match var.as_str() {
                        "*" => pattern.push_str("\\*"),
                        "$" => pattern.push('$'),
                        "?" => pattern.push_str("\\?"),
                        var => {
                            if let Some(value) = self.session_data.get(var) {
                                pattern.push_str(&escape_wildcards(&value.as_variable_value()));
                            }
                        }
                    }
                }
                _ => pattern.push(c),
            }
        }

        Ok(pattern)
    }

    /// Substitute `${...}` variables in `s`, leaving the result as a plain
    /// string (used by condition operators that compare values exactly
    /// rather than as wildcard patterns).
    pub fn subst_vars_plain(&self, s: &str) -> Result<String, EvalError> {
        let mut i = s.chars();
        let mut result = String::new();

        while let Some(c) = i.next() {
            match c {
                '$' => {
                    let c = i.next().ok_or_else(|| EvalError::InvalidSubstitution(s.to_string()))?;
                    if c != '{' {
                        return Err(EvalError::InvalidSubstitution(s.to_string()));
                    }

                    let mut var = String::new();
                    loop {
                        let c = i.next().ok_or_else(|| EvalError::InvalidSubstitution(s.to_string()))?;
                        if c == '}' {
                            break;
                        }

                        var.push(c);
                    }

                    match var.as_str() {
                        "*" => result.push('*'),
                        "$" => result.push('$'),
                        "?" => result.push('?'),
                        var => {
                            if let Some(value) = self.session_data.get(var) {
                                result.push_str(&value.as_variable_value());
                            }
                        }
                    }
                }
                _ => result.push(c),
            }
        }

        Ok(result)
    }
}

/// Escape the wildcard metacharacters `*`/`?` with a backslash so a literal
/// substituted value can't accidentally widen a match. `wildcard::matches`
/// treats `\*`/`\?` as the literal characters they escape; this mirrors the
/// teacher's use of `regex::escape` for the same purpose.
fn escape_wildcards(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '*' || c == '?' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// The outcome of a policy evaluation.
#[derive(Debug, Eq, PartialEq)]
pub enum Decision {
    Allow,
    Deny,
    DefaultDeny,
}

impl Display for Decision {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "{}",
            match self {
                Decision::Allow => "Allow",
                Decision::Deny => "Deny",
                Decision::DefaultDeny => "DefaultDeny",
            }
        )
    }
}
