use {
    super::variant::Variant,
    crate::{identity::SessionValue, serutil::StringLikeList, wildcard, Context, EvalError, PolicyVersion},
};

/// String operation names.
const STRING_DISPLAY_NAMES: [&str; 12] = [
    "StringEquals",
    "StringEqualsIfExists",
    "StringNotEquals",
    "StringNotEqualsIfExists",
    "StringEqualsIgnoreCase",
    "StringEqualsIgnoreCaseIfExists",
    "StringNotEqualsIgnoreCase",
    "StringNotEqualsIgnoreCaseIfExists",
    "StringLike",
    "StringLikeIfExists",
    "StringNotLike",
    "StringNotLikeIfExists",
];

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum StringCmp {
    Equals = 0,
    EqualsIgnoreCase = 4,
    Like = 8,
}

impl StringCmp {
    pub(super) fn display_name(&self, variant: &Variant) -> &'static str {
        STRING_DISPLAY_NAMES[*self as usize | variant.as_usize()]
    }
}

pub(super) fn string_match(
    context: &Context,
    pv: PolicyVersion,
    allowed: &StringLikeList<String>,
    value: &SessionValue,
    cmp: StringCmp,
    variant: Variant,
) -> Result<bool, EvalError> {
    match value {
        SessionValue::Null => Ok(variant.if_exists()),
        SessionValue::String(value) => {
            match cmp {
                StringCmp::Like => {
                    for el in allowed.iter() {
                        let pattern = context.matcher(el, pv)?;
                        let is_match = wildcard::matches(&pattern, value);
                        log::trace!("pattern={:?} value={:?} is_match={:?}", pattern, value, is_match);
                        // If it is a match and we're not negated, or it is not a match and we are negated, return true.
                        if is_match != variant.negated() {
                            return Ok(true);
                        }
                    }

                    Ok(false)
                }
                StringCmp::Equals => string_equal_match(context, allowed, value, variant, |a: &str, b: &str| a == b),
                StringCmp::EqualsIgnoreCase => {
                    string_equal_match(context, allowed, value, variant, |a: &str, b: &str| {
                        a.to_lowercase() == b.to_lowercase()
                    })
                }
            }
        }
        _ => Ok(false),
    }
}

fn string_equal_match<F: Fn(&str, &str) -> bool>(
    context: &Context,
    allowed: &StringLikeList<String>,
    value: &str,
    variant: Variant,
    fn_op: F,
) -> Result<bool, EvalError> {
    for el in allowed.iter() {
        let el = context.subst_vars_plain(el)?;
        let is_match = fn_op(value, &el);

        // If it is a match and we're not negated, or it is not a match and we are negated, return true.
        if is_match != variant.negated() {
            return Ok(true);
        }
    }
    Ok(false)
}
