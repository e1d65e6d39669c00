//! The closed primitive set plus the open user-type extension point.

// Layer 1: Standard library imports
use std::fmt::{self, Debug, Display};
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::ActorRef;
use crate::atom::Atom;
use crate::payload::registry::UserPayload;

/// Runtime type tag for a [`PayloadValue`], used by [`crate::pattern`] to
/// express type-constrained pattern positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Unit,
    Bool,
    Int,
    UInt,
    Float,
    Str,
    Atom,
    Bytes,
    ActorRef,
    /// A registered user type, identified by the tag it was `announce`d under.
    User(&'static str),
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Unit => write!(f, "unit"),
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::Int => write!(f, "int"),
            TypeTag::UInt => write!(f, "uint"),
            TypeTag::Float => write!(f, "float"),
            TypeTag::Str => write!(f, "str"),
            TypeTag::Atom => write!(f, "atom"),
            TypeTag::Bytes => write!(f, "bytes"),
            TypeTag::ActorRef => write!(f, "actor_ref"),
            TypeTag::User(tag) => write!(f, "user:{tag}"),
        }
    }
}

/// One element of a [`Payload`] tuple.
///
/// The primitive variants are the closed set spec.md §3 describes; `User`
/// is the open registry extension point, keyed by the tag it was
/// `announce`d under (the codec for the user type itself is supplied by
/// the caller, not this crate — spec.md §1 Non-goals).
#[derive(Debug, Clone)]
pub enum PayloadValue {
    Unit,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Atom(Atom),
    Bytes(Vec<u8>),
    ActorRef(ActorRef),
    User(Arc<dyn UserPayload>),
}

impl PayloadValue {
    /// The runtime type tag of this value, used for pattern matching.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            PayloadValue::Unit => TypeTag::Unit,
            PayloadValue::Bool(_) => TypeTag::Bool,
            PayloadValue::Int(_) => TypeTag::Int,
            PayloadValue::UInt(_) => TypeTag::UInt,
            PayloadValue::Float(_) => TypeTag::Float,
            PayloadValue::Str(_) => TypeTag::Str,
            PayloadValue::Atom(_) => TypeTag::Atom,
            PayloadValue::Bytes(_) => TypeTag::Bytes,
            PayloadValue::ActorRef(_) => TypeTag::ActorRef,
            PayloadValue::User(value) => TypeTag::User(value.type_tag()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PayloadValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PayloadValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PayloadValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PayloadValue::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_atom(&self) -> Option<Atom> {
        match self {
            PayloadValue::Atom(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_actor_ref(&self) -> Option<&ActorRef> {
        match self {
            PayloadValue::ActorRef(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for PayloadValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PayloadValue::Unit, PayloadValue::Unit) => true,
            (PayloadValue::Bool(a), PayloadValue::Bool(b)) => a == b,
            (PayloadValue::Int(a), PayloadValue::Int(b)) => a == b,
            (PayloadValue::UInt(a), PayloadValue::UInt(b)) => a == b,
            (PayloadValue::Float(a), PayloadValue::Float(b)) => a == b,
            (PayloadValue::Str(a), PayloadValue::Str(b)) => a == b,
            (PayloadValue::Atom(a), PayloadValue::Atom(b)) => a == b,
            (PayloadValue::Bytes(a), PayloadValue::Bytes(b)) => a == b,
            (PayloadValue::ActorRef(a), PayloadValue::ActorRef(b)) => a.global_id() == b.global_id(),
            // User values are compared by identity: two distinct decodes of
            // equal bytes are not required to be `==`, only a value against
            // itself (e.g. a pattern literal built from the same handle).
            (PayloadValue::User(a), PayloadValue::User(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for PayloadValue {
    fn from(v: bool) -> Self {
        PayloadValue::Bool(v)
    }
}

impl From<i64> for PayloadValue {
    fn from(v: i64) -> Self {
        PayloadValue::Int(v)
    }
}

impl From<u64> for PayloadValue {
    fn from(v: u64) -> Self {
        PayloadValue::UInt(v)
    }
}

impl From<f64> for PayloadValue {
    fn from(v: f64) -> Self {
        PayloadValue::Float(v)
    }
}

impl From<&str> for PayloadValue {
    fn from(v: &str) -> Self {
        PayloadValue::Str(v.to_owned())
    }
}

impl From<String> for PayloadValue {
    fn from(v: String) -> Self {
        PayloadValue::Str(v)
    }
}

impl From<Atom> for PayloadValue {
    fn from(v: Atom) -> Self {
        PayloadValue::Atom(v)
    }
}

impl From<ActorRef> for PayloadValue {
    fn from(v: ActorRef) -> Self {
        PayloadValue::ActorRef(v)
    }
}

/// An ordered, fixed-arity tuple of [`PayloadValue`]s.
///
/// Payloads are immutable once sent (spec.md §3): construction is the only
/// mutation surface, everything downstream (matching, forwarding, wire
/// encoding) only ever reads.
///
/// # Example
/// ```rust
/// use haven_actors::atom::intern;
/// use haven_actors::payload::Payload;
///
/// let payload = Payload::new(vec![intern("go").into(), 42i64.into()]);
/// assert_eq!(payload.arity(), 2);
/// assert_eq!(payload.get(1).and_then(|v| v.as_int()), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Payload(Vec<PayloadValue>);

impl Payload {
    pub fn new(values: Vec<PayloadValue>) -> Self {
        Self(values)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&PayloadValue> {
        self.0.get(index)
    }

    pub fn values(&self) -> &[PayloadValue] {
        &self.0
    }

    pub fn into_values(self) -> Vec<PayloadValue> {
        self.0
    }
}

impl Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value.type_tag())?;
        }
        write!(f, ")")
    }
}

/// Builds a [`Payload`] from a list of values, each convertible via `Into<PayloadValue>`.
///
/// # Example
/// ```rust
/// use haven_actors::{payload, atom::intern};
///
/// let p = payload![intern("foo"), intern("bar"), 7i64];
/// assert_eq!(p.arity(), 3);
/// ```
#[macro_export]
macro_rules! payload {
    ($($value:expr),* $(,)?) => {
        $crate::payload::Payload::new(vec![$($crate::payload::PayloadValue::from($value)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_arity_and_access() {
        let p = Payload::new(vec![PayloadValue::Int(1), PayloadValue::Bool(true)]);
        assert_eq!(p.arity(), 2);
        assert_eq!(p.get(0).and_then(PayloadValue::as_int), Some(1));
        assert_eq!(p.get(1).and_then(PayloadValue::as_bool), Some(true));
        assert!(p.get(2).is_none());
    }

    #[test]
    fn value_equality_by_content() {
        assert_eq!(PayloadValue::Int(3), PayloadValue::Int(3));
        assert_ne!(PayloadValue::Int(3), PayloadValue::Int(4));
        assert_ne!(PayloadValue::Int(3), PayloadValue::UInt(3));
    }

    #[test]
    fn type_tag_reflects_variant() {
        assert_eq!(PayloadValue::Str("x".into()).type_tag(), TypeTag::Str);
        assert_eq!(PayloadValue::Bytes(vec![1]).type_tag(), TypeTag::Bytes);
    }

    #[test]
    fn payload_macro_builds_tuple() {
        let p = payload![1i64, "hi", true];
        assert_eq!(p.arity(), 3);
        assert_eq!(p.get(0).and_then(PayloadValue::as_int), Some(1));
        assert_eq!(p.get(1).and_then(PayloadValue::as_str), Some("hi"));
    }
}
