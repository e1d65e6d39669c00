//! What one position of a [`Pattern`] requires of a payload value.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::payload::{Payload, PayloadValue, TypeTag};

/// What a single tuple position requires.
#[derive(Debug, Clone)]
pub enum PositionMatch {
    /// Matches anything; the value is bound and passed to the handler.
    Any,
    /// Matches any value carrying this type tag; also bound.
    Type(TypeTag),
    /// Matches only this exact value (e.g. `atom("go")`); not bound, since
    /// the handler already knows the literal.
    Value(PayloadValue),
}

impl PositionMatch {
    fn matches(&self, value: &PayloadValue) -> bool {
        match self {
            PositionMatch::Any => true,
            PositionMatch::Type(tag) => &value.type_tag() == tag,
            PositionMatch::Value(expected) => expected == value,
        }
    }

    fn binds(&self) -> bool {
        !matches!(self, PositionMatch::Value(_))
    }
}

/// A fixed-arity shape a [`Payload`] must satisfy (spec.md §4.1).
#[derive(Debug, Clone)]
pub struct Pattern(Vec<PositionMatch>);

impl Pattern {
    pub fn new(positions: Vec<PositionMatch>) -> Self {
        Self(positions)
    }

    /// A pattern matching any payload of the given arity.
    pub fn any(arity: usize) -> Self {
        Self((0..arity).map(|_| PositionMatch::Any).collect())
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Match `payload` against this pattern, returning the bound values
    /// (in position order) on success.
    pub fn try_match(&self, payload: &Payload) -> Option<Vec<PayloadValue>> {
        if payload.arity() != self.0.len() {
            return None;
        }
        let mut bindings = Vec::new();
        for (position, value) in self.0.iter().zip(payload.values()) {
            if !position.matches(value) {
                return None;
            }
            if position.binds() {
                bindings.push(value.clone());
            }
        }
        Some(bindings)
    }
}

/// Builds a [`Pattern`] from position specs, each convertible via
/// [`Into<PositionMatch>`].
///
/// # Example
/// ```rust
/// use haven_actors::pattern::Pattern;
/// use haven_actors::pattern_match;
/// use haven_actors::atom::intern;
///
/// let pattern = pattern_match![intern("go"), _];
/// assert_eq!(pattern.arity(), 2);
/// ```
#[macro_export]
macro_rules! pattern_match {
    ($($pos:tt),* $(,)?) => {
        $crate::pattern::Pattern::new(vec![$($crate::__pattern_position!($pos)),*])
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __pattern_position {
    (_) => {
        $crate::pattern::value_pattern::PositionMatch::Any
    };
    ($value:expr) => {
        $crate::pattern::value_pattern::PositionMatch::Value(
            $crate::payload::PayloadValue::from($value),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Payload;

    #[test]
    fn any_pattern_matches_any_arity_matching_payload() {
        let pattern = Pattern::any(2);
        let payload = Payload::new(vec![PayloadValue::Int(1), PayloadValue::Bool(true)]);
        let bindings = pattern.try_match(&payload).expect("matches");
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn value_position_requires_exact_equality() {
        let pattern = Pattern::new(vec![PositionMatch::Value(PayloadValue::Int(7))]);
        assert!(pattern
            .try_match(&Payload::new(vec![PayloadValue::Int(7)]))
            .is_some());
        assert!(pattern
            .try_match(&Payload::new(vec![PayloadValue::Int(8)]))
            .is_none());
    }

    #[test]
    fn type_position_binds_matching_value() {
        let pattern = Pattern::new(vec![PositionMatch::Type(TypeTag::Int)]);
        let bindings = pattern
            .try_match(&Payload::new(vec![PayloadValue::Int(3)]))
            .expect("matches");
        assert_eq!(bindings[0].as_int(), Some(3));
    }

    #[test]
    fn mismatched_arity_never_matches() {
        let pattern = Pattern::any(2);
        assert!(pattern
            .try_match(&Payload::new(vec![PayloadValue::Int(1)]))
            .is_none());
    }
}
