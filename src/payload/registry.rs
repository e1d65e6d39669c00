//! The open extension point for user-defined payload types.
//!
//! Registering a type with [`announce`] lets it travel inside a
//! [`crate::payload::Payload`] and across the wire. The serialization
//! format for `T` itself is supplied by the caller (spec.md §1 Non-goals:
//! "the serialization codec for user-defined payload types" is an external
//! collaborator) — this registry only remembers, per type tag, how to call
//! into that caller-supplied codec from the transport's decode loop.

// Layer 1: Standard library imports
use std::any::Any;
use std::fmt::Debug;
use std::sync::{Arc, OnceLock};

// Layer 2: Third-party crate imports
use dashmap::DashMap;

// Layer 3: Internal module imports
// (none)

/// Marker trait for values that may occupy a [`crate::payload::PayloadValue::User`] slot.
pub trait UserPayload: Any + Debug + Send + Sync {
    /// The tag this value was `announce`d under.
    fn type_tag(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

/// A caller-supplied encode/decode pair for one user type, registered once
/// via [`announce`].
pub struct PayloadCodec {
    pub type_tag: &'static str,
    pub encode: Box<dyn Fn(&dyn UserPayload) -> Vec<u8> + Send + Sync>,
    pub decode: Box<dyn Fn(&[u8]) -> Option<Arc<dyn UserPayload>> + Send + Sync>,
}

fn registry() -> &'static DashMap<&'static str, Arc<PayloadCodec>> {
    static REGISTRY: OnceLock<DashMap<&'static str, Arc<PayloadCodec>>> = OnceLock::new();
    REGISTRY.get_or_init(DashMap::new)
}

/// Register a codec for a user-defined payload type under `type_tag`.
///
/// Calling this twice for the same tag replaces the previous codec; the
/// transport always uses whatever codec is registered at decode time.
///
/// # Example
/// ```rust
/// use std::any::Any;
/// use std::sync::Arc;
/// use haven_actors::payload::{announce, PayloadCodec, UserPayload};
///
/// #[derive(Debug)]
/// struct Point { x: i32, y: i32 }
///
/// impl UserPayload for Point {
///     fn type_tag(&self) -> &'static str { "demo.point" }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// announce(PayloadCodec {
///     type_tag: "demo.point",
///     encode: Box::new(|_value| Vec::new()),
///     decode: Box::new(|_bytes| Some(Arc::new(Point { x: 0, y: 0 }) as Arc<dyn UserPayload>)),
/// });
/// ```
pub fn announce(codec: PayloadCodec) {
    registry().insert(codec.type_tag, Arc::new(codec));
}

/// Look up the codec registered for `type_tag`, if any.
pub fn codec_for(type_tag: &str) -> Option<Arc<PayloadCodec>> {
    registry().get(type_tag).map(|entry| Arc::clone(&entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Dummy(i32);

    impl UserPayload for Dummy {
        fn type_tag(&self) -> &'static str {
            "test.dummy"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn announce_then_lookup_round_trips() {
        announce(PayloadCodec {
            type_tag: "test.dummy",
            encode: Box::new(|value| {
                let dummy = value.as_any().downcast_ref::<Dummy>().unwrap();
                dummy.0.to_le_bytes().to_vec()
            }),
            decode: Box::new(|bytes| {
                let arr: [u8; 4] = bytes.try_into().ok()?;
                Some(Arc::new(Dummy(i32::from_le_bytes(arr))) as Arc<dyn UserPayload>)
            }),
        });

        let codec = codec_for("test.dummy").expect("codec registered");
        let encoded = (codec.encode)(&Dummy(99));
        let decoded = (codec.decode)(&encoded).expect("decodes");
        let dummy = decoded.as_any().downcast_ref::<Dummy>().unwrap();
        assert_eq!(dummy.0, 99);
    }

    #[test]
    fn unregistered_tag_returns_none() {
        assert!(codec_for("test.never_registered").is_none());
    }
}
