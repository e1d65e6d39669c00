//! The wire message enum and its tagged binary encoding (spec.md §6, §4.7).

// Layer 1: Standard library imports
use std::io;

// Layer 2: Third-party crate imports
use bytes::{Buf, BufMut, Bytes, BytesMut};

// Layer 3: Internal module imports
use crate::actor::exit::ExitReason;
use crate::payload::{Payload, PayloadValue};
use crate::util::{ActorId, NodeId, RequestId};

/// `msg_type` discriminant (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireTag {
    UserMessage = 0,
    LookupRequest = 1,
    LookupReply = 2,
    MonitorRequest = 3,
    DownNotification = 4,
    GroupSubscribe = 5,
    GroupPublish = 6,
    Handshake = 7,
    HandshakeAck = 8,
}

impl WireTag {
    fn from_u8(tag: u8) -> io::Result<Self> {
        Ok(match tag {
            0 => WireTag::UserMessage,
            1 => WireTag::LookupRequest,
            2 => WireTag::LookupReply,
            3 => WireTag::MonitorRequest,
            4 => WireTag::DownNotification,
            5 => WireTag::GroupSubscribe,
            6 => WireTag::GroupPublish,
            7 => WireTag::Handshake,
            8 => WireTag::HandshakeAck,
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unknown wire tag {other}"),
                ))
            }
        })
    }
}

/// A decoded frame body. `UserMessage` carries the `{ sender, receiver,
/// request_id, is_response, payload }` shape spec.md §6 describes; the
/// remaining variants are the transport's own control-plane RPCs.
#[derive(Debug, Clone)]
pub enum WireMessage {
    UserMessage {
        sender_node: NodeId,
        sender_id: ActorId,
        receiver_id: ActorId,
        request_id: Option<RequestId>,
        is_response: bool,
        payload: Payload,
    },
    LookupRequest,
    LookupReply {
        actor_id: Option<ActorId>,
    },
    MonitorRequest {
        actor_id: ActorId,
        observer_node: NodeId,
        observer_id: ActorId,
        /// `true` asks the receiver to forget `observer_id` rather than add
        /// it — sent when a [`crate::transport::proxy::ProxyActor`]'s last
        /// local reference drops (spec.md §4.8).
        release: bool,
    },
    DownNotification {
        actor_id: ActorId,
        reason: ExitReason,
    },
    GroupSubscribe {
        module: String,
        name: String,
        subscriber_node: NodeId,
        subscriber_id: ActorId,
    },
    GroupPublish {
        module: String,
        name: String,
        payload: Payload,
    },
    Handshake {
        node: NodeId,
        nonce: u64,
    },
    HandshakeAck {
        node: NodeId,
        nonce: u64,
    },
}

fn put_string(buf: &mut BytesMut, text: &str) {
    buf.put_u32_le(text.len() as u32);
    buf.put_slice(text.as_bytes());
}

fn get_string(buf: &mut Bytes) -> io::Result<String> {
    let len = buf.get_u32_le() as usize;
    if buf.remaining() < len {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated string"));
    }
    let bytes = buf.copy_to_bytes(len);
    String::from_utf8(bytes.to_vec())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

fn put_value(buf: &mut BytesMut, value: &PayloadValue) {
    match value {
        PayloadValue::Unit => buf.put_u8(0),
        PayloadValue::Bool(v) => {
            buf.put_u8(1);
            buf.put_u8(*v as u8);
        }
        PayloadValue::Int(v) => {
            buf.put_u8(2);
            buf.put_i64_le(*v);
        }
        PayloadValue::UInt(v) => {
            buf.put_u8(3);
            buf.put_u64_le(*v);
        }
        PayloadValue::Float(v) => {
            buf.put_u8(4);
            buf.put_f64_le(*v);
        }
        PayloadValue::Str(v) => {
            buf.put_u8(5);
            put_string(buf, v);
        }
        PayloadValue::Atom(v) => {
            buf.put_u8(6);
            put_string(buf, v.as_str());
        }
        PayloadValue::Bytes(v) => {
            buf.put_u8(7);
            buf.put_u32_le(v.len() as u32);
            buf.put_slice(v);
        }
        PayloadValue::ActorRef(v) => {
            buf.put_u8(8);
            buf.put_u128_le(v.node().as_raw());
            buf.put_u64_le(v.id().as_raw());
        }
        PayloadValue::User(user) => {
            buf.put_u8(9);
            put_string(buf, user.type_tag());
            match crate::payload::registry::codec_for(user.type_tag()) {
                Some(codec) => {
                    let encoded = (codec.encode)(user.as_ref());
                    buf.put_u32_le(encoded.len() as u32);
                    buf.put_slice(&encoded);
                }
                None => buf.put_u32_le(0),
            }
        }
    }
}

fn get_value(buf: &mut Bytes) -> io::Result<PayloadValue> {
    let tag = buf.get_u8();
    Ok(match tag {
        0 => PayloadValue::Unit,
        1 => PayloadValue::Bool(buf.get_u8() != 0),
        2 => PayloadValue::Int(buf.get_i64_le()),
        3 => PayloadValue::UInt(buf.get_u64_le()),
        4 => PayloadValue::Float(buf.get_f64_le()),
        5 => PayloadValue::Str(get_string(buf)?),
        6 => PayloadValue::Atom(crate::atom::intern(&get_string(buf)?)),
        7 => {
            let len = buf.get_u32_le() as usize;
            PayloadValue::Bytes(buf.copy_to_bytes(len).to_vec())
        }
        8 => {
            let node = NodeId::from_raw(buf.get_u128_le());
            let actor = ActorId::from_raw(buf.get_u64_le());
            // Decoding a bare ActorRef value out of a payload (as opposed
            // to the envelope's own sender/receiver) requires the active
            // connection to resolve node/actor into a local proxy; that
            // translation happens one layer up, in the connection's inbound
            // handler, which is why this only carries the raw identity.
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("actor ref value ({node}, {actor}) requires connection-level resolution"),
            ));
        }
        9 => {
            let type_tag = get_string(buf)?;
            let len = buf.get_u32_le() as usize;
            let bytes = buf.copy_to_bytes(len);
            let type_tag: &'static str = Box::leak(type_tag.into_boxed_str());
            match crate::payload::registry::codec_for(type_tag) {
                Some(codec) => match (codec.decode)(&bytes) {
                    Some(value) => PayloadValue::User(value),
                    None => {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("codec for {type_tag} rejected its own bytes"),
                        ))
                    }
                },
                None => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("no codec registered for user type {type_tag}"),
                    ))
                }
            }
        }
        other => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown payload value tag {other}"),
            ))
        }
    })
}

fn put_payload(buf: &mut BytesMut, payload: &Payload) {
    buf.put_u32_le(payload.arity() as u32);
    for value in payload.values() {
        put_value(buf, value);
    }
}

fn get_payload(buf: &mut Bytes) -> io::Result<Payload> {
    let arity = buf.get_u32_le() as usize;
    let mut values = Vec::with_capacity(arity);
    for _ in 0..arity {
        values.push(get_value(buf)?);
    }
    Ok(Payload::new(values))
}

pub fn encode(message: &WireMessage, buf: &mut BytesMut) {
    match message {
        WireMessage::UserMessage {
            sender_node,
            sender_id,
            receiver_id,
            request_id,
            is_response,
            payload,
        } => {
            buf.put_u8(WireTag::UserMessage as u8);
            buf.put_u128_le(sender_node.as_raw());
            buf.put_u64_le(sender_id.as_raw());
            buf.put_u64_le(receiver_id.as_raw());
            buf.put_u64_le(request_id.map(|r| r.as_raw()).unwrap_or(0));
            buf.put_u8(*is_response as u8);
            put_payload(buf, payload);
        }
        WireMessage::LookupRequest => {
            buf.put_u8(WireTag::LookupRequest as u8);
        }
        WireMessage::LookupReply { actor_id } => {
            buf.put_u8(WireTag::LookupReply as u8);
            buf.put_u8(actor_id.is_some() as u8);
            buf.put_u64_le(actor_id.map(|a| a.as_raw()).unwrap_or(0));
        }
        WireMessage::MonitorRequest {
            actor_id,
            observer_node,
            observer_id,
            release,
        } => {
            buf.put_u8(WireTag::MonitorRequest as u8);
            buf.put_u64_le(actor_id.as_raw());
            buf.put_u128_le(observer_node.as_raw());
            buf.put_u64_le(observer_id.as_raw());
            buf.put_u8(*release as u8);
        }
        WireMessage::DownNotification { actor_id, reason } => {
            buf.put_u8(WireTag::DownNotification as u8);
            buf.put_u64_le(actor_id.as_raw());
            buf.put_u32_le(reason.code());
        }
        WireMessage::GroupSubscribe {
            module,
            name,
            subscriber_node,
            subscriber_id,
        } => {
            buf.put_u8(WireTag::GroupSubscribe as u8);
            put_string(buf, module);
            put_string(buf, name);
            buf.put_u128_le(subscriber_node.as_raw());
            buf.put_u64_le(subscriber_id.as_raw());
        }
        WireMessage::GroupPublish {
            module,
            name,
            payload,
        } => {
            buf.put_u8(WireTag::GroupPublish as u8);
            put_string(buf, module);
            put_string(buf, name);
            put_payload(buf, payload);
        }
        WireMessage::Handshake { node, nonce } => {
            buf.put_u8(WireTag::Handshake as u8);
            buf.put_u128_le(node.as_raw());
            buf.put_u64_le(*nonce);
        }
        WireMessage::HandshakeAck { node, nonce } => {
            buf.put_u8(WireTag::HandshakeAck as u8);
            buf.put_u128_le(node.as_raw());
            buf.put_u64_le(*nonce);
        }
    }
}

pub fn decode(buf: &mut Bytes) -> io::Result<WireMessage> {
    let tag = WireTag::from_u8(buf.get_u8())?;
    Ok(match tag {
        WireTag::UserMessage => {
            let sender_node = NodeId::from_raw(buf.get_u128_le());
            let sender_id = ActorId::from_raw(buf.get_u64_le());
            let receiver_id = ActorId::from_raw(buf.get_u64_le());
            let request_id = RequestId::from_raw(buf.get_u64_le());
            let is_response = buf.get_u8() != 0;
            let payload = get_payload(buf)?;
            WireMessage::UserMessage {
                sender_node,
                sender_id,
                receiver_id,
                request_id,
                is_response,
                payload,
            }
        }
        WireTag::LookupRequest => WireMessage::LookupRequest,
        WireTag::LookupReply => {
            let present = buf.get_u8() != 0;
            let raw = buf.get_u64_le();
            WireMessage::LookupReply {
                actor_id: present.then(|| ActorId::from_raw(raw)),
            }
        }
        WireTag::MonitorRequest => WireMessage::MonitorRequest {
            actor_id: ActorId::from_raw(buf.get_u64_le()),
            observer_node: NodeId::from_raw(buf.get_u128_le()),
            observer_id: ActorId::from_raw(buf.get_u64_le()),
            release: buf.get_u8() != 0,
        },
        WireTag::DownNotification => WireMessage::DownNotification {
            actor_id: ActorId::from_raw(buf.get_u64_le()),
            reason: ExitReason::from_code(buf.get_u32_le()),
        },
        WireTag::GroupSubscribe => WireMessage::GroupSubscribe {
            module: get_string(buf)?,
            name: get_string(buf)?,
            subscriber_node: NodeId::from_raw(buf.get_u128_le()),
            subscriber_id: ActorId::from_raw(buf.get_u64_le()),
        },
        WireTag::GroupPublish => WireMessage::GroupPublish {
            module: get_string(buf)?,
            name: get_string(buf)?,
            payload: get_payload(buf)?,
        },
        WireTag::Handshake => WireMessage::Handshake {
            node: NodeId::from_raw(buf.get_u128_le()),
            nonce: buf.get_u64_le(),
        },
        WireTag::HandshakeAck => WireMessage::HandshakeAck {
            node: NodeId::from_raw(buf.get_u128_le()),
            nonce: buf.get_u64_le(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload;

    #[test]
    fn user_message_round_trips() {
        let original = WireMessage::UserMessage {
            sender_node: NodeId::generate(),
            sender_id: ActorId::next(),
            receiver_id: ActorId::next(),
            request_id: RequestId::from_raw(7),
            is_response: true,
            payload: payload![1i64, "hi", true],
        };

        let mut buf = BytesMut::new();
        encode(&original, &mut buf);
        let mut frozen = buf.freeze();
        let decoded = decode(&mut frozen).expect("decodes");

        match decoded {
            WireMessage::UserMessage {
                request_id,
                is_response,
                payload,
                ..
            } => {
                assert_eq!(request_id, RequestId::from_raw(7));
                assert!(is_response);
                assert_eq!(payload.arity(), 3);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn handshake_round_trips() {
        let original = WireMessage::Handshake {
            node: NodeId::generate(),
            nonce: 42,
        };
        let mut buf = BytesMut::new();
        encode(&original, &mut buf);
        let mut frozen = buf.freeze();
        match decode(&mut frozen).expect("decodes") {
            WireMessage::Handshake { nonce, .. } => assert_eq!(nonce, 42),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn lookup_reply_with_no_actor_round_trips() {
        let original = WireMessage::LookupReply { actor_id: None };
        let mut buf = BytesMut::new();
        encode(&original, &mut buf);
        let mut frozen = buf.freeze();
        match decode(&mut frozen).expect("decodes") {
            WireMessage::LookupReply { actor_id } => assert!(actor_id.is_none()),
            _ => panic!("wrong variant"),
        }
    }
}
