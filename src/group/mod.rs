//! Group multicast: a process-wide, named set of subscribers an actor can
//! publish to without addressing each member individually (spec.md §4.6).
//!
//! A group is identified by `(module, name)` and is created on first use —
//! there is no explicit "declare a group" step. Membership spans nodes: a
//! remote actor joins by having its node send [`crate::transport::wire::WireMessage::GroupSubscribe`]
//! over its connection to this node, which [`crate::transport::connection`]
//! turns into an ordinary [`handle_remote_subscribe`] call.

// Layer 1: Standard library imports
use std::sync::OnceLock;

// Layer 2: Third-party crate imports
use dashmap::{DashMap, DashSet};

// Layer 3: Internal module imports
use crate::actor::{ActorFlavor, ActorRef, Initializer};
use crate::payload::Payload;
use crate::scheduler::SpawnOptions;
use crate::util::NodeId;

/// Identifies one group; cheap to copy, compares by `(module, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupHandle {
    module: String,
    name: String,
}

impl GroupHandle {
    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

struct GroupRegistry {
    members: DashMap<GroupHandle, DashSet<ActorRef>>,
}

fn registry() -> &'static GroupRegistry {
    static REGISTRY: OnceLock<GroupRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| GroupRegistry {
        members: DashMap::new(),
    })
}

/// Resolve (and implicitly create) the group named `module:name`.
///
/// Idempotent: calling this twice with the same pair returns handles that
/// compare equal, matching spec.md §4.6's "groups come into existence on
/// first reference" wording.
pub fn get(module: impl Into<String>, name: impl Into<String>) -> GroupHandle {
    let handle = GroupHandle {
        module: module.into(),
        name: name.into(),
    };
    registry().members.entry(handle.clone()).or_default();
    handle
}

/// A group whose `module` names the network-backed delivery strategy
/// (spec.md §4.6: "`module` selects the delivery strategy ... `remote` =
/// network-backed multicast via a designated group server").
const REMOTE_MODULE: &str = "remote";

/// Add `actor` to `group`'s membership.
///
/// `actor` may be local or a [`ActorRef::Remote`] proxy — the latter is how
/// [`crate::transport::connection`] represents a subscriber that lives on
/// another node after receiving its `GroupSubscribe` frame. A *local*
/// subscriber joining a `remote`-module group additionally registers a
/// proxy subscriber on every connected peer (spec.md §4.6) — a remote
/// subscriber arriving via [`handle_remote_subscribe`] never re-triggers
/// this, since it is never local.
pub fn subscribe(group: &GroupHandle, actor: ActorRef) {
    if group.module() == REMOTE_MODULE && actor.is_local() {
        crate::transport::connection::broadcast_group_subscribe(&group.module, &group.name, &actor);
    }
    registry()
        .members
        .entry(group.clone())
        .or_default()
        .insert(actor);
    crate::monitoring::sink::emit_group(crate::monitoring::GroupEventKind::Subscribed {
        group: format!("{}:{}", group.module, group.name),
    });
}

pub fn unsubscribe(group: &GroupHandle, actor: &ActorRef) {
    if let Some(members) = registry().members.get(group) {
        members.remove(actor);
    }
    crate::monitoring::sink::emit_group(crate::monitoring::GroupEventKind::Unsubscribed {
        group: format!("{}:{}", group.module, group.name),
    });
}

/// Multicast `payload` to every current member of `group`, attributed to
/// `from` (typically the publishing actor's own [`ActorRef`], via
/// `ActorContext`).
///
/// Each member receives an ordinary message via [`crate::actor::send`]; a
/// remote member's [`crate::transport::proxy::ProxyActor`] translates that
/// into a `UserMessage` frame on its connection exactly as any other send
/// would (spec.md §4.6, §4.7). In addition, a `remote`-module group also
/// forwards the publish as a single `GroupPublish` frame to every connected
/// peer, so a node with no local member of this group (only subscribers
/// reachable through some other connection) still converges.
pub fn publish(group: &GroupHandle, from: ActorRef, payload: Payload) {
    publish_locally(group, from, payload.clone());
    if group.module() == REMOTE_MODULE {
        crate::transport::connection::broadcast_group_publish(&group.module, &group.name, &payload);
    }
}

/// The local-fan-out half of [`publish`], shared with
/// [`handle_remote_publish`] — which calls this directly rather than
/// [`publish`] itself, so a publish arriving over the wire fans out to this
/// node's members without being forwarded straight back out again.
fn publish_locally(group: &GroupHandle, from: ActorRef, payload: Payload) {
    let Some(members) = registry().members.get(group) else {
        return;
    };
    let mut member_count = 0usize;
    for member in members.iter() {
        crate::actor::send(from.clone(), &member, payload.clone());
        member_count += 1;
    }
    crate::monitoring::sink::emit_group(crate::monitoring::GroupEventKind::Published {
        group: format!("{}:{}", group.module, group.name),
        member_count,
    });
}

/// Spawn a new actor already a member of `group` (spec.md §4.6).
///
/// `opts.hidden` excludes it from the group's membership while still
/// spawning it normally — the scheduler itself never looks at `hidden`
/// (see the doc comment on [`SpawnOptions::hidden`]), only this function
/// does.
pub fn spawn_in_group(
    group: &GroupHandle,
    flavor: ActorFlavor,
    init: Initializer,
    opts: SpawnOptions,
) -> ActorRef {
    let actor = crate::scheduler::spawn(flavor, init, opts);
    if !opts.hidden {
        subscribe(group, actor.clone());
    }
    actor
}

/// Remove `actor` from every group it belongs to.
///
/// Called by [`crate::scheduler::finalize_exit`] so an exited actor never
/// lingers as a stale member (spec.md §4.4, §4.6).
pub(crate) fn unsubscribe_all(actor: &ActorRef) {
    for members in registry().members.iter() {
        members.remove(actor);
    }
}

/// A remote node asked to subscribe `subscriber` to `module:name` (spec.md
/// §6's `GroupSubscribe` frame, handled by
/// [`crate::transport::connection::Connection`]).
pub(crate) fn handle_remote_subscribe(module: &str, name: &str, subscriber: ActorRef) {
    let handle = get(module.to_owned(), name.to_owned());
    subscribe(&handle, subscriber);
}

/// A remote node published to `module:name` directly (spec.md §6's
/// `GroupPublish` frame) — fan it out to this node's own local members too,
/// so every node's view of the group converges.
pub(crate) fn handle_remote_publish(module: &str, name: &str, payload: Payload) {
    let handle = get(module.to_owned(), name.to_owned());
    publish_locally(&handle, crate::scheduler::system_sender(), payload);
}

/// The node fingerprint group membership is reported under when a local
/// actor subscribes to a group published elsewhere (unused until a remote
/// `GroupSubscribe` round trip is initiated from this side; kept here
/// rather than in `transport` since it is group identity, not connection
/// state).
pub fn local_node() -> NodeId {
    crate::scheduler::local_node()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload;

    #[test]
    fn get_is_idempotent() {
        let a = get("chat", "lobby");
        let b = get("chat", "lobby");
        assert_eq!(a, b);
    }

    #[test]
    fn subscribe_then_unsubscribe_removes_membership() {
        let group = get("chat", "room1");
        let member = crate::scheduler::test_support::local_ref_for_test();
        subscribe(&group, member.clone());
        unsubscribe(&group, &member);
        // No direct membership accessor is exposed; publish should not
        // panic and simply has nothing to deliver to.
        publish(&group, member.clone(), payload![1i64]);
    }

    #[test]
    fn exiting_actor_is_removed_from_every_group() {
        let group = get("chat", "room2");
        let member = crate::scheduler::test_support::local_ref_for_test();
        subscribe(&group, member.clone());
        unsubscribe_all(&member);
        unsubscribe(&group, &member); // idempotent no-op, already gone
    }

    /// spec.md §4.6: a local subscriber joining a `remote`-module group
    /// broadcasts a `GroupSubscribe` frame to every connected peer. With no
    /// peers connected there is nothing to broadcast to, but the attempt
    /// must not panic, and local membership still takes effect.
    #[test]
    fn remote_module_subscribe_is_local_no_op_safe_without_peers() {
        let group = get("remote", "announcements");
        let member = crate::scheduler::test_support::local_ref_for_test();
        subscribe(&group, member.clone());
        publish(&group, member.clone(), payload![1i64]);
        unsubscribe(&group, &member);
    }

}
