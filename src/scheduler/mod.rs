//! Owns an actor's lifetime from `spawn` through exit propagation (spec.md
//! §4.4, §4.8, §5).
//!
//! This module is the one piece of process-wide state that ties the rest of
//! the crate together: [`registry`] holds every locally scheduled actor,
//! [`blocking`] and [`dispatch`] drive the two execution flavors, and the
//! functions here wire a freshly built [`ActorCell`] into both, then tear it
//! back down again once it exits.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

// Layer 2: Third-party crate imports
use tokio::sync::{mpsc, Semaphore};

// Layer 3: Internal module imports
use crate::actor::{ActorCell, ActorContext, ActorFlavor, ActorRef, ActorWorkerState, ExitReason, Initializer};
use crate::atom::intern;
use crate::payload::Payload;
use crate::pattern::MatchExpression;
use crate::util::{ActorId, NodeId, RequestId};

pub mod blocking;
pub mod dispatch;
pub mod options;
pub mod registry;

pub use options::SpawnOptions;
use registry::ActorSlot;

#[cfg(test)]
pub(crate) mod test_support;

/// This process's node fingerprint, chosen once at first use (spec.md §3,
/// §5).
pub fn local_node() -> NodeId {
    static NODE: OnceLock<NodeId> = OnceLock::new();
    *NODE.get_or_init(|| {
        crate::monitoring::sink::emit_system(crate::monitoring::SystemEventKind::Started);
        NodeId::generate()
    })
}

/// A never-scheduled, never-exited actor standing in for "the runtime
/// itself" as an [`Envelope`](crate::message::Envelope) sender.
///
/// A handful of deliveries this crate originates have no actor to
/// attribute them to: a group broadcast replayed from a remote
/// `GroupPublish` frame carries no publisher identity on the wire, and a
/// `DOWN(connection_lost)` synthesized when a socket drops has no live
/// cell behind it either. Rather than make `Envelope::sender` an
/// `Option`, both use this one process-wide pseudo-actor, mirroring how a
/// BEAM node attributes system-originated messages to a reserved sender
/// rather than no sender at all.
pub(crate) fn system_sender() -> ActorRef {
    static SENDER: OnceLock<ActorRef> = OnceLock::new();
    SENDER
        .get_or_init(|| {
            let cell = Arc::new(ActorCell::new(ActorId::next(), local_node(), ActorFlavor::EventBased));
            ActorRef::Local(cell)
        })
        .clone()
}

static SHUTTING_DOWN: AtomicBool = AtomicBool::new(false);

/// Spawn a new, unattached actor (spec.md §4.4's `spawn(init, flavor, opts)`).
///
/// Equivalent to calling [`spawn_linked`] with no parent — `opts.monitored`/
/// `opts.linked` are meaningless without one, so there is nothing for them
/// to wire up.
pub fn spawn(flavor: ActorFlavor, init: Initializer, opts: SpawnOptions) -> ActorRef {
    spawn_linked(flavor, init, opts, None)
}

/// Spawn a new actor, optionally wiring it to `parent` per `opts` (the
/// engine behind both [`spawn`] and [`crate::actor::ActorContext::spawn`]).
pub fn spawn_linked(
    flavor: ActorFlavor,
    init: Initializer,
    opts: SpawnOptions,
    parent: Option<ActorRef>,
) -> ActorRef {
    if SHUTTING_DOWN.load(Ordering::Acquire) {
        // Refusing new spawns past `shutdown()` (spec.md §4.4): the caller
        // gets back an actor that is already exited rather than a panic or
        // a `Result` the rest of this API doesn't otherwise ask callers to
        // handle.
        let cell = Arc::new(ActorCell::new(ActorId::next(), local_node(), flavor));
        cell.set_exit_reason(ExitReason::Normal);
        return ActorRef::Local(cell);
    }

    // `detached` forces blocking flavor regardless of what the caller asked
    // for (spec.md §4.4): a detached actor answers to nobody, and an
    // event-based actor that never links back to a parent still competes
    // for the shared worker pool, which isn't what "detached" is for.
    let flavor = if opts.detached {
        ActorFlavor::Blocking
    } else {
        flavor
    };

    let cell = Arc::new(ActorCell::new(ActorId::next(), local_node(), flavor));
    let actor_ref = ActorRef::Local(Arc::clone(&cell));

    if let Some(parent) = &parent {
        if !opts.detached {
            if opts.monitored {
                actor_ref.add_monitor(parent.clone());
            }
            if opts.linked {
                actor_ref.add_link(parent.clone());
                parent.add_link(actor_ref.clone());
            }
        }
    }

    match flavor {
        ActorFlavor::EventBased => {
            let slot = Arc::new(ActorSlot::schedulable(
                Arc::clone(&cell),
                ActorWorkerState::new(MatchExpression::empty()),
            ));
            registry::insert(cell.id(), slot);
            run_initializer_then_enqueue(Arc::clone(&cell), init);
        }
        ActorFlavor::Blocking => {
            let slot = Arc::new(ActorSlot::unschedulable(Arc::clone(&cell)));
            registry::insert(cell.id(), slot);
            blocking::spawn(cell, init);
        }
    }

    crate::monitoring::sink::emit_actor(cell.id(), crate::monitoring::ActorEventKind::Spawned);
    crate::monitoring::sink::emit_system(crate::monitoring::SystemEventKind::ActorRegistered {
        actor_id: cell.id(),
    });

    actor_ref
}

/// Run an event-based actor's initializer inline on the spawning thread,
/// then fold it into the dispatcher exactly like any other quantum.
///
/// The initializer itself never blocks (it only installs a behavior via
/// `become_`), so running it eagerly rather than queuing it as the actor's
/// first "message" keeps `spawn` synchronous: by the time it returns, the
/// actor already has a behavior installed and can receive mail.
fn run_initializer_then_enqueue(cell: Arc<ActorCell>, init: Initializer) {
    let Some(slot) = registry::lookup(cell.id()) else {
        return;
    };
    let mut guard = slot.worker.lock();
    let Some(worker) = guard.as_mut() else {
        return;
    };

    let _exec = cell.enter_execution();
    let outcome = {
        let mut ctx = crate::actor::ActorContext::for_init(Arc::clone(&cell), worker);
        init(&mut ctx);
        ctx.finish()
    };
    drop(_exec);

    if let Some(replayed) = outcome.replay {
        for envelope in replayed {
            worker.replay_queue.push_back(envelope);
        }
    }
    let runnable = !worker.replay_queue.is_empty() || !cell.mailbox().is_empty();
    if !runnable && outcome.quit.is_none() {
        maybe_arm_timeout(&cell, worker);
    }
    drop(guard);

    if let Some(reason) = outcome.quit {
        finalize_exit(&cell, reason);
    } else if runnable {
        notify_runnable(ActorRef::Local(cell));
    }
}

// --- Event-based dispatch: a shared worker pool bounded by a semaphore ---
//
// Every event-based actor that becomes runnable has its id pushed onto
// `runnable_tx()`. A single dispatcher task drains that channel and, for
// each id, acquires a permit from `WORKER_PERMITS` before `tokio::spawn`ing
// a task that runs exactly one quantum (spec.md §4.4's "one message per
// actor per quantum"). Bounding permits rather than bounding the channel
// itself is what makes this a worker *pool*: at most `worker_count` quanta
// run concurrently, regardless of how many actors are runnable at once.

struct Dispatcher {
    runnable_tx: mpsc::UnboundedSender<ActorId>,
    permits: Arc<Semaphore>,
}

static DISPATCHER: OnceLock<Dispatcher> = OnceLock::new();

fn dispatcher() -> &'static Dispatcher {
    DISPATCHER.get_or_init(|| {
        let (tx, rx) = mpsc::unbounded_channel();
        let permits = Arc::new(Semaphore::new(worker_count()));
        tokio::spawn(dispatch_loop(rx, Arc::clone(&permits)));
        Dispatcher {
            runnable_tx: tx,
            permits,
        }
    })
}

/// Worker pool size: one worker per CPU, matching spec.md §4.4's "N
/// defaults to CPU count".
fn worker_count() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

async fn dispatch_loop(mut rx: mpsc::UnboundedReceiver<ActorId>, permits: Arc<Semaphore>) {
    while let Some(id) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            return;
        };
        tokio::spawn(async move {
            run_one_quantum(id);
            drop(permit);
        });
    }
}

/// Mark `actor_ref` runnable, scheduling it onto the shared worker pool if
/// it is event-based. Blocking-flavor actors drive their own thread and
/// never pass through here except as a `Mailbox::enqueue` no-op target.
pub(crate) fn notify_runnable(actor_ref: ActorRef) {
    let ActorRef::Local(cell) = &actor_ref else {
        return;
    };
    if cell.flavor().is_blocking() {
        return;
    }
    let _ = dispatcher().runnable_tx.send(cell.id());
}

fn run_one_quantum(id: ActorId) {
    let Some(slot) = registry::lookup(id) else {
        return;
    };
    let mut guard = slot.worker.lock();
    let Some(worker) = guard.as_mut() else {
        return;
    };

    let _exec = slot.cell.enter_execution();
    let result = dispatch::run_quantum(&slot.cell, worker);
    drop(_exec);

    let (quit, still_runnable) = match result {
        dispatch::QuantumResult::Idle => (None, false),
        dispatch::QuantumResult::Processed(outcome) => {
            if let Some(replayed) = outcome.replay {
                for envelope in replayed {
                    worker.replay_queue.push_back(envelope);
                }
            }
            let runnable = !worker.replay_queue.is_empty() || !slot.cell.mailbox().is_empty();
            (outcome.quit, runnable)
        }
    };
    if !still_runnable && quit.is_none() {
        maybe_arm_timeout(&slot.cell, worker);
    }
    drop(guard);

    if let Some(reason) = quit {
        finalize_exit(&slot.cell, reason);
    } else if still_runnable {
        notify_runnable(ActorRef::Local(slot.cell));
    }
}

/// Tear an actor down once it has decided to quit: set its exit reason,
/// notify monitors with `DOWN(actor_id, reason)`, propagate the exit to
/// linked peers if abnormal, and drop it from the registry (spec.md §4.3,
/// §8 properties 3 and 4).
///
/// A no-op if `cell` had already exited — `ActorCell::set_exit_reason` is
/// the single point enforcing exit-once, so every caller (both scheduler
/// flavors, plus link-propagated kills) can call this unconditionally.
pub(crate) fn finalize_exit(cell: &Arc<ActorCell>, reason: ExitReason) {
    if !cell.set_exit_reason(reason) {
        return;
    }

    let id = cell.id();
    let down = down_payload(id, reason);
    for monitor in cell.monitors().iter() {
        monitor.enqueue_foreign(crate::message::Envelope::message(
            ActorRef::Local(Arc::clone(cell)),
            monitor.clone(),
            down.clone(),
        ));
    }
    cell.monitors().clear();

    if reason.is_abnormal() {
        for peer in cell.links().iter() {
            kill_peer(&peer, reason);
        }
    }
    cell.links().clear();

    crate::group::unsubscribe_all(&ActorRef::Local(Arc::clone(cell)));
    registry::remove(id);

    crate::monitoring::sink::emit_actor(
        id,
        crate::monitoring::ActorEventKind::Stopped {
            reason_code: reason.code(),
        },
    );
    crate::monitoring::sink::emit_system(crate::monitoring::SystemEventKind::ActorDeregistered {
        actor_id: id,
    });
}

/// The `DOWN(actor_id, reason)` notification payload (spec.md §4.3, §6,
/// GLOSSARY). Tagged with the `down` atom so a receiving behavior can
/// pattern-match on it like any other message.
pub(crate) fn down_payload(id: ActorId, reason: ExitReason) -> Payload {
    crate::payload![intern("down"), id.as_raw(), intern(&reason.to_string())]
}

/// Kill a linked peer with `reason` (spec.md §4.3's link propagation,
/// §8 property 4). A remote peer is told over its connection; a local one
/// is finalized exactly as if it had called `quit(reason)` itself.
pub(crate) fn kill_peer(peer: &ActorRef, reason: ExitReason) {
    match peer {
        ActorRef::Local(peer_cell) => finalize_exit(peer_cell, reason),
        ActorRef::Remote(proxy) => proxy.kill(peer.clone(), reason),
    }
}

// --- Timeout clauses: a sleeping task per armed deadline, not a timer wheel ---
//
// An event-based behavior's own `Timeout` clause (spec.md §4.1) and a
// `sync_send` continuation's `Timeout` clause (spec.md §4.5 step 5) both
// describe a deadline attached to something an actor installed, not an
// ordinary message. Both are driven the same way: a `tokio::time::sleep`
// task spawned at the moment the actor settles into the state the deadline
// belongs to, which re-checks that state is still current before acting.

/// Arm `worker.current_behavior`'s `Timeout` clause, if it has one, now that
/// a quantum has left `cell` idle (replay queue and mailbox both empty).
///
/// The armed task carries `worker.behavior_epoch` forward; `become_behavior`
/// bumps that counter and clears `timeout_armed` on every call, so a `become`
/// between now and the deadline makes this arming inert without needing to
/// cancel the sleeping task directly.
fn maybe_arm_timeout(cell: &Arc<ActorCell>, worker: &mut ActorWorkerState) {
    let Some(duration) = worker.current_behavior.timeout() else {
        worker.timeout_armed = false;
        return;
    };
    worker.timeout_armed = true;
    let id = cell.id();
    let epoch = worker.behavior_epoch;
    tokio::spawn(async move {
        tokio::time::sleep(duration).await;
        fire_behavior_timeout(id, epoch);
    });
}

/// Run `id`'s behavior timeout handler if `epoch` still names its installed
/// behavior and no later arming has already claimed this deadline.
fn fire_behavior_timeout(id: ActorId, epoch: u64) {
    let Some(slot) = registry::lookup(id) else {
        return;
    };
    if slot.cell.is_exited() {
        return;
    }

    let mut guard = slot.worker.lock();
    let Some(worker) = guard.as_mut() else {
        return;
    };
    if worker.behavior_epoch != epoch || !worker.timeout_armed {
        return;
    }
    worker.timeout_armed = false;
    let Some(handler) = worker.current_behavior.timeout_handler() else {
        return;
    };

    let _exec = slot.cell.enter_execution();
    let outcome = {
        let mut ctx = ActorContext::for_timeout(Arc::clone(&slot.cell), worker);
        handler(&mut ctx, &[]);
        ctx.finish()
    };
    drop(_exec);

    if let Some(replayed) = outcome.replay {
        for envelope in replayed {
            worker.replay_queue.push_back(envelope);
        }
    }
    let runnable = !worker.replay_queue.is_empty() || !slot.cell.mailbox().is_empty();
    if !runnable && outcome.quit.is_none() {
        // Still idle afterward (whether on the same behavior, repeating its
        // own deadline, or a freshly `become`'d one): re-arm.
        maybe_arm_timeout(&slot.cell, worker);
    }
    drop(guard);

    if let Some(reason) = outcome.quit {
        finalize_exit(&slot.cell, reason);
    } else if runnable {
        notify_runnable(ActorRef::Local(slot.cell));
    }
}

/// Arm a `sync_send` continuation's own `Timeout` clause (spec.md §4.5 step
/// 5), independent of the issuing actor's installed behavior timeout.
pub(crate) fn schedule_sync_timeout(actor_id: ActorId, request_id: RequestId, duration: std::time::Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(duration).await;
        fire_sync_timeout(actor_id, request_id);
    });
}

/// Run the timeout handler for `request_id` if its continuation is still
/// pending (no response arrived first, and nothing has already expired it).
fn fire_sync_timeout(actor_id: ActorId, request_id: RequestId) {
    let Some(slot) = registry::lookup(actor_id) else {
        return;
    };
    if slot.cell.is_exited() {
        return;
    }

    let mut guard = slot.worker.lock();
    let Some(worker) = guard.as_mut() else {
        return;
    };
    if !worker.pending_sync.contains(request_id) {
        return;
    }
    let Some(expression) = worker.pending_sync.take(request_id) else {
        return;
    };
    let Some(handler) = expression.timeout_handler() else {
        return;
    };

    crate::monitoring::sink::emit_sync(
        actor_id,
        crate::monitoring::SyncEventKind::TimedOut {
            request_id: request_id.as_raw(),
        },
    );

    let _exec = slot.cell.enter_execution();
    let outcome = {
        let mut ctx = ActorContext::for_timeout(Arc::clone(&slot.cell), worker);
        handler(&mut ctx, &[]);
        ctx.finish()
    };
    drop(_exec);

    if let Some(replayed) = outcome.replay {
        for envelope in replayed {
            worker.replay_queue.push_back(envelope);
        }
    }
    let runnable = !worker.replay_queue.is_empty() || !slot.cell.mailbox().is_empty();
    if !runnable && outcome.quit.is_none() {
        maybe_arm_timeout(&slot.cell, worker);
    }
    drop(guard);

    if let Some(reason) = outcome.quit {
        finalize_exit(&slot.cell, reason);
    } else if runnable {
        notify_runnable(ActorRef::Local(slot.cell));
    }
}

/// Block the caller until every locally registered actor other than
/// `excluding` has exited (spec.md §4.4).
///
/// Actors spawned with `SpawnOptions::hidden` are still tracked here — only
/// [`crate::group`] consults `hidden`, as the doc comment on
/// [`SpawnOptions::hidden`] notes — so this matches spec.md §4.4's literal
/// wording rather than silently excluding them.
pub async fn await_all_others_done(excluding: ActorId) {
    loop {
        if registry::alive_count_excluding(excluding) == 0 {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}

/// Refuse further spawns and wait for every currently-registered actor to
/// exit (spec.md §4.4's `shutdown()`).
///
/// Blocking-flavor actors each own a dedicated OS thread with no `JoinHandle`
/// retained anywhere (`blocking::spawn` intentionally drops it — see that
/// module's comment); this polls the shared registry instead of joining
/// threads directly; a thread's slot only disappears from the registry once
/// its `finalize_exit` call has actually run, so the two are equivalent from
/// a caller's point of view.
pub async fn shutdown() {
    SHUTTING_DOWN.store(true, Ordering::Release);
    crate::monitoring::sink::emit_system(crate::monitoring::SystemEventKind::ShuttingDown);
    loop {
        if registry::alive_count() == 0 {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{MatchExpression, Pattern};
    use std::time::Duration;

    fn quits_on_timeout(duration: Duration) -> Initializer {
        Box::new(move |ctx: &mut ActorContext<'_>| {
            let expr = MatchExpression::builder()
                .after(
                    duration,
                    Arc::new(|ctx: &mut ActorContext<'_>, _bindings: &[_]| {
                        ctx.quit(ExitReason::UserDefined);
                    }),
                )
                .build();
            ctx.become_(expr);
        })
    }

    #[tokio::test]
    async fn behavior_timeout_quits_an_idle_actor() {
        let actor_ref = spawn(
            ActorFlavor::EventBased,
            quits_on_timeout(Duration::from_millis(20)),
            SpawnOptions::default(),
        );
        tokio::time::sleep(Duration::from_millis(200)).await;

        let ActorRef::Local(cell) = &actor_ref else {
            panic!("expected a local actor");
        };
        assert_eq!(cell.exit_reason(), Some(ExitReason::UserDefined));
    }

    #[tokio::test]
    async fn a_matching_message_before_the_deadline_preempts_the_timeout() {
        let init: Initializer = Box::new(|ctx: &mut ActorContext<'_>| {
            let expr = MatchExpression::builder()
                .case(
                    Pattern::any(0),
                    Arc::new(|ctx: &mut ActorContext<'_>, _bindings: &[_]| {
                        ctx.quit(ExitReason::Normal);
                    }),
                )
                .after(
                    Duration::from_millis(300),
                    Arc::new(|ctx: &mut ActorContext<'_>, _bindings: &[_]| {
                        ctx.quit(ExitReason::UserDefined);
                    }),
                )
                .build();
            ctx.become_(expr);
        });
        let actor_ref = spawn(ActorFlavor::EventBased, init, SpawnOptions::default());

        crate::actor::reference::send(system_sender(), &actor_ref, crate::payload![]);
        tokio::time::sleep(Duration::from_millis(80)).await;

        let ActorRef::Local(cell) = &actor_ref else {
            panic!("expected a local actor");
        };
        assert_eq!(cell.exit_reason(), Some(ExitReason::Normal));
    }

    #[tokio::test]
    async fn sync_send_timeout_fires_when_no_reply_arrives() {
        let init: Initializer = Box::new(|ctx: &mut ActorContext<'_>| {
            let target = ctx.self_ref();
            ctx.sync_send(&target, crate::payload![]).after(
                Duration::from_millis(20),
                Arc::new(|ctx: &mut ActorContext<'_>, _bindings: &[_]| {
                    ctx.quit(ExitReason::SyncTimeout);
                }),
            );
            let expr = MatchExpression::empty();
            ctx.become_(expr);
        });
        let actor_ref = spawn(ActorFlavor::EventBased, init, SpawnOptions::default());
        tokio::time::sleep(Duration::from_millis(150)).await;

        let ActorRef::Local(cell) = &actor_ref else {
            panic!("expected a local actor");
        };
        assert_eq!(cell.exit_reason(), Some(ExitReason::SyncTimeout));
    }
}
