//! How a freshly spawned actor is wired to whoever spawned it.

/// Options controlling a `spawn` call's relationship to its caller (spec.md
/// §4.4).
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnOptions {
    /// The spawning actor becomes a monitor of the new one: it receives a
    /// `DOWN` message when the child exits.
    pub monitored: bool,
    /// The spawning actor and the new one are bidirectionally linked: either
    /// exiting abnormally kills the other.
    pub linked: bool,
    /// Ignore `monitored`/`linked` regardless of their value — the new actor
    /// starts with no relationship to its spawner at all.
    pub detached: bool,
    /// Exclude the new actor from whatever local group it would otherwise be
    /// visible in (consulted by `crate::group::spawn_in_group`, not by the
    /// scheduler itself).
    pub hidden: bool,
}

impl SpawnOptions {
    pub fn monitored() -> Self {
        Self {
            monitored: true,
            ..Self::default()
        }
    }

    pub fn linked() -> Self {
        Self {
            linked: true,
            ..Self::default()
        }
    }

    pub fn detached() -> Self {
        Self {
            detached: true,
            ..Self::default()
        }
    }
}
