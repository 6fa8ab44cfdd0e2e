//! Process-wide roster of live agents.
//!
//! Agents are registered on spawn and unregistered on despawn. Between
//! ticks the host publishes each agent's position and strategic goal; during
//! a tick the arbiter only reads peers through [`AgentDirectory`]. Reads take
//! a shared lock, so agents may be ticked in parallel while lifecycle changes
//! stay serialized behind the write lock.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::RwLock;

use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::geometry::Vec2;
use crate::goals::StrategicKind;

/// Stable identifier of an agent within one process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u32);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// What other agents can see of a registered agent.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeerSnapshot {
    pub id: AgentId,
    pub position: Vec2,
    pub strategic: Option<StrategicKind>,
}

/// Read-only view of the other agents in the process.
pub trait AgentDirectory: Send + Sync {
    /// All registered agents except `exclude`, in id order.
    fn peers(&self, exclude: AgentId) -> Vec<PeerSnapshot>;

    /// Number of peers whose current strategic goal is `kind`.
    fn count_pursuing(&self, exclude: AgentId, kind: StrategicKind) -> usize {
        self.peers(exclude)
            .iter()
            .filter(|p| p.strategic == Some(kind))
            .count()
    }
}

/// RwLock-backed registry shared through an `Arc`.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    agents: RwLock<BTreeMap<AgentId, PeerSnapshot>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: AgentId, position: Vec2) -> Result<(), RegistryError> {
        let mut agents = self
            .agents
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;
        if agents.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        agents.insert(
            id,
            PeerSnapshot {
                id,
                position,
                strategic: None,
            },
        );
        debug!(target: "cognition::registry", agent = %id, "registered");
        Ok(())
    }

    pub fn unregister(&self, id: AgentId) -> Result<PeerSnapshot, RegistryError> {
        let mut agents = self
            .agents
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;
        let removed = agents.remove(&id).ok_or(RegistryError::NotRegistered(id))?;
        debug!(target: "cognition::registry", agent = %id, "unregistered");
        Ok(removed)
    }

    /// Updates the position and strategic goal other agents see.
    pub fn publish(
        &self,
        id: AgentId,
        position: Vec2,
        strategic: Option<StrategicKind>,
    ) -> Result<(), RegistryError> {
        let mut agents = self
            .agents
            .write()
            .map_err(|_| RegistryError::LockPoisoned)?;
        let entry = agents
            .get_mut(&id)
            .ok_or(RegistryError::NotRegistered(id))?;
        entry.position = position;
        entry.strategic = strategic;
        Ok(())
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents
            .read()
            .map(|agents| agents.contains_key(&id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.agents.read().map(|agents| agents.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AgentDirectory for AgentRegistry {
    fn peers(&self, exclude: AgentId) -> Vec<PeerSnapshot> {
        match self.agents.read() {
            Ok(agents) => agents
                .values()
                .filter(|p| p.id != exclude)
                .copied()
                .collect(),
            Err(_) => {
                warn!(target: "cognition::registry", "registry lock poisoned, reporting no peers");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_round_trip() {
        let registry = AgentRegistry::new();
        registry.register(AgentId(1), Vec2::ZERO).unwrap();
        registry.register(AgentId(2), Vec2::new(3.0, 0.0)).unwrap();

        assert_eq!(
            registry.register(AgentId(1), Vec2::ZERO),
            Err(RegistryError::AlreadyRegistered(AgentId(1)))
        );
        assert_eq!(registry.len(), 2);

        let peers = registry.peers(AgentId(1));
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].id, AgentId(2));

        registry.unregister(AgentId(2)).unwrap();
        assert!(registry.peers(AgentId(1)).is_empty());
        assert_eq!(
            registry.unregister(AgentId(2)),
            Err(RegistryError::NotRegistered(AgentId(2)))
        );
    }

    #[test]
    fn publish_updates_what_peers_see() {
        let registry = AgentRegistry::new();
        for id in 1..=3 {
            registry.register(AgentId(id), Vec2::ZERO).unwrap();
        }
        registry
            .publish(AgentId(2), Vec2::new(1.0, 1.0), Some(StrategicKind::Progression))
            .unwrap();
        registry
            .publish(AgentId(3), Vec2::new(2.0, 2.0), Some(StrategicKind::Progression))
            .unwrap();

        assert_eq!(
            registry.count_pursuing(AgentId(1), StrategicKind::Progression),
            2
        );
        assert_eq!(
            registry.count_pursuing(AgentId(2), StrategicKind::Progression),
            1
        );
        assert_eq!(
            registry.publish(AgentId(9), Vec2::ZERO, None),
            Err(RegistryError::NotRegistered(AgentId(9)))
        );
    }
}
