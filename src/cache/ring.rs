//! Hash Ring Module
//!
//! Consistent-hash routing of keys to owning peers.

use std::collections::BTreeMap;

// == Hash Ring ==
/// Consistent-hash ring over the static peer set.
///
/// Each peer is placed at `replicas` virtual positions, hashed from the
/// replica index concatenated with the peer address. Ownership of a key is
/// the peer at the first ring position at or after the key's hash, wrapping
/// around. crc32 keeps positions identical across peer processes; a seeded
/// hasher would make peers disagree about ownership.
#[derive(Debug, Clone)]
pub struct HashRing {
    /// Ring position -> peer address
    positions: BTreeMap<u32, String>,
    /// Virtual replicas per peer
    replicas: usize,
}

impl HashRing {
    /// Builds a ring from the peer set with `replicas` virtual nodes each.
    pub fn new(peers: &[String], replicas: usize) -> Self {
        let mut positions = BTreeMap::new();
        for peer in peers {
            for i in 0..replicas {
                let position = crc32fast::hash(format!("{}{}", i, peer).as_bytes());
                positions.insert(position, peer.clone());
            }
        }
        Self { positions, replicas }
    }

    // == Owner ==
    /// Returns the peer that owns `key`, or None for an empty ring.
    ///
    /// Deterministic: the same peer set and replica count always yield the
    /// same owner for every key.
    pub fn owner(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }
        let hash = crc32fast::hash(key.as_bytes());
        self.positions
            .range(hash..)
            .next()
            .or_else(|| self.positions.iter().next())
            .map(|(_, peer)| peer.as_str())
    }

    /// Number of virtual replicas per peer.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Number of ring positions (can be below peers * replicas on hash
    /// collisions).
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
