//! In-memory proxy pool with uniform random selection.

use crate::error::EmptyPool;
use crate::proxy::ProxyDescriptor;

use log::debug;
use rand::Rng;

/// An ordered set of proxy descriptors.
///
/// The pool is read-only once built; refreshing means building a new pool.
/// Duplicate descriptors are kept and each one is selectable on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyPool {
    proxies: Vec<ProxyDescriptor>,
}

impl ProxyPool {
    /// Create a pool from the given descriptors.
    pub fn new(proxies: Vec<ProxyDescriptor>) -> Self {
        Self { proxies }
    }

    /// Number of descriptors, duplicates included.
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// Whether selection would fail with [`EmptyPool`].
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Iterate over the descriptors in provider order.
    pub fn iter(&self) -> impl Iterator<Item = &ProxyDescriptor> {
        self.proxies.iter()
    }

    /// The descriptors as a slice.
    pub fn as_slice(&self) -> &[ProxyDescriptor] {
        &self.proxies
    }

    /// Pick one descriptor uniformly at random using the thread-local,
    /// OS-seeded generator.
    pub fn select(&self) -> Result<ProxyDescriptor, EmptyPool> {
        self.select_with(&mut rand::rng())
    }

    /// Pick one descriptor uniformly at random using the given generator.
    pub fn select_with<R: Rng>(&self, rng: &mut R) -> Result<ProxyDescriptor, EmptyPool> {
        if self.proxies.is_empty() {
            return Err(EmptyPool);
        }

        let idx = rng.random_range(0..self.proxies.len());
        let selected = &self.proxies[idx];
        debug!("Selected proxy {}:{} ({}/{})", selected.address, selected.port, idx + 1, self.proxies.len());

        Ok(selected.clone())
    }
}

impl From<Vec<ProxyDescriptor>> for ProxyPool {
    fn from(proxies: Vec<ProxyDescriptor>) -> Self {
        Self::new(proxies)
    }
}

impl FromIterator<ProxyDescriptor> for ProxyPool {
    fn from_iter<I: IntoIterator<Item = ProxyDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ProxyPool {
    type Item = &'a ProxyDescriptor;
    type IntoIter = std::slice::Iter<'a, ProxyDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.proxies.iter()
    }
}
