//! Object pool for falling objects
//!
//! Instances are preallocated and reused across lifetimes. Handles carry a
//! slot generation, so a handle kept past `release` no longer resolves.
//!
//! Capacity policy:
//! - `initial_capacity` inert instances are created up front
//! - at most `max_capacity` (2x initial) instances are ever pooled
//! - past that, `acquire` hands out transient instances that are dropped on
//!   release, so the free list never grows beyond `max_capacity`

use glam::Vec2;
use serde::Serialize;

use super::state::{ColorTag, FallingObject, ObjectId};
use crate::consts::MAX_POOL_INITIAL_CAPACITY;

/// Stable reference to one lifetime of a pooled instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    index: u32,
    generation: u32,
}

/// Pool occupancy counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PoolStats {
    /// Inert instances ready for reuse
    pub free: usize,
    /// Instances in flight (pooled + transient)
    pub active: usize,
    /// Active instances living outside the pool
    pub transient: usize,
    /// Pooled instances (free + pooled active)
    pub total_allocated: usize,
    pub max_capacity: usize,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    /// Counted in `total_allocated`
    pooled: bool,
    /// `None` once a transient instance has been dropped
    object: Option<FallingObject>,
}

impl Slot {
    fn is_active(&self) -> bool {
        self.object.as_ref().is_some_and(|o| o.active)
    }
}

/// Reusable store of falling objects
#[derive(Debug)]
pub struct ObjectPool {
    slots: Vec<Slot>,
    /// Inert pooled slots, reused LIFO
    free: Vec<u32>,
    /// In-flight slots in spawn order
    active: Vec<u32>,
    /// Slots whose transient instance was dropped
    vacant: Vec<u32>,
    total_allocated: usize,
    transient_active: usize,
    initial_capacity: usize,
    max_capacity: usize,
    next_id: u64,
}

impl ObjectPool {
    /// Create a pool seeded with `initial_capacity` inert instances
    ///
    /// Seed sizes above `MAX_POOL_INITIAL_CAPACITY` are capped.
    pub fn new(initial_capacity: usize) -> Self {
        if initial_capacity > MAX_POOL_INITIAL_CAPACITY {
            log::warn!(
                "Pool capacity {} capped to {}",
                initial_capacity,
                MAX_POOL_INITIAL_CAPACITY
            );
        }
        let initial_capacity = initial_capacity.min(MAX_POOL_INITIAL_CAPACITY);
        let max_capacity = initial_capacity.saturating_mul(2);
        let mut pool = Self {
            slots: Vec::with_capacity(max_capacity),
            free: Vec::with_capacity(max_capacity),
            active: Vec::with_capacity(max_capacity),
            vacant: Vec::new(),
            total_allocated: 0,
            transient_active: 0,
            initial_capacity,
            max_capacity,
            next_id: 1,
        };
        for _ in 0..initial_capacity {
            let index = pool.push_slot(true);
            pool.total_allocated += 1;
            pool.free.push(index);
        }
        pool
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Activate an instance with fresh identity and the given attributes
    ///
    /// Never fails: when the pool is exhausted a transient instance is
    /// allocated instead.
    pub fn acquire(
        &mut self,
        pos: Vec2,
        size: f32,
        speed: f32,
        color: ColorTag,
        now_ms: f64,
    ) -> ObjectHandle {
        let id = ObjectId(self.next_id);
        self.next_id += 1;

        let index = if let Some(index) = self.free.pop() {
            index
        } else if self.total_allocated < self.max_capacity {
            self.total_allocated += 1;
            self.push_slot(true)
        } else {
            self.transient_active += 1;
            log::warn!(
                "Object pool exhausted ({} pooled), allocating transient instance",
                self.max_capacity
            );
            match self.vacant.pop() {
                Some(index) => index,
                None => self.push_slot(false),
            }
        };

        let slot = &mut self.slots[index as usize];
        let object = FallingObject {
            id,
            pos,
            size,
            speed,
            color,
            active: true,
            created_at_ms: now_ms,
        };
        match slot.object.as_mut() {
            Some(existing) => *existing = object,
            None => slot.object = Some(object),
        }
        self.active.push(index);

        ObjectHandle {
            index,
            generation: slot.generation,
        }
    }

    /// Return an instance to the pool. No-op (returns false) if the handle is
    /// stale or the instance is already inactive.
    pub fn release(&mut self, handle: ObjectHandle) -> bool {
        if self.resolve(handle).is_none() {
            return false;
        }
        if let Some(pos) = self.active.iter().position(|&i| i == handle.index) {
            self.active.remove(pos);
        }
        self.recycle(handle.index);
        true
    }

    /// Release several instances; returns how many were actually released
    pub fn release_many(&mut self, handles: impl IntoIterator<Item = ObjectHandle>) -> usize {
        handles.into_iter().filter(|&h| self.release(h)).count()
    }

    /// Visit every active instance, releasing those for which `keep` returns
    /// false. Survivors keep their relative order. Returns the number released.
    ///
    /// `keep` may mutate the instance (the game loop advances positions here).
    pub fn filter_and_release<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&mut FallingObject) -> bool,
    {
        let mut active = std::mem::take(&mut self.active);
        let mut released = 0;
        active.retain(|&index| {
            let kept = self.slots[index as usize]
                .object
                .as_mut()
                .is_some_and(|object| keep(object));
            if !kept {
                self.recycle(index);
                released += 1;
            }
            kept
        });
        self.active = active;
        released
    }

    /// Return every active instance. Used when a run is torn down.
    pub fn release_all(&mut self) -> usize {
        let active = std::mem::take(&mut self.active);
        let released = active.len();
        for index in active {
            self.recycle(index);
        }
        released
    }

    /// Active instances in spawn order
    pub fn active_snapshot(&self) -> impl Iterator<Item = &FallingObject> {
        self.active
            .iter()
            .filter_map(|&index| self.slots[index as usize].object.as_ref())
    }

    /// Handles of active instances in spawn order
    pub fn active_handles(&self) -> impl Iterator<Item = ObjectHandle> {
        self.active.iter().map(|&index| ObjectHandle {
            index,
            generation: self.slots[index as usize].generation,
        })
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Look up an active instance; `None` for stale handles
    pub fn get(&self, handle: ObjectHandle) -> Option<&FallingObject> {
        self.resolve(handle)
    }

    pub fn get_mut(&mut self, handle: ObjectHandle) -> Option<&mut FallingObject> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.object.as_mut().filter(|o| o.active)
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            free: self.free.len(),
            active: self.active.len(),
            transient: self.transient_active,
            total_allocated: self.total_allocated,
            max_capacity: self.max_capacity,
        }
    }

    fn resolve(&self, handle: ObjectHandle) -> Option<&FallingObject> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation || !slot.is_active() {
            return None;
        }
        slot.object.as_ref()
    }

    fn push_slot(&mut self, pooled: bool) -> u32 {
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            pooled,
            object: Some(FallingObject::inert()),
        });
        index
    }

    /// Deactivate a slot already removed from `active`
    fn recycle(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        slot.generation = slot.generation.wrapping_add(1);

        if slot.pooled {
            if let Some(object) = slot.object.as_mut() {
                object.reset();
            }
            self.free.push(index);
        } else {
            self.transient_active -= 1;
            slot.object = None;
            self.vacant.push(index);
        }
    }
}

impl Default for ObjectPool {
    fn default() -> Self {
        Self::new(crate::consts::POOL_INITIAL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn spawn(pool: &mut ObjectPool, y: f32) -> ObjectHandle {
        pool.acquire(Vec2::new(10.0, y), 20.0, 5.0, ColorTag::default(), 0.0)
    }

    impl ObjectPool {
        /// Free list and active set partition the pooled slots
        fn assert_partition(&self) {
            let free: HashSet<u32> = self.free.iter().copied().collect();
            let active: HashSet<u32> = self.active.iter().copied().collect();
            assert_eq!(free.len(), self.free.len(), "duplicate in free list");
            assert_eq!(active.len(), self.active.len(), "duplicate in active set");
            assert!(free.is_disjoint(&active));

            let pooled_active = self
                .active
                .iter()
                .filter(|&&i| self.slots[i as usize].pooled)
                .count();
            assert_eq!(self.free.len() + pooled_active, self.total_allocated);
            assert!(self.total_allocated <= self.max_capacity);
            assert_eq!(self.active.len() - pooled_active, self.transient_active);

            for &i in &self.free {
                let object = self.slots[i as usize].object.as_ref().unwrap();
                assert!(!object.active);
                assert_eq!(object.id, ObjectId::NONE);
            }
            for &i in &self.active {
                assert!(self.slots[i as usize].is_active());
            }
        }
    }

    #[test]
    fn test_new_pool_is_seeded() {
        let pool = ObjectPool::new(150);
        let stats = pool.stats();
        assert_eq!(stats.free, 150);
        assert_eq!(stats.active, 0);
        assert_eq!(stats.total_allocated, 150);
        assert_eq!(stats.max_capacity, 300);
        pool.assert_partition();
    }

    #[test]
    fn test_oversized_capacity_is_capped() {
        let pool = ObjectPool::new(usize::MAX);
        assert_eq!(pool.initial_capacity(), MAX_POOL_INITIAL_CAPACITY);
        assert_eq!(pool.max_capacity(), MAX_POOL_INITIAL_CAPACITY * 2);
        assert_eq!(pool.stats().free, MAX_POOL_INITIAL_CAPACITY);
    }

    #[test]
    fn test_acquire_assigns_fresh_identity() {
        let mut pool = ObjectPool::new(4);
        let a = spawn(&mut pool, 0.0);
        let b = spawn(&mut pool, 0.0);
        let id_a = pool.get(a).unwrap().id;
        let id_b = pool.get(b).unwrap().id;
        assert_ne!(id_a, id_b);
        assert_ne!(id_a, ObjectId::NONE);

        pool.release(a);
        let c = spawn(&mut pool, 0.0);
        // Same storage reused, new identity
        assert_eq!(c.index, a.index);
        assert_ne!(pool.get(c).unwrap().id, id_a);
    }

    #[test]
    fn test_stale_handle_does_not_resolve() {
        let mut pool = ObjectPool::new(2);
        let a = spawn(&mut pool, 0.0);
        assert!(pool.release(a));
        let b = spawn(&mut pool, 0.0);
        assert_eq!(a.index, b.index);

        assert!(pool.get(a).is_none());
        // Releasing through the stale handle must not touch the new lifetime
        assert!(!pool.release(a));
        assert!(pool.get(b).is_some());
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut pool = ObjectPool::new(3);
        let a = spawn(&mut pool, 0.0);
        spawn(&mut pool, 1.0);
        assert!(pool.release(a));
        let before = pool.stats();
        assert!(!pool.release(a));
        assert_eq!(pool.stats(), before);
        pool.assert_partition();
    }

    #[test]
    fn test_overflow_to_transient() {
        let mut pool = ObjectPool::new(150);

        let handles: Vec<_> = (0..151).map(|i| spawn(&mut pool, i as f32)).collect();
        let stats = pool.stats();
        assert_eq!(stats.active, 151);
        assert_eq!(stats.transient, 0);
        assert_eq!(stats.total_allocated, 151);

        let more: Vec<_> = (151..301).map(|i| spawn(&mut pool, i as f32)).collect();
        let stats = pool.stats();
        assert_eq!(stats.active, 301);
        assert_eq!(stats.total_allocated, 300);
        assert_eq!(stats.transient, 1);
        pool.assert_partition();

        // Transient instances never join the free list
        let overflow = *more.last().unwrap();
        assert!(pool.release(overflow));
        let stats = pool.stats();
        assert_eq!(stats.transient, 0);
        assert_eq!(stats.total_allocated, 300);
        assert_eq!(stats.free, 0);
        pool.assert_partition();

        assert_eq!(pool.release_many(handles), 151);
        pool.assert_partition();
    }

    #[test]
    fn test_transient_slot_reused_after_drop() {
        let mut pool = ObjectPool::new(1);
        let a = spawn(&mut pool, 0.0);
        let b = spawn(&mut pool, 0.0);
        let transient = spawn(&mut pool, 0.0);
        assert_eq!(pool.stats().transient, 1);

        pool.release(a);
        pool.release(transient);
        assert_eq!(pool.stats().total_allocated, 2);
        assert_eq!(pool.stats().transient, 0);
        assert!(pool.get(b).is_some());
        pool.assert_partition();

        // Vacant slot is reused for the next overflow
        spawn(&mut pool, 0.0);
        let t2 = spawn(&mut pool, 0.0);
        assert_eq!(t2.index, transient.index);
        assert!(pool.get(transient).is_none());
        pool.assert_partition();
    }

    #[test]
    fn test_filter_and_release_preserves_order() {
        let mut pool = ObjectPool::new(8);
        for y in [0.0, 100.0, 10.0, 200.0, 20.0] {
            spawn(&mut pool, y);
        }

        let released = pool.filter_and_release(|o| {
            o.pos.y += 5.0;
            o.pos.y < 50.0
        });
        assert_eq!(released, 2);

        let ys: Vec<f32> = pool.active_snapshot().map(|o| o.pos.y).collect();
        assert_eq!(ys, vec![5.0, 15.0, 25.0]);
        pool.assert_partition();
    }

    #[test]
    fn test_release_all() {
        let mut pool = ObjectPool::new(2);
        for _ in 0..5 {
            spawn(&mut pool, 0.0);
        }
        assert_eq!(pool.release_all(), 5);
        let stats = pool.stats();
        assert_eq!(stats.active, 0);
        assert_eq!(stats.transient, 0);
        assert_eq!(stats.free, 4);
        assert_eq!(pool.active_snapshot().count(), 0);
        pool.assert_partition();
    }

    #[derive(Debug, Clone)]
    enum Op {
        Acquire,
        Release(usize),
        DropBelow(f32),
        ReleaseAll,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => Just(Op::Acquire),
            3 => any::<usize>().prop_map(Op::Release),
            1 => (0.0f32..100.0).prop_map(Op::DropBelow),
            1 => Just(Op::ReleaseAll),
        ]
    }

    proptest! {
        #[test]
        fn prop_partition_holds(ops in prop::collection::vec(op(), 1..200), cap in 1usize..8) {
            let mut pool = ObjectPool::new(cap);
            let mut handles: Vec<ObjectHandle> = Vec::new();
            let mut y = 0.0f32;

            for op in ops {
                match op {
                    Op::Acquire => {
                        y = (y + 7.0) % 100.0;
                        handles.push(spawn(&mut pool, y));
                    }
                    Op::Release(i) if !handles.is_empty() => {
                        let h = handles[i % handles.len()];
                        let was_active = pool.get(h).is_some();
                        let before = pool.stats();
                        prop_assert_eq!(pool.release(h), was_active);
                        if !was_active {
                            prop_assert_eq!(pool.stats(), before);
                        }
                    }
                    Op::Release(_) => {}
                    Op::DropBelow(limit) => {
                        pool.filter_and_release(|o| o.pos.y < limit);
                    }
                    Op::ReleaseAll => {
                        pool.release_all();
                    }
                }
                pool.assert_partition();
                let stats = pool.stats();
                prop_assert!(stats.free + stats.active - stats.transient <= stats.max_capacity);
            }
        }
    }
}
