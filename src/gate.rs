//! A counting semaphore that bounds how many frame jobs are in flight.
//!
//! Slots are handed out as `Permit`s and returned when the permit is
//! dropped, so a frame job that fails or panics still gives its slot
//! back.

use crate::errors::{Error, Result};
use log::debug;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct Slots {
    available: usize,
    in_use: usize,
    peak: usize,
}

/// Bounds the number of simultaneously admitted frame jobs.
#[derive(Debug)]
pub struct AdmissionGate {
    limit: usize,
    slots: Mutex<Slots>,
    freed: Condvar,
}

impl AdmissionGate {
    /// A gate admitting at most `limit` holders at once.
    pub fn new(limit: usize) -> Result<AdmissionGate> {
        if limit == 0 {
            return Err(Error::Resource(
                "an admission gate needs at least one slot".to_string(),
            ));
        }
        Ok(AdmissionGate {
            limit,
            slots: Mutex::new(Slots {
                available: limit,
                in_use: 0,
                peak: 0,
            }),
            freed: Condvar::new(),
        })
    }

    // A holder that panicked while the lock was held cannot leave the
    // counters half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until a slot is free and takes it.
    pub fn acquire(&self) -> Permit<'_> {
        let mut slots = self.lock();
        while slots.available == 0 {
            slots = self
                .freed
                .wait(slots)
                .unwrap_or_else(PoisonError::into_inner);
        }
        self.take(&mut slots)
    }

    /// Takes a slot if one is free right now.
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        let mut slots = self.lock();
        if slots.available == 0 {
            None
        } else {
            Some(self.take(&mut slots))
        }
    }

    fn take(&self, slots: &mut Slots) -> Permit<'_> {
        slots.available -= 1;
        slots.in_use += 1;
        slots.peak = slots.peak.max(slots.in_use);
        debug!("admitted, {} of {} slots in use", slots.in_use, self.limit);
        Permit { gate: self }
    }

    fn release(&self) {
        let mut slots = self.lock();
        slots.available += 1;
        slots.in_use -= 1;
        debug!("released, {} of {} slots in use", slots.in_use, self.limit);
        self.freed.notify_one();
    }

    /// The configured number of slots.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Slots free right now.
    pub fn available(&self) -> usize {
        self.lock().available
    }

    /// Permits currently held.
    pub fn in_use(&self) -> usize {
        self.lock().in_use
    }

    /// The most permits ever held at the same time.
    pub fn peak(&self) -> usize {
        self.lock().peak
    }
}

/// A held slot.  Dropping it returns the slot and wakes one waiter.
#[derive(Debug)]
pub struct Permit<'a> {
    gate: &'a AdmissionGate,
}

impl<'a> Drop for Permit<'a> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
