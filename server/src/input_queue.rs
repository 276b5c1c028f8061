//! Double-buffered hand-off of input events from the network listener to the
//! simulation.
//!
//! Two fixed-capacity halves exist. The listener always appends to the active
//! half while the simulation, once per tick, flips which half is active and
//! drains the one it just retired. Each half sits behind its own lock and the
//! listener re-checks the active index after locking, so an event is either
//! seen by the drain that retires its half or lands in the new active half.
//! No event is drained twice and none is lost except on overflow.

use arena_shared::InputEvent;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct InputQueue {
    active: AtomicUsize,
    slots: [Mutex<Vec<InputEvent>>; 2],
    capacity: usize,
}

impl InputQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            active: AtomicUsize::new(0),
            slots: [
                Mutex::new(Vec::with_capacity(capacity)),
                Mutex::new(Vec::with_capacity(capacity)),
            ],
            capacity,
        }
    }

    /// Appends to the active half. Returns false and drops the event when that
    /// half is full.
    pub fn push(&self, event: InputEvent) -> bool {
        loop {
            let index = self.active.load(Ordering::Acquire);
            let mut slot = self.slots[index].lock();

            // Retired between the load and the lock; go to the new active half.
            if self.active.load(Ordering::Acquire) != index {
                continue;
            }

            if slot.len() >= self.capacity {
                return false;
            }
            slot.push(event);
            return true;
        }
    }

    /// Flips the active half and returns everything queued in the retired one,
    /// in arrival order. The retired half is left empty and becomes the write
    /// target on the next call.
    pub fn swap_and_drain(&self) -> Vec<InputEvent> {
        let retired = self.active.fetch_xor(1, Ordering::AcqRel);
        let mut slot = self.slots[retired].lock();
        slot.drain(..).collect()
    }

    pub fn active_index(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Events waiting in the active half.
    pub fn pending(&self) -> usize {
        self.slots[self.active_index()].lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn input(player_id: u8, aim_angle: f32) -> InputEvent {
        InputEvent {
            player_id,
            aim_angle,
            ..InputEvent::default()
        }
    }

    #[test]
    fn test_swap_flips_active_half() {
        let queue = InputQueue::new(4);
        assert_eq!(queue.active_index(), 0);

        queue.swap_and_drain();
        assert_eq!(queue.active_index(), 1);

        queue.swap_and_drain();
        assert_eq!(queue.active_index(), 0);
    }

    #[test]
    fn test_drain_preserves_arrival_order() {
        let queue = InputQueue::new(8);
        queue.push(input(0, 1.0));
        queue.push(input(1, 2.0));
        queue.push(input(0, 3.0));

        let drained = queue.swap_and_drain();
        let angles: Vec<f32> = drained.iter().map(|e| e.aim_angle).collect();
        assert_eq!(angles, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_events_are_drained_exactly_once() {
        let queue = InputQueue::new(8);
        queue.push(input(0, 1.0));

        assert_eq!(queue.swap_and_drain().len(), 1);
        assert!(queue.swap_and_drain().is_empty());
        assert!(queue.swap_and_drain().is_empty());
    }

    #[test]
    fn test_writes_after_swap_wait_for_next_drain() {
        let queue = InputQueue::new(8);
        queue.push(input(0, 1.0));
        let first = queue.swap_and_drain();

        queue.push(input(0, 2.0));
        assert_eq!(queue.pending(), 1);
        let second = queue.swap_and_drain();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].aim_angle, 2.0);
    }

    #[test]
    fn test_overflow_drops_event() {
        let queue = InputQueue::new(2);
        assert!(queue.push(input(0, 1.0)));
        assert!(queue.push(input(0, 2.0)));
        assert!(!queue.push(input(0, 3.0)));

        let drained = queue.swap_and_drain();
        assert_eq!(drained.len(), 2);

        // The drained half is empty again and accepts writes after the next swap.
        queue.swap_and_drain();
        assert!(queue.push(input(0, 4.0)));
    }

    #[test]
    fn test_concurrent_producer_loses_nothing() {
        let queue = Arc::new(InputQueue::new(100_000));
        let total = 20_000;

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..total {
                    assert!(queue.push(input(0, i as f32)));
                }
            })
        };

        let mut drained = Vec::new();
        while !producer.is_finished() {
            drained.extend(queue.swap_and_drain());
        }
        producer.join().unwrap();
        drained.extend(queue.swap_and_drain());
        drained.extend(queue.swap_and_drain());

        assert_eq!(drained.len(), total);
        for (i, event) in drained.iter().enumerate() {
            assert_eq!(event.aim_angle, i as f32);
        }
    }
}
