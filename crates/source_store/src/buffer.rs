//! Per-source record ring with FIFO eviction.
//!
//! Strict FIFO: once capacity is reached the oldest record is evicted for
//! each new one. No weighting, no sampling-down.

use std::fmt;

use contracts::Record;
use ringbuf::{traits::*, HeapRb};

/// Bounded history of accepted records for one source.
pub struct RecordBuffer {
    ring: HeapRb<Record>,
    capacity: usize,
    evicted_count: u64,
    out_of_order_count: u64,
    last_ts: Option<i64>,
}

impl fmt::Debug for RecordBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordBuffer")
            .field("len", &self.ring.occupied_len())
            .field("capacity", &self.capacity)
            .field("evicted", &self.evicted_count)
            .finish()
    }
}

impl RecordBuffer {
    /// Create a buffer holding at most `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: HeapRb::new(capacity),
            capacity,
            evicted_count: 0,
            out_of_order_count: 0,
            last_ts: None,
        }
    }

    /// Append a record, evicting the oldest when full.
    pub fn push(&mut self, record: Record) {
        let ts = record.ts();

        // Out-of-order arrival is tolerated, only counted
        if let Some(last) = self.last_ts {
            if ts < last {
                self.out_of_order_count += 1;
            }
        }
        self.last_ts = Some(ts);

        if self.ring.is_full() {
            let _ = self.ring.try_pop();
            self.evicted_count += 1;
        }
        let _ = self.ring.try_push(record);
    }

    /// Snapshot of the buffered records in acceptance order.
    pub fn snapshot(&self) -> Vec<Record> {
        self.ring.iter().cloned().collect()
    }

    /// Number of buffered records.
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.occupied_len()
    }

    /// Check if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Configured capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records evicted so far.
    #[inline]
    pub fn evicted_count(&self) -> u64 {
        self.evicted_count
    }

    /// Records that arrived with a timestamp older than their predecessor.
    #[inline]
    pub fn out_of_order_count(&self) -> u64 {
        self.out_of_order_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Sample, SourceId};

    fn make_record(pitch: f64, ts: i64) -> Record {
        Record::Sample(Sample {
            source: SourceId::new(1),
            pitch,
            ax: None,
            ay: None,
            az: None,
            pitch_smooth: None,
            roll: None,
            a_mag: None,
            dpitch: None,
            baseline_pitch: None,
            button: None,
            button_click: None,
            ts,
        })
    }

    #[test]
    fn test_push_preserves_acceptance_order() {
        let mut buffer = RecordBuffer::new(10);
        buffer.push(make_record(1.0, 100));
        buffer.push(make_record(2.0, 101));
        buffer.push(make_record(3.0, 102));

        let pitches: Vec<f64> = buffer
            .snapshot()
            .iter()
            .map(|r| r.as_sample().unwrap().pitch)
            .collect();
        assert_eq!(pitches, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_fifo_eviction_at_capacity() {
        let mut buffer = RecordBuffer::new(3);
        for i in 0..5 {
            buffer.push(make_record(i as f64, 100 + i));
        }

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.evicted_count(), 2);

        let pitches: Vec<f64> = buffer
            .snapshot()
            .iter()
            .map(|r| r.as_sample().unwrap().pitch)
            .collect();
        // Oldest two evicted, last three retained in order
        assert_eq!(pitches, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_out_of_order_detection() {
        let mut buffer = RecordBuffer::new(10);
        buffer.push(make_record(1.0, 100));
        buffer.push(make_record(2.0, 300));
        buffer.push(make_record(3.0, 200)); // older than predecessor

        assert_eq!(buffer.out_of_order_count(), 1);
        // Not resequenced
        let ts: Vec<i64> = buffer.snapshot().iter().map(|r| r.ts()).collect();
        assert_eq!(ts, vec![100, 300, 200]);
    }
}
