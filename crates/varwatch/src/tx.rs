use bytes::BytesMut;

use varwatch_registry::Registry;
use varwatch_stream::{ByteStream, Result};
use varwatch_wire::{encode_fault_code, encode_record, encode_stream_end, encode_stream_start};

const SCRATCH_CAPACITY: usize = 256;

/// Where the encoder resumes next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxPhase {
    /// Between cycles. The next tick opens a frame with the start marker.
    Idle,
    /// Emitting slot records; `cursor` is the next index to emit.
    EmitSlots { cursor: usize },
    /// Emitting the fault codes for this cycle.
    EmitErrors,
    /// Closing the frame with the end marker.
    StreamEnd,
}

/// Resumable outbound encoder.
///
/// One `service` call performs one phase step and at most `slots_per_tick`
/// record emissions, then hands control back — total slot count never
/// affects the worst-case work done in a single tick. Records always go
/// out in ascending index order.
pub struct TxEncoder {
    phase: TxPhase,
    slots_per_tick: usize,
    scratch: BytesMut,
}

impl TxEncoder {
    pub fn new(slots_per_tick: usize) -> Self {
        Self {
            phase: TxPhase::Idle,
            slots_per_tick: slots_per_tick.max(1),
            scratch: BytesMut::with_capacity(SCRATCH_CAPACITY),
        }
    }

    pub fn phase(&self) -> TxPhase {
        self.phase
    }

    /// Run one bounded encoder step against the registry.
    pub fn service<S: ByteStream>(&mut self, registry: &Registry, stream: &mut S) -> Result<()> {
        self.scratch.clear();

        self.phase = match self.phase {
            TxPhase::Idle => {
                encode_stream_start(&mut self.scratch);
                TxPhase::EmitSlots { cursor: 0 }
            }
            TxPhase::EmitSlots { cursor } => {
                let count = registry.len();
                let end = (cursor + self.slots_per_tick).min(count);
                for slot in &registry.slots()[cursor..end] {
                    let value = slot.render_value();
                    encode_record(
                        &mut self.scratch,
                        slot.index(),
                        slot.tag(),
                        slot.name(),
                        value.as_deref(),
                        slot.readonly(),
                    );
                }
                if end == count {
                    TxPhase::EmitErrors
                } else {
                    TxPhase::EmitSlots { cursor: end }
                }
            }
            TxPhase::EmitErrors => {
                for fault in registry.faults().iter() {
                    encode_fault_code(&mut self.scratch, fault.wire_code());
                }
                TxPhase::StreamEnd
            }
            TxPhase::StreamEnd => {
                encode_stream_end(&mut self.scratch);
                TxPhase::Idle
            }
        };

        if !self.scratch.is_empty() {
            stream.write(&self.scratch)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use varwatch_registry::{RegistryConfig, Storage};
    use varwatch_stream::MemoryStream;

    use super::*;

    fn registry_with_slots(n: usize) -> (Registry, Vec<Rc<Cell<u8>>>) {
        let mut registry = Registry::with_config(RegistryConfig { capacity: 16 });
        let handles: Vec<Rc<Cell<u8>>> = (0..n).map(|i| Rc::new(Cell::new(i as u8))).collect();
        for (i, handle) in handles.iter().enumerate() {
            registry
                .register(&format!("v{i}"), Storage::from(handle), false)
                .unwrap();
        }
        registry.complete_first_pass();
        (registry, handles)
    }

    fn drain(peer: &mut MemoryStream) -> String {
        use varwatch_stream::ByteStream as _;
        let bytes: Vec<u8> = std::iter::from_fn(|| peer.read_byte()).collect();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn budget_one_takes_one_slot_per_tick() {
        let (registry, _handles) = registry_with_slots(5);
        let (mut device, mut host) = MemoryStream::pair();
        let mut tx = TxEncoder::new(1);

        tx.service(&registry, &mut device).unwrap();
        assert_eq!(drain(&mut host), "<");

        // Exactly 5 ticks to traverse EmitSlots, one record each, no repeats.
        let mut emitted = Vec::new();
        for _ in 0..5 {
            assert!(matches!(tx.phase(), TxPhase::EmitSlots { .. }));
            tx.service(&registry, &mut device).unwrap();
            let burst = drain(&mut host);
            let index: usize = burst.split(':').next().unwrap().parse().unwrap();
            emitted.push(index);
        }
        assert_eq!(emitted, vec![0, 1, 2, 3, 4]);
        assert_eq!(tx.phase(), TxPhase::EmitErrors);
    }

    #[test]
    fn larger_budget_bursts_and_stops_at_count() {
        let (registry, _handles) = registry_with_slots(5);
        let (mut device, mut host) = MemoryStream::pair();
        let mut tx = TxEncoder::new(3);

        tx.service(&registry, &mut device).unwrap(); // start marker
        tx.service(&registry, &mut device).unwrap(); // slots 0..3
        assert_eq!(tx.phase(), TxPhase::EmitSlots { cursor: 3 });
        tx.service(&registry, &mut device).unwrap(); // slots 3..5
        assert_eq!(tx.phase(), TxPhase::EmitErrors);

        let frame_so_far = drain(&mut host);
        assert_eq!(frame_so_far.matches(';').count(), 5);
    }

    #[test]
    fn full_cycle_returns_to_idle() {
        let (registry, _handles) = registry_with_slots(2);
        let (mut device, mut host) = MemoryStream::pair();
        let mut tx = TxEncoder::new(8);

        tx.service(&registry, &mut device).unwrap();
        tx.service(&registry, &mut device).unwrap();
        tx.service(&registry, &mut device).unwrap();
        tx.service(&registry, &mut device).unwrap();
        assert_eq!(tx.phase(), TxPhase::Idle);

        let frame = drain(&mut host);
        assert_eq!(frame, "<0:Y:v0:0:0;1:Y:v1:1:0;>");
    }

    #[test]
    fn empty_registry_emits_bare_frame() {
        let mut registry = Registry::new();
        registry.complete_first_pass();
        let (mut device, mut host) = MemoryStream::pair();
        let mut tx = TxEncoder::new(1);

        for _ in 0..4 {
            tx.service(&registry, &mut device).unwrap();
        }
        assert_eq!(drain(&mut host), "<>");
        assert_eq!(tx.phase(), TxPhase::Idle);
    }

    #[test]
    fn fault_codes_appear_in_frame_tail() {
        let mut registry = Registry::with_config(RegistryConfig { capacity: 1 });
        let v = Rc::new(Cell::new(0u8));
        registry.register("a", Storage::from(&v), false).unwrap();
        registry.register("b", Storage::from(&v), false).unwrap_err();
        registry.complete_first_pass();

        let (mut device, mut host) = MemoryStream::pair();
        let mut tx = TxEncoder::new(4);
        for _ in 0..4 {
            tx.service(&registry, &mut device).unwrap();
        }

        let frame = drain(&mut host);
        assert_eq!(frame, "<0:Y:a:0:0;E0;>");
    }

    #[test]
    fn invalid_value_leaves_empty_field_without_desync() {
        let mut registry = Registry::new();
        let c = Rc::new(Cell::new('~'));
        registry.register("sep", Storage::from(&c), false).unwrap();
        registry.complete_first_pass();

        let (mut device, mut host) = MemoryStream::pair();
        let mut tx = TxEncoder::new(4);
        for _ in 0..4 {
            tx.service(&registry, &mut device).unwrap();
        }

        let frame = drain(&mut host);
        assert_eq!(frame, "<0:c:sep::0;E2;>");
    }

    #[test]
    fn zero_budget_is_clamped() {
        let (registry, _handles) = registry_with_slots(1);
        let (mut device, mut host) = MemoryStream::pair();
        let mut tx = TxEncoder::new(0);

        tx.service(&registry, &mut device).unwrap();
        tx.service(&registry, &mut device).unwrap();
        assert_eq!(tx.phase(), TxPhase::EmitErrors);
        assert!(drain(&mut host).contains("v0"));
    }

    #[test]
    fn next_cycle_reflects_changed_values() {
        let (registry, handles) = registry_with_slots(1);
        let (mut device, mut host) = MemoryStream::pair();
        let mut tx = TxEncoder::new(4);

        for _ in 0..4 {
            tx.service(&registry, &mut device).unwrap();
        }
        assert_eq!(drain(&mut host), "<0:Y:v0:0:0;>");

        handles[0].set(200);
        for _ in 0..4 {
            tx.service(&registry, &mut device).unwrap();
        }
        assert_eq!(drain(&mut host), "<0:Y:v0:200:0;>");
    }
}
