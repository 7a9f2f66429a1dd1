use tracing::{debug, warn};

use varwatch_wire::{is_safe, Edit, INVALID_NAME_PLACEHOLDER};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::faults::{Fault, FaultSet};
use crate::slot::{Slot, Storage};

/// The bounded slot table.
///
/// Constructed once, owned by the servicing session, never global. During
/// the first registration pass every `register` call appends a slot and
/// assigns the next dense index. After [`complete_first_pass`] the caller
/// keeps issuing the same calls in the same order each tick; the registry
/// matches them to their first-pass positions and re-checks the content of
/// volatile slots without ever moving an index, a type, or a readonly flag.
///
/// [`complete_first_pass`]: Registry::complete_first_pass
pub struct Registry {
    slots: Vec<Slot>,
    config: RegistryConfig,
    faults: FaultSet,
    first_pass_done: bool,
    /// Register calls seen during the first pass, including rejected ones.
    /// The post-pass revalidation sweep walks this sequence.
    first_pass_calls: usize,
    refresh_cursor: usize,
}

impl Registry {
    /// Create a registry with default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with explicit configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.capacity),
            config,
            faults: FaultSet::default(),
            first_pass_done: false,
            first_pass_calls: 0,
            refresh_cursor: 0,
        }
    }

    /// Register a slot, or — after the first pass — revalidate the slot
    /// this call position corresponds to.
    ///
    /// The post-pass call sequence must repeat the first-pass sequence; the
    /// match is purely by call order, exactly as the index assignment was.
    pub fn register(&mut self, name: &str, storage: Storage, readonly: bool) -> Result<usize> {
        if self.first_pass_done {
            return self.refresh();
        }

        self.first_pass_calls += 1;

        if self.slots.len() == self.config.capacity {
            self.faults.set(Fault::CapacityExceeded);
            warn!(
                name,
                capacity = self.config.capacity,
                "registration rejected, capacity exhausted"
            );
            return Err(RegistryError::CapacityExceeded {
                capacity: self.config.capacity,
            });
        }

        let invalid_name = !is_safe(name);
        let name = if invalid_name {
            self.faults.set(Fault::InvalidName);
            warn!(name, "registered name carries a reserved character");
            INVALID_NAME_PLACEHOLDER.to_string()
        } else {
            name.to_string()
        };

        let index = self.slots.len();
        let mut slot = Slot::new(index, name, storage, readonly, invalid_name);
        if slot.revalidate() {
            self.faults.set(Fault::InvalidValue);
        }
        self.slots.push(slot);
        Ok(index)
    }

    fn refresh(&mut self) -> Result<usize> {
        let seq = self.refresh_cursor;
        self.refresh_cursor = (seq + 1) % self.first_pass_calls.max(1);

        if seq == 0 {
            self.faults.clear_transient();
        }

        if seq >= self.slots.len() {
            // This call position overflowed capacity during the first pass;
            // it keeps re-asserting the sticky fault, same as then.
            self.faults.set(Fault::CapacityExceeded);
            return Err(RegistryError::CapacityExceeded {
                capacity: self.config.capacity,
            });
        }

        if self.slots[seq].revalidate() {
            self.faults.set(Fault::InvalidValue);
        }
        Ok(seq)
    }

    /// Flip the one-shot first-pass latch. Idempotent.
    pub fn complete_first_pass(&mut self) {
        if !self.first_pass_done {
            self.first_pass_done = true;
            self.refresh_cursor = 0;
            debug!(slots = self.slots.len(), "first registration pass complete");
        }
    }

    pub fn first_pass_done(&self) -> bool {
        self.first_pass_done
    }

    /// Number of registered slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// All slots in index order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Bounds-checked slot lookup for the write-back path.
    pub fn slot_at(&self, index: usize) -> Result<&Slot> {
        self.slots.get(index).ok_or(RegistryError::IndexOutOfRange {
            index,
            count: self.slots.len(),
        })
    }

    /// Apply one parsed host edit through the target slot's storage.
    pub fn apply_edit(&self, edit: Edit<'_>) -> Result<()> {
        let slot = self.slot_at(edit.index)?;
        slot.apply(edit.tag, edit.value)
    }

    /// Current fault accumulator state.
    pub fn faults(&self) -> FaultSet {
        self.faults
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use varwatch_wire::TypeTag;

    use super::*;

    fn small_registry(capacity: usize) -> Registry {
        Registry::with_config(RegistryConfig { capacity })
    }

    #[test]
    fn first_pass_assigns_dense_indexes() {
        let mut registry = Registry::new();
        let a = Rc::new(Cell::new(1u8));
        let b = Rc::new(Cell::new(2u8));

        assert_eq!(registry.register("a", Storage::from(&a), false).unwrap(), 0);
        assert_eq!(registry.register("b", Storage::from(&b), true).unwrap(), 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.slot_at(1).unwrap().name(), "b");
        assert!(registry.slot_at(1).unwrap().readonly());
    }

    #[test]
    fn indexes_are_stable_across_ticks() {
        let mut registry = Registry::new();
        let a = Rc::new(Cell::new(0i32));
        let b = Rc::new(Cell::new(0i32));

        registry.register("a", Storage::from(&a), false).unwrap();
        registry.register("b", Storage::from(&b), false).unwrap();
        registry.complete_first_pass();

        for _ in 0..5 {
            assert_eq!(registry.register("a", Storage::from(&a), false).unwrap(), 0);
            assert_eq!(registry.register("b", Storage::from(&b), false).unwrap(), 1);
        }
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn capacity_boundary_sets_sticky_fault_and_adds_no_slot() {
        let mut registry = small_registry(2);
        let v = Rc::new(Cell::new(0u8));

        registry.register("a", Storage::from(&v), false).unwrap();
        registry.register("b", Storage::from(&v), false).unwrap();
        let err = registry.register("c", Storage::from(&v), false).unwrap_err();

        assert!(matches!(err, RegistryError::CapacityExceeded { capacity: 2 }));
        assert_eq!(registry.len(), 2);
        assert!(registry.faults().contains(Fault::CapacityExceeded));
    }

    #[test]
    fn capacity_fault_reasserts_every_pass() {
        let mut registry = small_registry(1);
        let v = Rc::new(Cell::new(0u8));

        registry.register("a", Storage::from(&v), false).unwrap();
        registry.register("b", Storage::from(&v), false).unwrap_err();
        registry.complete_first_pass();

        assert_eq!(registry.register("a", Storage::from(&v), false).unwrap(), 0);
        let err = registry.register("b", Storage::from(&v), false).unwrap_err();
        assert!(matches!(err, RegistryError::CapacityExceeded { .. }));
        assert!(registry.faults().contains(Fault::CapacityExceeded));
    }

    #[test]
    fn reserved_name_becomes_placeholder() {
        let mut registry = Registry::new();
        let v = Rc::new(Cell::new(0u8));

        let index = registry.register("bad;name", Storage::from(&v), false).unwrap();
        let slot = registry.slot_at(index).unwrap();

        assert!(slot.invalid_name());
        assert_eq!(slot.name(), INVALID_NAME_PLACEHOLDER);
        assert!(registry.faults().contains(Fault::InvalidName));
    }

    #[test]
    fn empty_name_is_valid() {
        let mut registry = Registry::new();
        registry.register("", Storage::Spacer, true).unwrap();
        assert!(!registry.slot_at(0).unwrap().invalid_name());
        assert!(registry.faults().is_empty());
    }

    #[test]
    fn invalid_value_fault_tracks_content() {
        let mut registry = Registry::new();
        let buf = Rc::new(RefCell::new(String::from("ok")));
        registry
            .register("msg", Storage::char_buffer(&buf, 16), false)
            .unwrap();
        registry.complete_first_pass();

        // Content turns unsafe between ticks.
        *buf.borrow_mut() = "a~b".to_string();
        registry
            .register("msg", Storage::char_buffer(&buf, 16), false)
            .unwrap();
        assert!(registry.slot_at(0).unwrap().invalid_value());
        assert!(registry.faults().contains(Fault::InvalidValue));

        // Content recovers; the transient bit clears on the next sweep.
        *buf.borrow_mut() = "fine".to_string();
        registry
            .register("msg", Storage::char_buffer(&buf, 16), false)
            .unwrap();
        assert!(!registry.slot_at(0).unwrap().invalid_value());
        assert!(!registry.faults().contains(Fault::InvalidValue));
    }

    #[test]
    fn unsafe_initial_value_flags_at_registration() {
        let mut registry = Registry::new();
        let c = Rc::new(Cell::new(';'));
        registry.register("sep", Storage::from(&c), false).unwrap();

        assert!(registry.slot_at(0).unwrap().invalid_value());
        assert!(registry.faults().contains(Fault::InvalidValue));
    }

    #[test]
    fn complete_first_pass_is_idempotent() {
        let mut registry = Registry::new();
        let v = Rc::new(Cell::new(0u8));
        registry.register("a", Storage::from(&v), false).unwrap();

        registry.complete_first_pass();
        registry.complete_first_pass();
        assert!(registry.first_pass_done());

        assert_eq!(registry.register("a", Storage::from(&v), false).unwrap(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn slot_lookup_is_bounds_checked() {
        let registry = Registry::new();
        assert!(matches!(
            registry.slot_at(0),
            Err(RegistryError::IndexOutOfRange { index: 0, count: 0 })
        ));
    }

    #[test]
    fn apply_edit_writes_through() {
        let mut registry = Registry::new();
        let v = Rc::new(Cell::new(3u32));
        registry.register("count", Storage::from(&v), false).unwrap();
        registry.complete_first_pass();

        registry
            .apply_edit(Edit {
                tag: TypeTag::UInt32,
                index: 0,
                value: "42",
            })
            .unwrap();
        assert_eq!(v.get(), 42);
    }

    #[test]
    fn apply_edit_enforces_readonly() {
        let mut registry = Registry::new();
        let v = Rc::new(Cell::new(3u32));
        registry.register("count", Storage::from(&v), true).unwrap();
        registry.complete_first_pass();

        let err = registry
            .apply_edit(Edit {
                tag: TypeTag::UInt32,
                index: 0,
                value: "42",
            })
            .unwrap_err();
        assert!(matches!(err, RegistryError::ReadonlySlot { index: 0 }));
        assert_eq!(v.get(), 3);
    }

    #[test]
    fn apply_edit_rejects_out_of_range_index() {
        let registry = Registry::new();
        let err = registry
            .apply_edit(Edit {
                tag: TypeTag::Bool,
                index: 9,
                value: "1",
            })
            .unwrap_err();
        assert!(matches!(err, RegistryError::IndexOutOfRange { index: 9, .. }));
    }
}
