use varwatch_wire::TypeTag;

/// Errors that can occur while registering slots or applying host edits.
///
/// On the inbound path every one of these degrades to a discarded edit;
/// none of them is fatal to the servicing loop.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The slot table is full; the registration produced no slot.
    #[error("registry capacity exceeded ({capacity} slots)")]
    CapacityExceeded { capacity: usize },

    /// An edit referenced a slot index that was never assigned.
    #[error("slot index {index} out of range ({count} registered)")]
    IndexOutOfRange { index: usize, count: usize },

    /// An edit targeted a read-only slot.
    #[error("slot {index} is read-only")]
    ReadonlySlot { index: usize },

    /// An edit targeted a display-only kind.
    #[error("slot {index} ({tag}) is not editable")]
    NotEditable { index: usize, tag: TypeTag },

    /// An edit's type tag does not match the slot's storage.
    #[error("slot {index} holds {expected}, edit tagged {got}")]
    TypeMismatch {
        index: usize,
        expected: TypeTag,
        got: TypeTag,
    },

    /// An edit's value could not be written through.
    #[error("value {value:?} rejected for slot {index}: {reason}")]
    ValueRejected {
        index: usize,
        value: String,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
