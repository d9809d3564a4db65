use thiserror::Error;

/// The error type for every fallible [`RingBuffer`](crate::RingBuffer)
/// operation.
///
/// Every variant is recoverable: a rejected operation reports its diagnostic
/// fields and leaves the buffer completely unchanged and fully usable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// A checked constructor received a negative capacity.
    #[error("invalid capacity: {requested}")]
    InvalidCapacity { requested: i64 },

    /// An enqueue asked for more slots than are currently free.
    #[error("not enough available slots: requested {requested}, available {available}")]
    CapacityExceeded { requested: usize, available: usize },

    /// A dequeue asked for more elements than the buffer currently holds.
    #[error("not enough filled slots: requested {requested}, available {available}")]
    Underflow { requested: usize, available: usize },

    /// A positional write (`replace`/`remove`) addressed a slot outside the
    /// occupied range. Positional reads (`at`) return `None` instead.
    #[error("{index} is not a valid positive nor negative index: the number of filled slots is {filled_slots}")]
    IndexOutOfRange { index: isize, filled_slots: usize },
}
