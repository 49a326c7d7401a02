/*!
 * Partitioned Reader-Writer Lock
 *
 * A single logical lock backed by an array of independent, cache-line
 * padded partitions. Unrelated keys hashed to different partitions never
 * contend; same-partition callers get ordinary reader/writer exclusion.
 *
 * # Architecture
 *
 * - [`PartitionedRwLock`] owns the cell array and fronts both surfaces:
 *   index-addressed (`read_lock`/`unlock`) and guard-based (`read`/`write`).
 * - [`LockBackend`] is the per-cell acquisition strategy, selected at
 *   compile time via the table's type parameter: [`HostBackend`] wraps
 *   the platform rwlock, [`LoopBackend`] the runtime's permit arrangement,
 *   [`AtomicBackend`] a lock-free counter with a two-phase writer protocol.
 *
 * The table never hashes: callers map keys to `[0, partition_count)`
 * themselves (a power-of-two count makes that a mask).
 */

pub mod backend;
pub mod guard;
pub mod spin;

mod cell;
mod table;

pub use backend::{AtomicBackend, HostBackend, LockBackend, LockMode, LoopBackend};
pub use guard::{ReadGuard, WriteGuard};
pub use table::{PartitionedRwLock, TableError, TableResult, TryLock};
