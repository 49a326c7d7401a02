/*!
 * Partitioned Lock Integration Tests
 *
 * Exercises the facade and guard surfaces across all three backends
 */

use partlock::{AtomicBackend, HostBackend, LockBackend, LoopBackend, PartitionedRwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn readers_coexist<B: LockBackend>() {
    let table = Arc::new(PartitionedRwLock::<B>::with_partitions(8));

    table.read_lock(3);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let table = table.clone();
            thread::spawn(move || {
                assert!(table.try_read_lock(3).is_acquired());
                thread::sleep(Duration::from_millis(10));
                table.unlock(3);
            })
        })
        .collect();

    // A writer cannot get in while any reader holds the partition.
    assert!(table.try_write_lock(3).is_busy());

    for handle in handles {
        handle.join().unwrap();
    }
    table.unlock(3);
    assert!(table.is_unlocked(3));
}

#[test]
fn readers_coexist_host() {
    readers_coexist::<HostBackend>();
}

#[test]
fn readers_coexist_loop() {
    readers_coexist::<LoopBackend>();
}

#[test]
fn readers_coexist_atomic() {
    readers_coexist::<AtomicBackend>();
}

fn writer_excludes_everyone<B: LockBackend>() {
    let table = PartitionedRwLock::<B>::with_partitions(4);

    table.write_lock(1);
    assert!(table.try_read_lock(1).is_busy());
    assert!(table.try_write_lock(1).is_busy());

    table.unlock(1);
    table.read_lock(1);
    table.unlock(1);
    table.write_lock(1);
    table.unlock(1);
    assert!(table.is_unlocked(1));
}

#[test]
fn writer_excludes_everyone_host() {
    writer_excludes_everyone::<HostBackend>();
}

#[test]
fn writer_excludes_everyone_loop() {
    writer_excludes_everyone::<LoopBackend>();
}

#[test]
fn writer_excludes_everyone_atomic() {
    writer_excludes_everyone::<AtomicBackend>();
}

fn blocked_writer_acquires_after_drain<B: LockBackend>() {
    let table = Arc::new(PartitionedRwLock::<B>::with_partitions(2));
    let writer_in = Arc::new(AtomicBool::new(false));

    table.read_lock(0);

    let writer = {
        let table = table.clone();
        let writer_in = writer_in.clone();
        thread::spawn(move || {
            table.write_lock(0);
            writer_in.store(true, Ordering::SeqCst);
            table.unlock(0);
        })
    };

    thread::sleep(Duration::from_millis(50));
    assert!(!writer_in.load(Ordering::SeqCst), "writer ran under a reader");

    table.unlock(0);
    writer.join().unwrap();
    assert!(writer_in.load(Ordering::SeqCst));
    assert!(table.is_unlocked(0));
}

#[test]
fn blocked_writer_acquires_after_drain_host() {
    blocked_writer_acquires_after_drain::<HostBackend>();
}

#[test]
fn blocked_writer_acquires_after_drain_loop() {
    blocked_writer_acquires_after_drain::<LoopBackend>();
}

#[test]
fn blocked_writer_acquires_after_drain_atomic() {
    blocked_writer_acquires_after_drain::<AtomicBackend>();
}

fn partitions_never_block_each_other<B: LockBackend>() {
    let table = Arc::new(PartitionedRwLock::<B>::with_partitions(8));

    // Writer parks on partition 3 for the whole scenario.
    table.write_lock(3);

    let start = Instant::now();
    let others: Vec<_> = [5usize, 6, 7]
        .into_iter()
        .map(|partition| {
            let table = table.clone();
            thread::spawn(move || {
                table.read_lock(partition);
                table.unlock(partition);
                table.write_lock(partition);
                table.unlock(partition);
            })
        })
        .collect();

    for handle in others {
        handle.join().unwrap();
    }
    // Unrelated partitions complete promptly despite the held writer.
    assert!(start.elapsed() < Duration::from_secs(1));

    table.unlock(3);
}

#[test]
fn partitions_never_block_each_other_host() {
    partitions_never_block_each_other::<HostBackend>();
}

#[test]
fn partitions_never_block_each_other_loop() {
    partitions_never_block_each_other::<LoopBackend>();
}

#[test]
fn partitions_never_block_each_other_atomic() {
    partitions_never_block_each_other::<AtomicBackend>();
}

fn guards_across_threads<B: LockBackend>() {
    let table = Arc::new(PartitionedRwLock::<B>::with_partitions(4));

    let guard = table.write(2);
    let reader = {
        let table = table.clone();
        thread::spawn(move || {
            // Blocks until the writer guard drops.
            let _guard = table.read(2);
        })
    };

    thread::sleep(Duration::from_millis(20));
    drop(guard);
    reader.join().unwrap();
    assert!(table.is_unlocked(2));
}

#[test]
fn guards_across_threads_host() {
    guards_across_threads::<HostBackend>();
}

#[test]
fn guards_across_threads_loop() {
    guards_across_threads::<LoopBackend>();
}

#[test]
fn guards_across_threads_atomic() {
    guards_across_threads::<AtomicBackend>();
}

#[test]
fn facade_and_guards_share_cells() {
    let table = PartitionedRwLock::<AtomicBackend>::with_partitions(4);

    let guard = table.read(1);
    assert!(table.try_write_lock(1).is_busy());
    assert!(table.try_read_lock(1).is_acquired());
    table.unlock(1);
    drop(guard);
    assert!(table.is_unlocked(1));
}
