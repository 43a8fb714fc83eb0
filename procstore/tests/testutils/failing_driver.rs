//! Storage driver with switchable fault injection
//!
//! Wraps the in-memory driver; while a switch is on, the matching tree
//! operations fail with a backend error.

use procstore::storage::{
    MemoryStorageDriver, StorageDriver, StorageDriverError, StorageResult, StorageTree,
    StorageType,
};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared fault switches
#[derive(Clone, Default)]
pub struct FaultSwitch {
    reads: Arc<AtomicBool>,
    writes: Arc<AtomicBool>,
}

impl FaultSwitch {
    pub fn fail_reads(&self, on: bool) {
        self.reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.writes.store(on, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, operation: &str) -> StorageResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StorageDriverError::BackendSpecific(format!(
                "injected {} fault",
                operation
            )));
        }
        Ok(())
    }
}

/// In-memory driver whose trees fail on demand
#[derive(Clone, Default)]
pub struct FailingDriver {
    inner: MemoryStorageDriver,
    switch: FaultSwitch,
}

impl FailingDriver {
    pub fn new(inner: MemoryStorageDriver, switch: FaultSwitch) -> Self {
        Self { inner, switch }
    }
}

struct FailingTree {
    inner: Box<dyn StorageTree>,
    switch: FaultSwitch,
}

impl StorageTree for FailingTree {
    fn insert(&self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        FaultSwitch::check(&self.switch.writes, "write")?;
        self.inner.insert(key, value)
    }

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        FaultSwitch::check(&self.switch.reads, "read")?;
        self.inner.get(key)
    }

    fn remove(&self, key: &[u8]) -> StorageResult<()> {
        FaultSwitch::check(&self.switch.writes, "write")?;
        self.inner.remove(key)
    }

    fn keys(&self) -> StorageResult<Vec<Vec<u8>>> {
        FaultSwitch::check(&self.switch.reads, "read")?;
        self.inner.keys()
    }

    fn flush(&self) -> StorageResult<()> {
        FaultSwitch::check(&self.switch.writes, "flush")?;
        self.inner.flush()
    }
}

impl StorageDriver for FailingDriver {
    type Tree = Box<dyn StorageTree>;

    fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Ok(Self::new(
            MemoryStorageDriver::open(path)?,
            FaultSwitch::default(),
        ))
    }

    fn open_tree(&self, name: &str) -> StorageResult<Self::Tree> {
        Ok(Box::new(FailingTree {
            inner: self.inner.open_tree(name)?,
            switch: self.switch.clone(),
        }))
    }

    fn list_trees(&self) -> StorageResult<Vec<String>> {
        self.inner.list_trees()
    }

    fn flush(&self) -> StorageResult<()> {
        self.inner.flush()
    }

    fn storage_type(&self) -> StorageType {
        StorageType::Memory
    }
}
