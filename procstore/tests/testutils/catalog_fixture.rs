//! Test fixture for procstore integration tests
//!
//! Provides an isolated in-memory database with a scripted engine, built
//! only from the public CallableCoordinator API. `restart()` opens a second
//! coordinator over the same storage, which is how a process restart looks
//! to the catalog.

use super::failing_driver::{FailingDriver, FaultSwitch};
use super::script_engine::ScriptEngine;
use procstore::storage::{MemoryStorageDriver, StorageManager};
use procstore::{
    Arguments, CallOutput, CallableCoordinator, CallableKind, CatalogConfig, InvocationContext,
    InvocationError, Row, Value,
};
use std::sync::Arc;

/// Isolated database instance
pub struct CatalogFixture {
    coordinator: Arc<CallableCoordinator>,
    engine: Arc<ScriptEngine>,
    memory: MemoryStorageDriver,
    faults: FaultSwitch,
}

impl CatalogFixture {
    /// Create an empty fixture
    pub fn new() -> Self {
        Self::over(MemoryStorageDriver::new(), FaultSwitch::default())
    }

    fn over(memory: MemoryStorageDriver, faults: FaultSwitch) -> Self {
        let driver = FailingDriver::new(memory.clone(), faults.clone());
        let storage = Arc::new(
            StorageManager::with_driver(Box::new(driver)).expect("Should open memory storage"),
        );
        let engine = Arc::new(ScriptEngine::new());
        let coordinator =
            CallableCoordinator::open(storage, CatalogConfig::default(), engine.clone());

        Self {
            coordinator,
            engine,
            memory,
            faults,
        }
    }

    /// Open a fresh coordinator over the same stored data
    pub fn restart(&self) -> Self {
        Self::over(self.memory.clone(), self.faults.clone())
    }

    pub fn coordinator(&self) -> &Arc<CallableCoordinator> {
        &self.coordinator
    }

    pub fn engine(&self) -> &ScriptEngine {
        &self.engine
    }

    /// Switches shared by this fixture and every restart of it
    pub fn faults(&self) -> &FaultSwitch {
        &self.faults
    }

    /// Call a function in a read-write context
    pub fn call_function(&self, name: &str, arguments: Arguments) -> Result<Value, InvocationError> {
        self.coordinator
            .invoke(
                name,
                CallableKind::Function,
                arguments,
                &InvocationContext::read_write(),
            )
            .map(|output| match output {
                CallOutput::Value(value) => value,
                CallOutput::Rows(rows) => panic!("function returned rows: {:?}", rows),
            })
    }

    /// Call a procedure in the given context
    pub fn call_procedure_in(
        &self,
        name: &str,
        arguments: Arguments,
        context: &InvocationContext,
    ) -> Result<Vec<Row>, InvocationError> {
        self.coordinator
            .invoke(name, CallableKind::Procedure, arguments, context)
            .map(|output| match output {
                CallOutput::Rows(rows) => rows,
                CallOutput::Value(value) => panic!("procedure returned a value: {:?}", value),
            })
    }

    /// Call a procedure in a read-write context
    pub fn call_procedure(&self, name: &str, arguments: Arguments) -> Result<Vec<Row>, InvocationError> {
        self.call_procedure_in(name, arguments, &InvocationContext::read_write())
    }

    /// Overwrite the persisted blob directly
    pub fn write_raw_blob(&self, bytes: &[u8]) {
        let storage = StorageManager::with_driver(Box::new(self.memory.clone()))
            .expect("Should open memory storage");
        storage
            .save_catalog_provider(&CatalogConfig::default().blob_key, bytes)
            .expect("Should write blob");
    }

    /// Read the persisted blob as JSON
    pub fn raw_blob(&self) -> Option<serde_json::Value> {
        let storage = StorageManager::with_driver(Box::new(self.memory.clone()))
            .expect("Should open memory storage");
        storage
            .load_catalog_provider(&CatalogConfig::default().blob_key)
            .expect("Should read blob")
            .map(|bytes| serde_json::from_slice(&bytes).expect("Blob should be JSON"))
    }
}
