//! Operation execution pipeline (the surface the ledger platform invokes).
//!
//! ```text
//! (function, args)
//!   ↓
//! 1. Parse into a typed command (arity + argument types, no ledger access)
//!   ↓
//! 2. Begin a ledger transaction
//!   ↓
//! 3. Run the entity store operation against the transaction
//!   ↓
//! 4. Commit (publishes the record and the counter advance together)
//! ```
//!
//! If any step fails the transaction is dropped, so neither the record nor the
//! counter advance becomes visible. Nothing is retried here; a `Conflict`
//! means another transaction won the race and the caller may resubmit.

use core::fmt;

use thiserror::Error;

use marketledger_core::DomainError;

use crate::command::{QueryCommand, WriteCommand, positional};
use crate::config::MarketConfig;
use crate::entity_store::{EntityStore, Receipt};
use crate::initializer::{InitOutcome, Initializer};
use crate::ledger::{Ledger, LedgerError, LedgerTransaction};

/// Entry phase an operation name was looked up in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Invoke,
    Query,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Invoke => f.write_str("invocation"),
            Phase::Query => f.write_str("query"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Wrong number of positional arguments.
    #[error("{operation}: incorrect number of arguments, expecting {expected}, got {actual}")]
    Arity {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An argument could not be parsed into its expected type.
    #[error("{operation}: invalid argument {index} ({name}): {reason}")]
    InvalidArgument {
        operation: &'static str,
        index: usize,
        name: &'static str,
        reason: String,
    },

    /// A create ran before `init` seeded its counter.
    #[error("counter '{key}' is not initialized (run init first)")]
    UninitializedCounter { key: &'static str },

    /// An order referenced a user key that holds nothing.
    #[error("unknown user '{key}'")]
    UnknownUser { key: String },

    #[error("failed to get state for '{key}': not found")]
    NotFound { key: String },

    #[error("received unknown function {phase}: {name}")]
    UnknownOperation { phase: Phase, name: String },

    /// `init` found existing counters and the policy is `Refuse`.
    #[error("ledger already initialized ('{key}' exists)")]
    AlreadyInitialized { key: &'static str },

    /// Another transaction wrote a key this one read; resubmit to retry.
    #[error("write conflict on '{key}'")]
    Conflict { key: String },

    #[error("malformed record under '{key}': {reason}")]
    MalformedRecord { key: String, reason: String },

    /// Underlying ledger get/put failure. `operation` is filled in by the
    /// dispatcher; it is `None` when a store is driven directly.
    #[error("{}ledger i/o failure on '{key}': {reason}", operation_prefix(.operation))]
    Ledger {
        operation: Option<&'static str>,
        key: String,
        reason: String,
    },
}

fn operation_prefix(operation: &Option<&'static str>) -> String {
    operation.map(|op| format!("{op}: ")).unwrap_or_default()
}

impl DispatchError {
    pub fn invalid_argument(
        operation: &'static str,
        index: usize,
        name: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            operation,
            index,
            name,
            reason: reason.into(),
        }
    }

    /// Name the operation a ledger failure happened in, unless already named.
    pub fn during(self, operation: &'static str) -> Self {
        match self {
            Self::Ledger {
                operation: None,
                key,
                reason,
            } => Self::Ledger {
                operation: Some(operation),
                key,
                reason,
            },
            other => other,
        }
    }

    /// Attach the ledger key a domain failure happened at.
    pub fn from_domain(key: &str, err: DomainError) -> Self {
        match err {
            DomainError::MalformedRecord(reason) | DomainError::Validation(reason) => {
                Self::MalformedRecord {
                    key: key.to_string(),
                    reason,
                }
            }
        }
    }
}

impl From<LedgerError> for DispatchError {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::NotFound(key) => DispatchError::NotFound { key },
            LedgerError::Conflict(key) => DispatchError::Conflict { key },
            LedgerError::Io { key, reason } => DispatchError::Ledger {
                operation: None,
                key,
                reason,
            },
        }
    }
}

/// Stateless front door for `init`, `invoke` and `query`.
///
/// All persistent state lives in the ledger; the dispatcher only holds a
/// handle to it and the configuration, so it can be shared across threads.
#[derive(Debug)]
pub struct OperationDispatcher<L> {
    ledger: L,
    config: MarketConfig,
}

impl<L> OperationDispatcher<L> {
    pub fn new(ledger: L, config: MarketConfig) -> Self {
        Self { ledger, config }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

}

impl<L> OperationDispatcher<L>
where
    L: Ledger,
{
    pub const INIT: &'static str = "init";

    /// Seed the counters. Takes no arguments.
    pub fn init(&self, args: &[String]) -> Result<InitOutcome, DispatchError> {
        let span = tracing::info_span!("init");
        let _enter = span.enter();

        positional::<0>(Self::INIT, args)?;
        let result = self.in_transaction(Self::INIT, |tx| {
            Initializer::new(tx, self.config().reinit).run()
        });
        match &result {
            Ok(outcome) => tracing::info!(?outcome, "counters seeded"),
            Err(e) => tracing::warn!(error = %e, "init failed"),
        }
        result
    }

    /// Run a named state-changing operation.
    pub fn invoke(&self, function: &str, args: &[String]) -> Result<Receipt, DispatchError> {
        let span = tracing::info_span!("invoke", function);
        let _enter = span.enter();

        let result = WriteCommand::parse(function, args).and_then(|cmd| self.execute(cmd));
        if let Err(e) = &result {
            tracing::warn!(error = %e, "invoke failed");
        }
        result
    }

    /// Run a named read-only operation.
    pub fn query(&self, function: &str, args: &[String]) -> Result<Vec<u8>, DispatchError> {
        let span = tracing::info_span!("query", function);
        let _enter = span.enter();

        let result = QueryCommand::parse(function, args).and_then(|cmd| self.execute_query(cmd));
        if let Err(e) = &result {
            tracing::debug!(error = %e, "query failed");
        }
        result
    }

    /// Execute an already-parsed write command in its own transaction.
    pub fn execute(&self, command: WriteCommand) -> Result<Receipt, DispatchError> {
        let name = command.name();
        let receipt = self.in_transaction(name, |tx| {
            let store = EntityStore::new(tx);
            match command {
                WriteCommand::AddProduct(cmd) => store.create_product(cmd),
                WriteCommand::AddOrder(cmd) => store.create_order(cmd),
                WriteCommand::AddUser(cmd) => store.create_user(cmd),
            }
        })?;

        tracing::info!(operation = name, key = %receipt.key, index = receipt.index, "committed");
        Ok(receipt)
    }

    pub fn execute_query(&self, command: QueryCommand) -> Result<Vec<u8>, DispatchError> {
        let name = command.name();
        match command {
            QueryCommand::Read { key } => {
                self.in_transaction(name, |tx| EntityStore::new(tx).read(&key))
            }
        }
    }

    /// Typed read access for callers that know what a key holds.
    pub fn store(&self) -> EntityStore<'_, L> {
        EntityStore::new(&self.ledger)
    }

    fn in_transaction<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&LedgerTransaction<'_, L>) -> Result<T, DispatchError>,
    ) -> Result<T, DispatchError> {
        let tx = LedgerTransaction::begin(&self.ledger);
        let out = f(&tx).map_err(|e| e.during(operation))?;
        tracing::trace!(pending = tx.pending_writes(), "committing transaction");
        let writes = tx
            .commit()
            .map_err(|e| DispatchError::from(e).during(operation))?;
        tracing::debug!(writes, "transaction committed");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use marketledger_core::{Counter, Record};
    use marketledger_products::Product;

    use super::*;
    use crate::config::ReinitPolicy;
    use crate::ledger::InMemoryLedger;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn dispatcher() -> OperationDispatcher<Arc<InMemoryLedger>> {
        marketledger_observability::init();
        let dispatcher =
            OperationDispatcher::new(Arc::new(InMemoryLedger::new()), MarketConfig::default());
        dispatcher.init(&[]).unwrap();
        dispatcher
    }

    fn read(dispatcher: &OperationDispatcher<Arc<InMemoryLedger>>, key: &str) -> Vec<u8> {
        dispatcher.query("read", &args(&[key])).unwrap()
    }

    #[test]
    fn init_seeds_readable_counters() {
        let dispatcher = dispatcher();
        for counter in Counter::ALL {
            assert_eq!(read(&dispatcher, counter.key()), b"0");
        }
    }

    #[test]
    fn init_takes_no_arguments() {
        let dispatcher =
            OperationDispatcher::new(InMemoryLedger::new(), MarketConfig::default());
        assert_eq!(
            dispatcher.init(&args(&["x"])).unwrap_err(),
            DispatchError::Arity { operation: "init", expected: 0, actual: 1 }
        );
        assert!(dispatcher.ledger().is_empty());
    }

    #[test]
    fn add_product_then_read_back() {
        let dispatcher = dispatcher();
        let receipt = dispatcher
            .invoke("addProduct", &args(&["P1", "Widget", "9.99", "10", "2"]))
            .unwrap();

        assert_eq!(receipt.key, "product0");
        assert_eq!(read(&dispatcher, "productsLength"), b"1");
        let product = Product::decode(&read(&dispatcher, "product0")).unwrap();
        assert_eq!(product, Product::new("P1", "Widget", "9.99".parse().unwrap(), 10, 2));
    }

    #[test]
    fn invalid_numbers_leave_counter_untouched() {
        let dispatcher = dispatcher();
        for bad in [
            ["P1", "Widget", "x", "10", "2"],
            ["P1", "Widget", "9.99", "1.5", "2"],
            ["P1", "Widget", "9.99", "10", ""],
        ] {
            let err = dispatcher.invoke("addProduct", &args(&bad)).unwrap_err();
            assert!(matches!(err, DispatchError::InvalidArgument { .. }), "{err:?}");
        }
        assert_eq!(read(&dispatcher, "productsLength"), b"0");
        assert_eq!(
            dispatcher.query("read", &args(&["product0"])).unwrap_err(),
            DispatchError::NotFound { key: "product0".into() }
        );
    }

    #[test]
    fn unknown_user_leaves_order_counter_untouched() {
        let dispatcher = dispatcher();
        let err = dispatcher
            .invoke("addOrder", &args(&["ghost@pw", "[]", "[]", "0"]))
            .unwrap_err();
        assert_eq!(err, DispatchError::UnknownUser { key: "ghost@pw".into() });
        assert_eq!(read(&dispatcher, "ordersLength"), b"0");
    }

    #[test]
    fn malformed_products_json_leaves_order_counter_untouched() {
        let dispatcher = dispatcher();
        dispatcher
            .invoke("addUser", &args(&["alice", "pw1", "hash123"]))
            .unwrap();
        let err = dispatcher
            .invoke("addOrder", &args(&["alice@pw1", "[{\"ref\":", "[]", "0"]))
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::InvalidArgument { operation: "addOrder", index: 1, .. }
        ));
        assert_eq!(read(&dispatcher, "ordersLength"), b"0");
    }

    #[test]
    fn arity_is_checked_before_ledger_access() {
        // Unseeded ledger: an arity error must win over UninitializedCounter.
        let dispatcher =
            OperationDispatcher::new(InMemoryLedger::new(), MarketConfig::default());
        assert!(matches!(
            dispatcher.invoke("addUser", &args(&["alice", "pw1"])),
            Err(DispatchError::Arity { operation: "addUser", expected: 3, actual: 2 })
        ));
        assert!(matches!(
            dispatcher.invoke("addUser", &args(&["alice", "pw1", "h"])),
            Err(DispatchError::UninitializedCounter { key: "usersLength" })
        ));
        assert!(dispatcher.ledger().is_empty());
    }

    #[test]
    fn unknown_operations_are_rejected() {
        let dispatcher = dispatcher();
        assert!(matches!(
            dispatcher.invoke("deleteProduct", &args(&["product0"])),
            Err(DispatchError::UnknownOperation { phase: Phase::Invoke, .. })
        ));
        let err = dispatcher.query("list", &[]).unwrap_err();
        assert_eq!(err.to_string(), "received unknown function query: list");
    }

    #[test]
    fn second_init_is_refused_by_default() {
        let dispatcher = dispatcher();
        dispatcher
            .invoke("addProduct", &args(&["P1", "Widget", "9.99", "10", "2"]))
            .unwrap();

        assert_eq!(
            dispatcher.init(&[]).unwrap_err(),
            DispatchError::AlreadyInitialized { key: "productsLength" }
        );
        assert_eq!(read(&dispatcher, "productsLength"), b"1");
    }

    #[test]
    fn reset_policy_orphans_then_overwrites_records() {
        let dispatcher = OperationDispatcher::new(
            InMemoryLedger::new(),
            MarketConfig::default().with_reinit(ReinitPolicy::Reset),
        );
        assert_eq!(dispatcher.init(&[]).unwrap(), InitOutcome::Seeded);
        dispatcher
            .invoke("addProduct", &args(&["P1", "Widget", "9.99", "10", "2"]))
            .unwrap();
        dispatcher
            .invoke("addUser", &args(&["alice", "pw1", "hash123"]))
            .unwrap();

        assert_eq!(dispatcher.init(&[]).unwrap(), InitOutcome::Reset);
        for counter in Counter::ALL {
            assert_eq!(dispatcher.query("read", &args(&[counter.key()])).unwrap(), b"0");
        }
        // The old record is still there, and the next create overwrites it.
        assert!(dispatcher.ledger().contains_key("product0"));
        dispatcher
            .invoke("addProduct", &args(&["P2", "Gadget", "1", "1", "1"]))
            .unwrap();
        assert_eq!(dispatcher.store().product(0).unwrap().reference, "P2");
    }

    /// Ledger whose writes always fail, for I/O passthrough.
    struct BrokenLedger(InMemoryLedger);

    impl Ledger for BrokenLedger {
        fn get(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
            self.0.get(key)
        }

        fn put(&self, key: &str, _value: Vec<u8>) -> Result<(), LedgerError> {
            Err(LedgerError::io(key, "disk full"))
        }
    }

    #[test]
    fn ledger_failure_is_named_after_the_first_operation() {
        let err: DispatchError = LedgerError::io("usersLength", "unreachable").into();
        assert_eq!(err.to_string(), "ledger i/o failure on 'usersLength': unreachable");

        let named = err.during("addUser").during("init");
        assert_eq!(
            named.to_string(),
            "addUser: ledger i/o failure on 'usersLength': unreachable"
        );
        assert_eq!(
            DispatchError::UnknownUser { key: "x".into() }.during("addOrder"),
            DispatchError::UnknownUser { key: "x".into() }
        );
    }

    #[test]
    fn ledger_failures_pass_through() {
        let inner = InMemoryLedger::new();
        for counter in Counter::ALL {
            inner.put(counter.key(), b"0".to_vec()).unwrap();
        }
        let dispatcher = OperationDispatcher::new(BrokenLedger(inner), MarketConfig::default());

        let err = dispatcher
            .invoke("addProduct", &args(&["P1", "Widget", "9.99", "10", "2"]))
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::Ledger {
                operation: Some("addProduct"),
                key: "product0".into(),
                reason: "disk full".into(),
            }
        );
        assert_eq!(
            err.to_string(),
            "addProduct: ledger i/o failure on 'product0': disk full"
        );
        assert_eq!(dispatcher.ledger().0.get("productsLength").unwrap(), b"0");
    }
}
