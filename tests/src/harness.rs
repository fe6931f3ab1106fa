//! # Protocol Test Harness
//!
//! Runtime and contract fixtures shared by every integration test: a
//! ledger and a pool deployed on one [`PromiseRuntime`], plus helpers that
//! hide the wire encoding (decimal-string balances, hex messages) behind
//! plain numbers.

use async_trait::async_trait;
use parking_lot::RwLock;
use pool_receiver::PoolContract;
use promise_bus::call::{CallContext, CallFailure, PromiseResult};
use promise_bus::contract::{ChangeOutcome, Contract};
use promise_bus::runtime::PromiseRuntime;
use serde_json::{json, Value};
use shared_types::methods::{ledger as ledger_methods, receiver as receiver_methods};
use shared_types::wire::OnTokenReceivedArgs;
use shared_types::AccountId;
use std::sync::Arc;
use token_ledger::{LedgerConfig, LedgerContract};

/// Account the primary ledger is deployed at.
pub const LEDGER: &str = "token";
/// Account a second, unrelated ledger is deployed at when a test needs one.
pub const SECOND_LEDGER: &str = "token-b";
/// Account the pool receiver is deployed at.
pub const POOL: &str = "pool";
/// Owner seeded with the full supply in the standard fixture.
pub const OWNER: &str = "vitalik";
/// Supply used by the standard fixture.
pub const SUPPLY: u128 = 10_000;

/// Build a valid account id or panic; test input is trusted.
pub fn account(name: &str) -> AccountId {
    AccountId::new(name).unwrap_or_else(|err| panic!("bad test account {name:?}: {err}"))
}

/// Install a subscriber that honors `RUST_LOG`; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Parse a decimal-string balance out of a view result.
pub fn parse_balance(value: &Value) -> u128 {
    value
        .as_str()
        .unwrap_or_else(|| panic!("balance view returned non-string: {value}"))
        .parse()
        .unwrap_or_else(|err| panic!("balance view returned non-decimal {value}: {err}"))
}

/// A contract exposing no methods at all. Notifying it fails with
/// `MethodNotFound`, which a ledger must treat as rejection. Attempted
/// methods are recorded so tests can prove the call reached the contract.
pub struct NoopContract {
    account: AccountId,
    calls: RwLock<Vec<String>>,
}

impl NoopContract {
    /// Create a method-less contract at `name`.
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            account: account(name),
            calls: RwLock::new(Vec::new()),
        })
    }

    /// Methods callers tried to invoke, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().clone()
    }

    fn refuse(&self, method: &str) -> CallFailure {
        self.calls.write().push(method.to_string());
        CallFailure::MethodNotFound {
            account: self.account.clone(),
            method: method.to_string(),
        }
    }
}

#[async_trait]
impl Contract for NoopContract {
    fn account_id(&self) -> &AccountId {
        &self.account
    }

    async fn handle_view(&self, method: &str, _args: &Value) -> Result<Value, CallFailure> {
        Err(self.refuse(method))
    }

    async fn handle_change(
        &self,
        _ctx: &CallContext,
        method: &str,
        _args: &Value,
    ) -> Result<ChangeOutcome, CallFailure> {
        Err(self.refuse(method))
    }
}

/// A receiver that accepts every deposit and keeps the notification
/// arguments it saw, so tests can inspect what actually crossed the wire.
pub struct RecordingReceiver {
    account: AccountId,
    deposits: RwLock<Vec<OnTokenReceivedArgs>>,
}

impl RecordingReceiver {
    /// Create an accept-all receiver at `name`.
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            account: account(name),
            deposits: RwLock::new(Vec::new()),
        })
    }

    /// Every notification received so far, oldest first.
    pub fn deposits(&self) -> Vec<OnTokenReceivedArgs> {
        self.deposits.read().clone()
    }
}

#[async_trait]
impl Contract for RecordingReceiver {
    fn account_id(&self) -> &AccountId {
        &self.account
    }

    async fn handle_view(&self, method: &str, _args: &Value) -> Result<Value, CallFailure> {
        match method {
            receiver_methods::IS_RECEIVER => Ok(json!(true)),
            _ => Err(CallFailure::MethodNotFound {
                account: self.account.clone(),
                method: method.to_string(),
            }),
        }
    }

    async fn handle_change(
        &self,
        _ctx: &CallContext,
        method: &str,
        args: &Value,
    ) -> Result<ChangeOutcome, CallFailure> {
        match method {
            receiver_methods::ON_TOKEN_RECEIVED => {
                let args: OnTokenReceivedArgs = serde_json::from_value(args.clone())
                    .map_err(|err| CallFailure::invalid_args(method, err))?;
                self.deposits.write().push(args);
                Ok(ChangeOutcome::value(json!(true)))
            }
            _ => Err(CallFailure::MethodNotFound {
                account: self.account.clone(),
                method: method.to_string(),
            }),
        }
    }
}

/// A ledger and a pool on one runtime.
pub struct ProtocolHarness {
    /// The runtime both contracts are deployed on.
    pub runtime: PromiseRuntime,
    ledger: Arc<LedgerContract>,
    pool: Arc<PoolContract>,
}

impl ProtocolHarness {
    /// Deploy an uninitialized ledger at [`LEDGER`] and pool at [`POOL`].
    pub async fn deploy() -> Self {
        init_tracing();
        let runtime = PromiseRuntime::new();
        let ledger = Arc::new(LedgerContract::new(
            account(LEDGER),
            LedgerConfig::default(),
            runtime.bus(),
        ));
        let pool = Arc::new(PoolContract::new(account(POOL), runtime.bus()));
        runtime.register(ledger.clone()).await.unwrap();
        runtime.register(pool.clone()).await.unwrap();
        Self {
            runtime,
            ledger,
            pool,
        }
    }

    /// Deploy and initialize: [`OWNER`] holds [`SUPPLY`], the pool trusts
    /// the primary ledger.
    pub async fn standard() -> Self {
        let harness = Self::deploy().await;
        harness.initialize_ledger(OWNER, SUPPLY).await;
        harness.initialize_pool_against(LEDGER).await;
        harness
    }

    /// The ledger contract fixture.
    pub fn ledger(&self) -> &Arc<LedgerContract> {
        &self.ledger
    }

    /// The pool contract fixture.
    pub fn pool(&self) -> &Arc<PoolContract> {
        &self.pool
    }

    /// Run `new` on the primary ledger.
    pub async fn initialize_ledger(&self, owner: &str, supply: u128) {
        let result = self
            .execute(
                "deployer",
                LEDGER,
                ledger_methods::NEW,
                json!({ "owner_id": owner, "total_supply": supply.to_string() }),
            )
            .await;
        assert!(result.is_success(), "ledger init failed: {result:?}");
    }

    /// Run `new` on the pool, binding it to `token`.
    pub async fn initialize_pool_against(&self, token: &str) {
        let result = self
            .execute(
                "deployer",
                POOL,
                receiver_methods::NEW,
                json!({ "token_id": token }),
            )
            .await;
        assert!(result.is_success(), "pool init failed: {result:?}");
    }

    /// Deploy and initialize a second ledger at [`SECOND_LEDGER`].
    pub async fn deploy_second_ledger(&self, owner: &str, supply: u128) -> Arc<LedgerContract> {
        let ledger = Arc::new(LedgerContract::new(
            account(SECOND_LEDGER),
            LedgerConfig::default(),
            self.runtime.bus(),
        ));
        self.runtime.register(ledger.clone()).await.unwrap();
        let result = self
            .execute(
                "deployer",
                SECOND_LEDGER,
                ledger_methods::NEW,
                json!({ "owner_id": owner, "total_supply": supply.to_string() }),
            )
            .await;
        assert!(result.is_success(), "second ledger init failed: {result:?}");
        ledger
    }

    /// Register a method-less contract at `name`.
    pub async fn deploy_noop(&self, name: &str) -> Arc<NoopContract> {
        let noop = NoopContract::new(name);
        self.runtime.register(noop.clone()).await.unwrap();
        noop
    }

    /// Register an accept-all recording receiver at `name`.
    pub async fn deploy_recorder(&self, name: &str) -> Arc<RecordingReceiver> {
        let recorder = RecordingReceiver::new(name);
        self.runtime.register(recorder.clone()).await.unwrap();
        recorder
    }

    /// Submit a change call and drain the runtime to quiescence.
    pub async fn execute(
        &self,
        caller: &str,
        target: &str,
        method: &str,
        args: Value,
    ) -> PromiseResult {
        self.runtime
            .execute(account(caller), account(target), method, args)
            .await
            .unwrap()
    }

    /// `send` on the primary ledger with the notification protocol.
    pub async fn send(&self, sender: &str, receiver: &str, amount: u128) -> PromiseResult {
        self.execute(
            sender,
            LEDGER,
            ledger_methods::SEND,
            json!({ "new_owner_id": receiver, "amount": amount.to_string() }),
        )
        .await
    }

    /// `send` on the primary ledger settling directly, without notify.
    pub async fn send_plain(&self, sender: &str, receiver: &str, amount: u128) -> PromiseResult {
        self.execute(
            sender,
            LEDGER,
            ledger_methods::SEND,
            json!({
                "new_owner_id": receiver,
                "amount": amount.to_string(),
                "notify": false,
            }),
        )
        .await
    }

    /// Run a view method.
    pub async fn view(&self, target: &str, method: &str, args: Value) -> Value {
        self.runtime
            .view(&account(target), method, args)
            .await
            .unwrap_or_else(|err| panic!("view {target}::{method} failed: {err}"))
    }

    /// `get_balance` on the primary ledger.
    pub async fn balance(&self, owner: &str) -> u128 {
        let value = self
            .view(
                LEDGER,
                ledger_methods::GET_BALANCE,
                json!({ "owner_id": owner }),
            )
            .await;
        parse_balance(&value)
    }

    /// `get_locked_balance` on the primary ledger.
    pub async fn locked_balance(&self, owner: &str) -> u128 {
        let value = self
            .view(
                LEDGER,
                ledger_methods::GET_LOCKED_BALANCE,
                json!({ "owner_id": owner }),
            )
            .await;
        parse_balance(&value)
    }

    /// `get_total_supply` on the primary ledger.
    pub async fn total_supply(&self) -> u128 {
        let value = self
            .view(LEDGER, ledger_methods::GET_TOTAL_SUPPLY, json!({}))
            .await;
        parse_balance(&value)
    }

    /// `get_rollback_count` on the primary ledger.
    pub async fn rollback_count(&self) -> u64 {
        let value = self
            .view(LEDGER, ledger_methods::GET_ROLLBACK_COUNT, json!({}))
            .await;
        value.as_u64().expect("rollback count is an integer")
    }

    /// `get_total_received` on the pool.
    pub async fn pool_total_received(&self) -> u128 {
        let value = self
            .view(POOL, receiver_methods::GET_TOTAL_RECEIVED, json!({}))
            .await;
        parse_balance(&value)
    }

    /// Check the ledger's bookkeeping invariants at a quiescent point.
    pub fn assert_conserved(&self) {
        assert_eq!(self.runtime.pending_receipts(), 0, "runtime not quiescent");
        self.ledger
            .service()
            .check_invariants()
            .expect("ledger invariants hold at quiescence");
    }
}
