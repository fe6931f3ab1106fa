//! # Promise Runtime
//!
//! Deterministic in-memory execution environment for contracts.
//!
//! ```text
//!  submit()                ┌────────────────────┐
//!  ─────────▶ receipt ────▶│   FIFO receipt     │──▶ handle_change()
//!                          │      queue         │        │
//!            callback ◀────│                    │◀── OutgoingCall(s)
//!            receipt       └────────────────────┘
//! ```
//!
//! Each receipt executes to completion before the next is popped, so a
//! single invocation is atomic with respect to every other invocation.
//! Between receipts the world is quiescent and invariants are checkable.
//!
//! ## Callback delivery
//!
//! When a scheduled call carries a callback, the runtime enqueues exactly
//! one callback receipt after the call settles, whatever the outcome:
//! success, trap, missing account, missing method, or exhausted gas. The
//! callback's gas was reserved at schedule time, so the callee cannot
//! starve it.

use crate::call::{CallContext, CallFailure, PromiseResult};
use crate::config::RuntimeConfig;
use crate::contract::{Contract, OutgoingCall};
use crate::events::{EventFilter, ProtocolEvent};
use crate::gas::{Gas, GasBudget};
use crate::publisher::{EventPublisher, InMemoryEventBus};
use crate::subscriber::Subscription;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use shared_types::AccountId;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Errors from runtime operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// An account can host at most one contract.
    #[error("a contract is already registered at {account}")]
    DuplicateContract {
        /// The occupied account.
        account: AccountId,
    },

    /// The drain guard tripped.
    #[error("receipt limit {limit} exceeded in a single drain")]
    ReceiptLimitExceeded {
        /// The configured bound.
        limit: u64,
    },

    /// A settled call left no recorded outcome.
    #[error("no recorded outcome for call {call_id}")]
    OutcomeMissing {
        /// The unresolvable call.
        call_id: Uuid,
    },

    /// Configuration failed validation.
    #[error("invalid runtime config: {detail}")]
    InvalidConfig {
        /// What was wrong.
        detail: String,
    },
}

/// Counters describing runtime activity.
#[derive(Debug, Default, Clone)]
pub struct RuntimeStats {
    /// Change receipts executed.
    pub receipts_executed: u64,
    /// View calls served.
    pub views_served: u64,
    /// Callback receipts executed.
    pub callbacks_delivered: u64,
    /// Receipts that settled as failures.
    pub calls_failed: u64,
    /// Total gas charged across all receipts.
    pub gas_charged: Gas,
}

/// A queued invocation.
struct Receipt {
    call_id: Uuid,
    caller: AccountId,
    target: AccountId,
    method: String,
    args: Value,
    budget: GasBudget,
    promise_result: Option<PromiseResult>,
    on_completion: Option<CompletionHook>,
}

/// Callback to enqueue once the receipt carrying it settles.
struct CompletionHook {
    scheduler: AccountId,
    method: String,
    args: Value,
    budget: GasBudget,
}

/// The in-memory contract runtime.
pub struct PromiseRuntime {
    config: RuntimeConfig,
    contracts: RwLock<HashMap<AccountId, Arc<dyn Contract>>>,
    queue: Mutex<VecDeque<Receipt>>,
    outcomes: RwLock<HashMap<Uuid, PromiseResult>>,
    stats: RwLock<RuntimeStats>,
    bus: Arc<InMemoryEventBus>,
}

impl PromiseRuntime {
    /// Create a runtime with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config_unchecked(RuntimeConfig::default())
    }

    /// Create a runtime with a validated custom configuration.
    pub fn with_config(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        Ok(Self::from_config_unchecked(config))
    }

    fn from_config_unchecked(config: RuntimeConfig) -> Self {
        let bus = Arc::new(InMemoryEventBus::with_capacity(config.channel_capacity));
        Self {
            config,
            contracts: RwLock::new(HashMap::new()),
            queue: Mutex::new(VecDeque::new()),
            outcomes: RwLock::new(HashMap::new()),
            stats: RwLock::new(RuntimeStats::default()),
            bus,
        }
    }

    /// The runtime's configuration.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The event hub shared by the runtime and its contracts.
    #[must_use]
    pub fn bus(&self) -> Arc<InMemoryEventBus> {
        self.bus.clone()
    }

    /// Subscribe to protocol events.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.bus.subscribe(filter)
    }

    /// Current runtime counters.
    #[must_use]
    pub fn stats(&self) -> RuntimeStats {
        self.stats.read().clone()
    }

    /// Receipts waiting in the queue.
    #[must_use]
    pub fn pending_receipts(&self) -> usize {
        self.queue.lock().len()
    }

    /// Deploy a contract at its account.
    pub async fn register(&self, contract: Arc<dyn Contract>) -> Result<(), RuntimeError> {
        let account = contract.account_id().clone();
        {
            let mut contracts = self.contracts.write();
            if contracts.contains_key(&account) {
                return Err(RuntimeError::DuplicateContract { account });
            }
            contracts.insert(account.clone(), contract);
        }
        info!(account = %account, "Contract registered");
        self.bus
            .publish(ProtocolEvent::ContractRegistered { account })
            .await;
        Ok(())
    }

    /// Execute a read-only method immediately, outside the receipt queue.
    pub async fn view(
        &self,
        target: &AccountId,
        method: &str,
        args: Value,
    ) -> Result<Value, CallFailure> {
        let contract = self.contracts.read().get(target).cloned();
        let Some(contract) = contract else {
            return Err(CallFailure::AccountNotFound {
                account: target.clone(),
            });
        };
        let result = contract.handle_view(method, &args).await;
        self.stats.write().views_served += 1;
        result
    }

    /// Enqueue an external change call with the default gas attachment.
    ///
    /// Returns the call id; the outcome is available through
    /// [`PromiseRuntime::outcome_of`] after a drain.
    pub fn submit(
        &self,
        caller: AccountId,
        target: AccountId,
        method: &str,
        args: Value,
    ) -> Uuid {
        self.submit_with_gas(caller, target, method, args, self.config.default_attached_gas)
    }

    /// Enqueue an external change call with an explicit gas attachment.
    pub fn submit_with_gas(
        &self,
        caller: AccountId,
        target: AccountId,
        method: &str,
        args: Value,
        attached_gas: Gas,
    ) -> Uuid {
        let call_id = Uuid::new_v4();
        debug!(
            %call_id,
            caller = %caller,
            target = %target,
            method = %method,
            attached_gas,
            "External call submitted"
        );
        self.queue.lock().push_back(Receipt {
            call_id,
            caller,
            target,
            method: method.to_string(),
            args,
            budget: GasBudget::new(attached_gas),
            promise_result: None,
            on_completion: None,
        });
        call_id
    }

    /// The settled outcome of a call, if it has executed.
    #[must_use]
    pub fn outcome_of(&self, call_id: Uuid) -> Option<PromiseResult> {
        self.outcomes.read().get(&call_id).cloned()
    }

    /// Drain the receipt queue until it is empty.
    ///
    /// Returns the number of receipts executed. Aborts with
    /// [`RuntimeError::ReceiptLimitExceeded`] if a drain runs away, leaving
    /// the unexecuted receipts queued.
    pub async fn run_until_settled(&self) -> Result<u64, RuntimeError> {
        let limit = self.config.max_receipts_per_run;
        let mut executed = 0u64;
        loop {
            let next = self.queue.lock().pop_front();
            let Some(receipt) = next else { break };
            if executed >= limit {
                warn!(limit, "Receipt limit reached; a contract is scheduling in a loop");
                self.queue.lock().push_front(receipt);
                return Err(RuntimeError::ReceiptLimitExceeded { limit });
            }
            executed += 1;
            self.execute_receipt(receipt).await;
        }
        Ok(executed)
    }

    /// Submit a call, drain to quiescence, and return the call's outcome.
    pub async fn execute(
        &self,
        caller: AccountId,
        target: AccountId,
        method: &str,
        args: Value,
    ) -> Result<PromiseResult, RuntimeError> {
        let call_id = self.submit(caller, target, method, args);
        self.run_until_settled().await?;
        self.outcome_of(call_id)
            .ok_or(RuntimeError::OutcomeMissing { call_id })
    }

    async fn execute_receipt(&self, receipt: Receipt) {
        let Receipt {
            call_id,
            caller,
            target,
            method,
            args,
            mut budget,
            promise_result,
            on_completion,
        } = receipt;
        let is_callback = promise_result.is_some();

        debug!(%call_id, caller = %caller, target = %target, method = %method, "Dispatching receipt");
        self.bus
            .publish(ProtocolEvent::CallDispatched {
                call_id,
                caller: caller.clone(),
                target: target.clone(),
                method: method.clone(),
            })
            .await;

        let mut charged: Gas = 0;
        let contract = self.contracts.read().get(&target).cloned();
        let outcome = match contract {
            None => PromiseResult::Failed(CallFailure::AccountNotFound {
                account: target.clone(),
            }),
            Some(contract) => match budget.try_charge(self.config.base_call_cost) {
                Err(exhausted) => PromiseResult::Failed(CallFailure::OutOfGas {
                    account: target.clone(),
                    method: method.clone(),
                    needed: exhausted.needed,
                    remaining: exhausted.remaining,
                }),
                Ok(()) => {
                    charged += self.config.base_call_cost;
                    let ctx = CallContext {
                        call_id,
                        caller: caller.clone(),
                        contract: target.clone(),
                        budget,
                        promise_result: promise_result.clone(),
                    };
                    match contract.handle_change(&ctx, &method, &args).await {
                        Err(failure) => PromiseResult::Failed(failure),
                        Ok(change) => {
                            match self.schedule_outgoing(&target, &method, &mut budget, change.outgoing)
                            {
                                Err(failure) => PromiseResult::Failed(failure),
                                Ok(scheduled_gas) => {
                                    charged += scheduled_gas;
                                    PromiseResult::Succeeded(change.result)
                                }
                            }
                        }
                    }
                }
            },
        };

        let error = outcome.failure().map(ToString::to_string);
        if let Some(detail) = &error {
            if is_callback {
                // A failed callback has no one left to notify.
                warn!(%call_id, target = %target, method = %method, error = %detail, "Callback receipt failed");
            } else {
                debug!(%call_id, target = %target, method = %method, error = %detail, "Receipt failed");
            }
        }

        {
            let mut stats = self.stats.write();
            stats.receipts_executed += 1;
            stats.gas_charged = stats.gas_charged.saturating_add(charged);
            if is_callback {
                stats.callbacks_delivered += 1;
            }
            if !outcome.is_success() {
                stats.calls_failed += 1;
            }
        }

        self.outcomes.write().insert(call_id, outcome.clone());
        self.bus
            .publish(ProtocolEvent::CallResolved {
                call_id,
                target: target.clone(),
                method: method.clone(),
                success: outcome.is_success(),
                error,
            })
            .await;

        if let Some(hook) = on_completion {
            let callback_call_id = Uuid::new_v4();
            self.bus
                .publish(ProtocolEvent::CallbackScheduled {
                    parent_call_id: call_id,
                    callback_call_id,
                    scheduler: hook.scheduler.clone(),
                    method: hook.method.clone(),
                })
                .await;
            self.queue.lock().push_back(Receipt {
                call_id: callback_call_id,
                caller: hook.scheduler.clone(),
                target: hook.scheduler,
                method: hook.method,
                args: hook.args,
                budget: hook.budget,
                promise_result: Some(outcome),
                on_completion: None,
            });
        }
    }

    /// Charge the scheduling receipt for its outgoing calls, then enqueue
    /// them. All-or-nothing: on an insufficient budget nothing is queued.
    fn schedule_outgoing(
        &self,
        scheduler: &AccountId,
        parent_method: &str,
        budget: &mut GasBudget,
        outgoing: Vec<OutgoingCall>,
    ) -> Result<Gas, CallFailure> {
        if outgoing.is_empty() {
            return Ok(0);
        }
        let total = outgoing
            .iter()
            .fold(0u64, |acc, call| acc.saturating_add(call.total_gas()));
        budget.try_charge(total).map_err(|exhausted| CallFailure::OutOfGas {
            account: scheduler.clone(),
            method: parent_method.to_string(),
            needed: exhausted.needed,
            remaining: exhausted.remaining,
        })?;

        let mut queue = self.queue.lock();
        for call in outgoing {
            let OutgoingCall {
                target,
                method,
                args,
                attached_gas,
                callback,
            } = call;
            let hook = callback.map(|cb| CompletionHook {
                scheduler: scheduler.clone(),
                method: cb.method,
                args: cb.args,
                budget: GasBudget::new(cb.reserved_gas),
            });
            debug!(caller = %scheduler, target = %target, method = %method, "Scheduling cross-contract call");
            queue.push_back(Receipt {
                call_id: Uuid::new_v4(),
                caller: scheduler.clone(),
                target,
                method,
                args,
                budget: GasBudget::new(attached_gas),
                promise_result: None,
                on_completion: hook,
            });
        }
        Ok(total)
    }
}

impl Default for PromiseRuntime {
    fn default() -> Self {
        Self::new()
    }
}
