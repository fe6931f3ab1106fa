//! # Ledger Contract Adapter
//!
//! Binds the [`LedgerService`] to the promise runtime: decodes wire
//! arguments, enforces the gas policy, schedules receiver notifications
//! with their settlement callbacks, and publishes protocol events.
//!
//! ## Security
//!
//! - The transfer sender is always the runtime-authenticated caller;
//!   nothing in the payload can speak for another account
//! - `handle_notify_result` accepts only the ledger's own callback
//!   receipts, so an external call can never settle a transfer

use crate::service::{LedgerConfig, LedgerService, SendOutcome};

use async_trait::async_trait;
use promise_bus::call::{CallContext, CallFailure, PromiseResult};
use promise_bus::contract::{CallbackSpec, ChangeOutcome, Contract, OutgoingCall};
use promise_bus::events::ProtocolEvent;
use promise_bus::publisher::{EventPublisher, InMemoryEventBus};
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::methods::{ledger as ledger_methods, receiver as receiver_methods};
use shared_types::{AccountId, Balance, NotifyResultArgs, OnTokenReceivedArgs, TransferId};
use std::sync::Arc;
use tracing::debug;

/// Arguments for `new`.
#[derive(Debug, Deserialize)]
struct NewArgs {
    owner_id: AccountId,
    #[serde(with = "shared_types::codec::balance_str")]
    total_supply: Balance,
}

/// Arguments for `send`.
#[derive(Debug, Deserialize)]
struct SendArgs {
    new_owner_id: AccountId,
    #[serde(with = "shared_types::codec::balance_str")]
    amount: Balance,
    #[serde(with = "shared_types::codec::hex_bytes", default)]
    message: Vec<u8>,
    #[serde(default = "default_notify")]
    notify: bool,
}

fn default_notify() -> bool {
    true
}

/// Arguments for balance views.
#[derive(Debug, Deserialize)]
struct OwnerArgs {
    owner_id: AccountId,
}

/// Arguments for `get_transfer_state`.
#[derive(Debug, Deserialize)]
struct TransferStateArgs {
    transfer_id: TransferId,
}

/// Arguments for `process_bytes`.
#[derive(Debug, Deserialize)]
struct ProcessBytesArgs {
    #[serde(with = "shared_types::codec::hex_bytes", default)]
    payload: Vec<u8>,
}

/// The ledger contract deployed on the runtime.
pub struct LedgerContract {
    service: Arc<LedgerService>,
    bus: Arc<InMemoryEventBus>,
}

impl LedgerContract {
    /// Create a ledger contract at `account`, publishing to `bus`.
    #[must_use]
    pub fn new(account: AccountId, config: LedgerConfig, bus: Arc<InMemoryEventBus>) -> Self {
        Self {
            service: Arc::new(LedgerService::new(account, config)),
            bus,
        }
    }

    /// The service backing this contract.
    #[must_use]
    pub fn service(&self) -> &Arc<LedgerService> {
        &self.service
    }

    fn parse<'de, T: Deserialize<'de>>(method: &str, args: &'de Value) -> Result<T, CallFailure> {
        T::deserialize(args).map_err(|err| CallFailure::invalid_args(method, err))
    }

    fn failure(&self, method: &str, err: impl std::fmt::Display) -> CallFailure {
        CallFailure::execution(self.service.account(), method, err)
    }

    async fn handle_send(
        &self,
        ctx: &CallContext,
        method: &str,
        args: &Value,
    ) -> Result<ChangeOutcome, CallFailure> {
        let args: SendArgs = Self::parse(method, args)?;
        let config = self.service.config();
        let ledger = self.service.account().clone();

        // Funds must not lock unless the notification and its callback
        // are both affordable.
        if args.notify {
            let needed = config.notify_gas.saturating_add(config.callback_gas);
            if !ctx.budget.can_cover(needed) {
                return Err(CallFailure::OutOfGas {
                    account: ledger,
                    method: method.to_string(),
                    needed,
                    remaining: ctx.budget.remaining(),
                });
            }
        }

        let outcome = self
            .service
            .send(
                ctx.caller.clone(),
                args.new_owner_id.clone(),
                args.amount,
                args.message.clone(),
                args.notify,
            )
            .map_err(|err| self.failure(method, err))?;
        let transfer_id = outcome.transfer_id();

        self.bus
            .publish(ProtocolEvent::TransferLocked {
                transfer_id,
                ledger: ledger.clone(),
                sender: ctx.caller.clone(),
                receiver: args.new_owner_id.clone(),
                amount: args.amount,
            })
            .await;

        match outcome {
            SendOutcome::Direct { .. } => {
                self.bus
                    .publish(ProtocolEvent::TransferCommitted {
                        transfer_id,
                        ledger,
                        sender: ctx.caller.clone(),
                        receiver: args.new_owner_id,
                        amount: args.amount,
                    })
                    .await;
                Ok(ChangeOutcome::value(json!({ "transfer_id": transfer_id })))
            }
            SendOutcome::NeedsNotify { .. } => {
                let notify_args = serde_json::to_value(OnTokenReceivedArgs {
                    sender_id: ctx.caller.clone(),
                    amount: args.amount,
                    message: args.message,
                })
                .map_err(|err| self.failure(method, err))?;
                let callback_args = serde_json::to_value(NotifyResultArgs { transfer_id })
                    .map_err(|err| self.failure(method, err))?;

                let call = OutgoingCall::new(
                    args.new_owner_id.clone(),
                    receiver_methods::ON_TOKEN_RECEIVED,
                    notify_args,
                    config.notify_gas,
                )
                .with_callback(CallbackSpec::new(
                    ledger_methods::HANDLE_NOTIFY_RESULT,
                    callback_args,
                    config.callback_gas,
                ));

                self.service
                    .mark_dispatched(transfer_id)
                    .map_err(|err| self.failure(method, err))?;
                self.bus
                    .publish(ProtocolEvent::TransferNotifyDispatched {
                        transfer_id,
                        ledger,
                        receiver: args.new_owner_id,
                    })
                    .await;

                Ok(ChangeOutcome::value(json!({ "transfer_id": transfer_id })).schedule(call))
            }
        }
    }

    async fn handle_notify_result(
        &self,
        ctx: &CallContext,
        method: &str,
        args: &Value,
    ) -> Result<ChangeOutcome, CallFailure> {
        if !ctx.is_self_call() || ctx.promise_result.is_none() {
            let err = crate::domain::errors::LedgerError::UnauthorizedCallback {
                caller: ctx.caller.clone(),
            };
            return Err(self.failure(method, err));
        }
        let args: NotifyResultArgs = Self::parse(method, args)?;

        let (accepted, reason) = match ctx.promise_result.as_ref() {
            Some(PromiseResult::Succeeded(_)) => (true, None),
            Some(PromiseResult::Failed(failure)) => (false, Some(failure.to_string())),
            None => (false, Some("no promise result attached".to_string())),
        };

        let settled = self
            .service
            .resolve_notify(args.transfer_id, accepted, reason.clone())
            .map_err(|err| self.failure(method, err))?;

        let ledger = self.service.account().clone();
        if accepted {
            self.bus
                .publish(ProtocolEvent::TransferCommitted {
                    transfer_id: settled.id,
                    ledger,
                    sender: settled.sender,
                    receiver: settled.receiver,
                    amount: settled.amount,
                })
                .await;
        } else {
            self.bus
                .publish(ProtocolEvent::TransferRolledBack {
                    transfer_id: settled.id,
                    ledger,
                    sender: settled.sender,
                    amount: settled.amount,
                    reason: reason.unwrap_or_default(),
                })
                .await;
        }
        Ok(ChangeOutcome::value(json!({ "committed": accepted })))
    }
}

#[async_trait]
impl Contract for LedgerContract {
    fn account_id(&self) -> &AccountId {
        self.service.account()
    }

    async fn handle_view(&self, method: &str, args: &Value) -> Result<Value, CallFailure> {
        match method {
            ledger_methods::GET_TOTAL_SUPPLY => {
                let supply = self
                    .service
                    .total_supply()
                    .map_err(|err| self.failure(method, err))?;
                Ok(json!(supply.to_string()))
            }
            ledger_methods::GET_BALANCE => {
                let args: OwnerArgs = Self::parse(method, args)?;
                let balance = self
                    .service
                    .balance_of(&args.owner_id)
                    .map_err(|err| self.failure(method, err))?;
                Ok(json!(balance.to_string()))
            }
            ledger_methods::GET_LOCKED_BALANCE => {
                let args: OwnerArgs = Self::parse(method, args)?;
                let locked = self
                    .service
                    .locked_balance_of(&args.owner_id)
                    .map_err(|err| self.failure(method, err))?;
                Ok(json!(locked.to_string()))
            }
            ledger_methods::GET_ROLLBACK_COUNT => {
                let count = self
                    .service
                    .rollback_count()
                    .map_err(|err| self.failure(method, err))?;
                Ok(json!(count))
            }
            ledger_methods::GET_TRANSFER_STATE => {
                let args: TransferStateArgs = Self::parse(method, args)?;
                let state = self
                    .service
                    .transfer_state(args.transfer_id)
                    .map_err(|err| self.failure(method, err))?;
                Ok(json!(state))
            }
            _ => Err(CallFailure::MethodNotFound {
                account: self.service.account().clone(),
                method: method.to_string(),
            }),
        }
    }

    async fn handle_change(
        &self,
        ctx: &CallContext,
        method: &str,
        args: &Value,
    ) -> Result<ChangeOutcome, CallFailure> {
        debug!(ledger = %self.service.account(), caller = %ctx.caller, method, "Ledger call");
        match method {
            ledger_methods::NEW => {
                let args: NewArgs = Self::parse(method, args)?;
                self.service
                    .initialize(args.owner_id, args.total_supply)
                    .map_err(|err| self.failure(method, err))?;
                Ok(ChangeOutcome::unit())
            }
            ledger_methods::SEND => self.handle_send(ctx, method, args).await,
            ledger_methods::HANDLE_NOTIFY_RESULT => {
                self.handle_notify_result(ctx, method, args).await
            }
            ledger_methods::PROCESS_BYTES => {
                let args: ProcessBytesArgs = Self::parse(method, args)?;
                let total = self
                    .service
                    .process_bytes(&args.payload)
                    .map_err(|err| self.failure(method, err))?;
                Ok(ChangeOutcome::value(json!(total)))
            }
            // Views stay callable through change receipts.
            _ => self
                .handle_view(method, args)
                .await
                .map(ChangeOutcome::value),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
