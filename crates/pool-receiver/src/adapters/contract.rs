//! # Pool Contract Adapter
//!
//! Binds the [`PoolService`] to the promise runtime: decodes notification
//! arguments, authorizes against the runtime-authenticated caller, and
//! publishes deposit events.

use crate::service::PoolService;

use async_trait::async_trait;
use promise_bus::call::{CallContext, CallFailure};
use promise_bus::contract::{ChangeOutcome, Contract};
use promise_bus::events::ProtocolEvent;
use promise_bus::publisher::{EventPublisher, InMemoryEventBus};
use serde::Deserialize;
use serde_json::{json, Value};
use shared_types::methods::receiver as receiver_methods;
use shared_types::{AccountId, OnTokenReceivedArgs, TokenReceiver};
use std::sync::Arc;
use tracing::debug;

/// Arguments for `new`.
#[derive(Debug, Deserialize)]
struct NewArgs {
    token_id: AccountId,
}

/// The pool contract deployed on the runtime.
pub struct PoolContract {
    service: Arc<PoolService>,
    bus: Arc<InMemoryEventBus>,
}

impl PoolContract {
    /// Create a pool contract at `account`, publishing to `bus`.
    #[must_use]
    pub fn new(account: AccountId, bus: Arc<InMemoryEventBus>) -> Self {
        Self {
            service: Arc::new(PoolService::new(account)),
            bus,
        }
    }

    /// The service backing this contract.
    #[must_use]
    pub fn service(&self) -> &Arc<PoolService> {
        &self.service
    }

    fn parse<'de, T: Deserialize<'de>>(method: &str, args: &'de Value) -> Result<T, CallFailure> {
        T::deserialize(args).map_err(|err| CallFailure::invalid_args(method, err))
    }

    fn failure(&self, method: &str, err: impl std::fmt::Display) -> CallFailure {
        CallFailure::execution(self.service.account(), method, err)
    }
}

#[async_trait]
impl Contract for PoolContract {
    fn account_id(&self) -> &AccountId {
        self.service.account()
    }

    async fn handle_view(&self, method: &str, args: &Value) -> Result<Value, CallFailure> {
        match method {
            receiver_methods::IS_RECEIVER => Ok(json!(self.service.declares_support())),
            receiver_methods::GET_TOTAL_RECEIVED => {
                let total = self
                    .service
                    .total_received()
                    .map_err(|err| self.failure(method, err))?;
                Ok(json!(total.to_string()))
            }
            _ => {
                let _ = args;
                Err(CallFailure::MethodNotFound {
                    account: self.service.account().clone(),
                    method: method.to_string(),
                })
            }
        }
    }

    async fn handle_change(
        &self,
        ctx: &CallContext,
        method: &str,
        args: &Value,
    ) -> Result<ChangeOutcome, CallFailure> {
        debug!(pool = %self.service.account(), caller = %ctx.caller, method, "Pool call");
        match method {
            receiver_methods::NEW => {
                let args: NewArgs = Self::parse(method, args)?;
                self.service
                    .initialize(args.token_id)
                    .map_err(|err| self.failure(method, err))?;
                Ok(ChangeOutcome::unit())
            }
            receiver_methods::ON_TOKEN_RECEIVED => {
                let args: OnTokenReceivedArgs = Self::parse(method, args)?;
                // The notifying ledger is whoever the runtime says called,
                // not anything the payload claims.
                self.service
                    .accept(&ctx.caller, &args.sender_id, args.amount, &args.message)
                    .map_err(|err| self.failure(method, err))?;
                self.bus
                    .publish(ProtocolEvent::DepositAccepted {
                        pool: self.service.account().clone(),
                        ledger: ctx.caller.clone(),
                        sender: args.sender_id,
                        amount: args.amount,
                    })
                    .await;
                Ok(ChangeOutcome::value(json!(true)))
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
