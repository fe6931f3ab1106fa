//! # Contract Trait
//!
//! The seam between the runtime and contract implementations. A contract
//! is an account with code: the runtime routes receipts to it by account
//! id and method name, and collects the calls it wants scheduled next.

use crate::call::{CallContext, CallFailure};
use crate::gas::Gas;
use async_trait::async_trait;
use serde_json::Value;
use shared_types::AccountId;

/// A deployed contract reachable through the runtime.
///
/// Implementations use interior mutability: the runtime holds contracts
/// behind `Arc` and never takes `&mut self`.
#[async_trait]
pub trait Contract: Send + Sync {
    /// The account this contract is deployed at.
    fn account_id(&self) -> &AccountId;

    /// Execute a read-only method. Views run immediately, outside the
    /// receipt queue, and must not mutate state.
    async fn handle_view(&self, method: &str, args: &Value) -> Result<Value, CallFailure>;

    /// Execute a state-changing method. Returns the call's result plus
    /// any cross-contract calls to schedule. If the invocation fails,
    /// nothing is scheduled.
    async fn handle_change(
        &self,
        ctx: &CallContext,
        method: &str,
        args: &Value,
    ) -> Result<ChangeOutcome, CallFailure>;
}

/// A cross-contract call requested by an executing contract.
#[derive(Clone, Debug)]
pub struct OutgoingCall {
    /// Target account.
    pub target: AccountId,
    /// Method to invoke on the target.
    pub method: String,
    /// JSON arguments.
    pub args: Value,
    /// Gas granted to the target's receipt.
    pub attached_gas: Gas,
    /// Callback to deliver on the scheduling contract once the call
    /// settles.
    pub callback: Option<CallbackSpec>,
}

impl OutgoingCall {
    /// Create a call without a callback.
    #[must_use]
    pub fn new(target: AccountId, method: &str, args: Value, attached_gas: Gas) -> Self {
        Self {
            target,
            method: method.to_string(),
            args,
            attached_gas,
            callback: None,
        }
    }

    /// Attach a callback to deliver once this call settles.
    #[must_use]
    pub fn with_callback(mut self, callback: CallbackSpec) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Total gas this call removes from the scheduling receipt:
    /// the target's grant plus the callback reserve.
    #[must_use]
    pub fn total_gas(&self) -> Gas {
        let reserve = self.callback.as_ref().map_or(0, |cb| cb.reserved_gas);
        self.attached_gas.saturating_add(reserve)
    }
}

/// Completion hook for an [`OutgoingCall`].
///
/// The reserve is carved out of the scheduling receipt up front, so the
/// callback's delivery never depends on what the callee leaves behind.
#[derive(Clone, Debug)]
pub struct CallbackSpec {
    /// Method to invoke on the scheduling contract.
    pub method: String,
    /// JSON arguments, available alongside the settled outcome.
    pub args: Value,
    /// Gas set aside for the callback receipt.
    pub reserved_gas: Gas,
}

impl CallbackSpec {
    /// Create a callback spec.
    #[must_use]
    pub fn new(method: &str, args: Value, reserved_gas: Gas) -> Self {
        Self {
            method: method.to_string(),
            args,
            reserved_gas,
        }
    }
}

/// Result of a change-method invocation.
#[derive(Clone, Debug, Default)]
pub struct ChangeOutcome {
    /// Value recorded as the call's outcome.
    pub result: Value,
    /// Calls to schedule after this invocation commits.
    pub outgoing: Vec<OutgoingCall>,
}

impl ChangeOutcome {
    /// An outcome with no return value and no scheduled calls.
    #[must_use]
    pub fn unit() -> Self {
        Self::default()
    }

    /// An outcome carrying only a return value.
    #[must_use]
    pub fn value(result: Value) -> Self {
        Self {
            result,
            outgoing: Vec::new(),
        }
    }

    /// Add a call to schedule.
    #[must_use]
    pub fn schedule(mut self, call: OutgoingCall) -> Self {
        self.outgoing.push(call);
        self
    }
}
