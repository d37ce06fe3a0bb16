// LDK Bridge: loader and method dispatcher for the native LDK node library.
// Written in 2023 by
//     LDK Bridge developers
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the MIT License
// along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

use std::sync::Arc;

use ldk_bridge_rpc::{ChannelName, Failure, FailureCode, MethodCall, Reply, Request, Value};

use crate::binding::Binding;
use crate::DispatchError;

/// Synchronous request/response bridge for named calls.
///
/// Implementations keep no per-call state; each call is independent and runs
/// to completion or failure. An `Ok(None)` result means the method succeeded
/// without returning a value and is never used to mask a failure.
pub trait Dispatch {
    fn dispatch(&self, call: MethodCall) -> Result<Option<Value>, DispatchError>;

    fn invoke(&self, method: &str, args: Option<Value>) -> Result<Option<Value>, DispatchError> {
        self.dispatch(MethodCall { method: method.to_owned(), args })
    }

    /// Invokes a method expected to return a string or nothing.
    fn invoke_str(
        &self,
        method: &str,
        args: Option<Value>,
    ) -> Result<Option<String>, DispatchError> {
        match self.invoke(method, args)? {
            None => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s)),
            Some(other) => Err(DispatchError::UnexpectedReply {
                method: method.to_owned(),
                expected: "str",
                found: other.type_name(),
            }),
        }
    }
}

impl<D> Dispatch for &D
where
    D: Dispatch + ?Sized,
{
    fn dispatch(&self, call: MethodCall) -> Result<Option<Value>, DispatchError> {
        (**self).dispatch(call)
    }
}

impl<D> Dispatch for Box<D>
where
    D: Dispatch + ?Sized,
{
    fn dispatch(&self, call: MethodCall) -> Result<Option<Value>, DispatchError> {
        (**self).dispatch(call)
    }
}

impl<D> Dispatch for Arc<D>
where
    D: Dispatch + ?Sized,
{
    fn dispatch(&self, call: MethodCall) -> Result<Option<Value>, DispatchError> {
        (**self).dispatch(call)
    }
}

/// Dispatcher forwarding calls to the native library through its binding.
#[derive(Clone, Debug)]
pub struct NativeDispatcher {
    binding: Binding,
    channel: ChannelName,
}

impl NativeDispatcher {
    pub fn new(binding: Binding, channel: ChannelName) -> NativeDispatcher {
        NativeDispatcher { binding, channel }
    }

    pub fn binding(&self) -> &Binding { &self.binding }

    pub fn channel(&self) -> &ChannelName { &self.channel }
}

impl Dispatch for NativeDispatcher {
    fn dispatch(&self, call: MethodCall) -> Result<Option<Value>, DispatchError> {
        let method = call.method.clone();
        let request = Request { channel: self.channel.clone(), call };
        debug!("Dispatching {}", request);

        let reply = self.binding.call(&method, &request.encode()?)?;
        match Reply::decode(reply)? {
            Reply::Success(value) => {
                trace!("Native method `{}` succeeded", method);
                Ok(value)
            }
            Reply::Failure(Failure { code: FailureCode::NotImplemented, .. }) => {
                warn!("Native side does not implement `{}`", method);
                Err(DispatchError::NotImplemented(method))
            }
            Reply::Failure(failure) => {
                debug!("Native method `{}` failed: {}", method, failure);
                Err(DispatchError::Rejected { method, failure })
            }
        }
    }
}

#[cfg(all(test, unix))]
pub(crate) mod test {
    use std::slice;

    use super::*;
    use crate::api::{ChannelConfig, NodeBuilder};
    use crate::binding::test::{bind, hand_out};

    pub(crate) const NODE_ID: &str =
        "02eec7245d6b7d2ccb30380bfbe2a3648cd7a942653f5aa340edcea1f283686619";
    pub(crate) const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon \
                                       abandon abandon abandon abandon abandon abandon abandon \
                                       abandon abandon abandon abandon abandon abandon abandon \
                                       abandon abandon art";
    pub(crate) const ADDRESS: &str = "bcrt1qw508d6qejxtdg4y5r3zarvary0c5xw7kygt080";
    pub(crate) const TXID: &str =
        "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";
    pub(crate) const PAYMENT_HASH: &str =
        "6f7a8b1c2d3e4f5061728394a5b6c7d8e9f00112233445566778899aabbccdd";
    pub(crate) const EVENT: &str = r#"{"type":"channel_ready","channel_id":"0a0b"}"#;
    pub(crate) const PEER: &str = r#"{
        "node_id": "02eec7245d6b7d2ccb30380bfbe2a3648cd7a942653f5aa340edcea1f283686619",
        "address": "127.0.0.1:9735",
        "is_persisted": true,
        "is_connected": true
    }"#;
    pub(crate) const CHANNEL: &str = r#"{
        "channel_id": "0a0b",
        "counterparty_node_id": "02eec7245d6b7d2ccb30380bfbe2a3648cd7a942653f5aa340edcea1f283686619",
        "funding_txo": null,
        "channel_value_sats": 100000,
        "outbound_capacity_msat": 90000000,
        "inbound_capacity_msat": 0,
        "confirmations": 3,
        "is_outbound": true,
        "is_channel_ready": true,
        "is_usable": true,
        "is_public": false
    }"#;
    pub(crate) const PAYMENT: &str = r#"{
        "hash": "6f7a8b1c2d3e4f5061728394a5b6c7d8e9f00112233445566778899aabbccdd",
        "preimage": null,
        "secret": null,
        "amount_msat": 21000,
        "direction": "outbound",
        "status": "succeeded"
    }"#;

    /// Stand-in for the native node library
    pub(crate) unsafe extern "C" fn node(
        req: *const u8,
        req_len: usize,
        out: *mut *mut u8,
        out_len: *mut usize,
    ) -> i32 {
        let request = match Request::decode(slice::from_raw_parts(req, req_len)) {
            Ok(request) => request,
            Err(_) => return 1,
        };
        let call = request.call;
        let reply = match (call.method.as_str(), call.args) {
            ("generate_entropy_mnemonic", None) => Reply::success(MNEMONIC),
            ("build_node", Some(Value::Str(doc))) => {
                match serde_json::from_str::<NodeBuilder>(&doc) {
                    Ok(builder) if builder.chain_source.is_some() => Reply::Success(None),
                    Ok(_) => Failure::invalid_argument("chain source is required").into(),
                    Err(err) => Failure::invalid_argument(err).into(),
                }
            }
            ("node_id", None) => Reply::success(NODE_ID),
            ("start" | "stop" | "sync_wallets" | "event_handled", None) => Reply::Success(None),
            ("next_event", None) => Reply::Success(None),
            ("wait_until_next_event", None) => Reply::success(EVENT),
            ("listening_address", None) => Reply::success("0.0.0.0:9735"),
            ("new_onchain_address", None) => Reply::success(ADDRESS),
            ("spendable_onchain_balance_sats", None) => Reply::success(50_000u64),
            ("total_onchain_balance_sats", None) => Reply::success("lots"),
            ("send_to_onchain_address", Some(Value::List(args))) => match args.as_slice() {
                [Value::Str(_), Value::Uint(amount)] if *amount > 0 => Reply::success(TXID),
                _ => Failure::invalid_argument("address and amount expected").into(),
            },
            ("send_all_to_onchain_address", Some(Value::Str(_))) => Reply::success(TXID),
            ("connect", Some(Value::List(args))) => match args.as_slice() {
                [Value::Str(_), Value::Str(_), Value::Bool(_)] => Reply::Success(None),
                _ => Failure::invalid_argument("node id, address and persist flag expected").into(),
            },
            ("disconnect", Some(Value::Str(node_id))) if node_id == NODE_ID => Reply::Success(None),
            ("disconnect", Some(Value::Str(_))) => Failure::invalid_argument("unknown peer").into(),
            ("list_peers", None) => Reply::success(Value::List(vec![Value::from(PEER)])),
            ("connect_open_channel", Some(Value::List(args))) => match args.as_slice() {
                [
                    Value::Str(_),
                    Value::Str(_),
                    Value::Uint(_),
                    Value::Uint(_),
                    Value::Bool(_),
                    Value::Str(config),
                ] => match serde_json::from_str::<Option<ChannelConfig>>(config) {
                    Ok(_) => Reply::Success(None),
                    Err(err) => Failure::invalid_argument(err).into(),
                },
                _ => Failure::invalid_argument("channel parameters expected").into(),
            },
            ("close_channel", Some(Value::List(args))) if args.len() == 2 => Reply::Success(None),
            ("update_channel_config", Some(Value::List(args))) => match args.as_slice() {
                [Value::Str(_), Value::Str(_), Value::Str(config)] => {
                    match serde_json::from_str::<ChannelConfig>(config) {
                        Ok(_) => Reply::Success(None),
                        Err(err) => Failure::invalid_argument(err).into(),
                    }
                }
                _ => Failure::invalid_argument("channel id, node id and config expected").into(),
            },
            ("list_channels", None) => Reply::success(Value::List(vec![Value::from(CHANNEL)])),
            ("receive_payment", Some(Value::List(args))) => match args.as_slice() {
                [Value::Uint(amount), Value::Str(description), Value::Uint(_)] => {
                    Reply::success(format!("lnbcrt{}n1{}", amount / 100, description))
                }
                _ => Failure::invalid_argument("amount, description and expiry expected").into(),
            },
            ("receive_variable_amount_payment", Some(Value::List(args))) => {
                match args.as_slice() {
                    [Value::Str(description), Value::Uint(_)] => {
                        Reply::success(format!("lnbcrt1{}", description))
                    }
                    _ => Failure::invalid_argument("description and expiry expected").into(),
                }
            }
            ("send_payment_using_amount", Some(Value::List(args))) => match args.as_slice() {
                [Value::Str(_), Value::Uint(_)] => Reply::success(PAYMENT_HASH),
                _ => Failure::invalid_argument("invoice and amount expected").into(),
            },
            ("payment", Some(Value::Str(hash))) if hash == PAYMENT_HASH => Reply::success(PAYMENT),
            ("payment", Some(Value::Str(_))) => Reply::Success(None),
            ("remove_payment", Some(Value::Str(hash))) => Reply::success(hash == PAYMENT_HASH),
            ("list_payments", None) => Reply::success(Value::List(vec![Value::from(PAYMENT)])),
            ("list_payments_with_filter", Some(Value::Str(direction))) => {
                let payments = match direction.as_str() {
                    "outbound" => vec![Value::from(PAYMENT)],
                    _ => vec![],
                };
                Reply::success(Value::List(payments))
            }
            ("verify_signature", Some(Value::List(args))) => Reply::success(args.len() == 3),
            ("crash", _) => return 13,
            (method, _) => Failure::not_implemented(method).into(),
        };
        match reply.encode() {
            Ok(data) => {
                hand_out(data, out, out_len);
                0
            }
            Err(_) => 2,
        }
    }

    pub(crate) fn native_node() -> NativeDispatcher {
        NativeDispatcher::new(bind(node), ChannelName::default())
    }

    #[test]
    fn value_and_absence() {
        let dispatcher = native_node();
        assert_eq!(dispatcher.invoke_str("node_id", None).unwrap(), Some(NODE_ID.to_owned()));
        assert_eq!(dispatcher.invoke("sync_wallets", None).unwrap(), None);
    }

    #[test]
    fn unknown_method_is_an_error() {
        let err = native_node().invoke("open_sesame", None).unwrap_err();
        assert!(matches!(err, DispatchError::NotImplemented(ref method) if method == "open_sesame"));
    }

    #[test]
    fn rejected_arguments() {
        let err = native_node()
            .invoke("receive_payment", Some(Value::List(vec![Value::from(1u64)])))
            .unwrap_err();
        match err {
            DispatchError::Rejected { method, failure } => {
                assert_eq!(method, "receive_payment");
                assert_eq!(failure.code, FailureCode::InvalidArgument);
            }
            other => panic!("unexpected error {}", other),
        }
    }

    #[test]
    fn native_fault() {
        let err = native_node().invoke("crash", None).unwrap_err();
        assert!(matches!(err, DispatchError::Fault { status: 13, .. }));
    }

    #[test]
    fn wrong_result_type() {
        let err = native_node().invoke_str("spendable_onchain_balance_sats", None).unwrap_err();
        assert!(matches!(err, DispatchError::UnexpectedReply { expected: "str", found: "uint", .. }));
    }
}
