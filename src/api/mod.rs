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

//! Typed API of the native node library.
//!
//! Each operation is a single named call through a [`Dispatch`]er; arguments
//! are marshalled into boundary values and results are checked against the
//! type the operation promises. Structured data is exchanged as JSON
//! documents (see [`types`]). Lightning semantics stay on the native side.

pub mod types;

use ldk_bridge_rpc::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use self::types::{
    ChainSource, ChannelConfig, ChannelDetails, EntropySource, GossipSource, Network,
    NodeBuilder, NodeConfig, PaymentDetails, PaymentDirection, PaymentStatus, PeerDetails,
};
use crate::dispatch::Dispatch;
use crate::DispatchError;

/// Method names exported by the native node library
pub mod method {
    pub const GENERATE_ENTROPY_MNEMONIC: &str = "generate_entropy_mnemonic";
    pub const BUILD_NODE: &str = "build_node";
    pub const START: &str = "start";
    pub const STOP: &str = "stop";
    pub const SYNC_WALLETS: &str = "sync_wallets";
    pub const NODE_ID: &str = "node_id";
    pub const LISTENING_ADDRESS: &str = "listening_address";
    pub const NEW_ONCHAIN_ADDRESS: &str = "new_onchain_address";
    pub const SPENDABLE_ONCHAIN_BALANCE_SATS: &str = "spendable_onchain_balance_sats";
    pub const TOTAL_ONCHAIN_BALANCE_SATS: &str = "total_onchain_balance_sats";
    pub const SEND_TO_ONCHAIN_ADDRESS: &str = "send_to_onchain_address";
    pub const SEND_ALL_TO_ONCHAIN_ADDRESS: &str = "send_all_to_onchain_address";
    pub const CONNECT: &str = "connect";
    pub const DISCONNECT: &str = "disconnect";
    pub const LIST_PEERS: &str = "list_peers";
    pub const CONNECT_OPEN_CHANNEL: &str = "connect_open_channel";
    pub const CLOSE_CHANNEL: &str = "close_channel";
    pub const UPDATE_CHANNEL_CONFIG: &str = "update_channel_config";
    pub const LIST_CHANNELS: &str = "list_channels";
    pub const RECEIVE_PAYMENT: &str = "receive_payment";
    pub const RECEIVE_VARIABLE_AMOUNT_PAYMENT: &str = "receive_variable_amount_payment";
    pub const SEND_PAYMENT: &str = "send_payment";
    pub const SEND_PAYMENT_USING_AMOUNT: &str = "send_payment_using_amount";
    pub const SEND_SPONTANEOUS_PAYMENT: &str = "send_spontaneous_payment";
    pub const PAYMENT: &str = "payment";
    pub const REMOVE_PAYMENT: &str = "remove_payment";
    pub const LIST_PAYMENTS: &str = "list_payments";
    pub const LIST_PAYMENTS_WITH_FILTER: &str = "list_payments_with_filter";
    pub const NEXT_EVENT: &str = "next_event";
    pub const WAIT_UNTIL_NEXT_EVENT: &str = "wait_until_next_event";
    pub const EVENT_HANDLED: &str = "event_handled";
    pub const SIGN_MESSAGE: &str = "sign_message";
    pub const VERIFY_SIGNATURE: &str = "verify_signature";

    pub const ALL: &[&str] = &[
        GENERATE_ENTROPY_MNEMONIC,
        BUILD_NODE,
        START,
        STOP,
        SYNC_WALLETS,
        NODE_ID,
        LISTENING_ADDRESS,
        NEW_ONCHAIN_ADDRESS,
        SPENDABLE_ONCHAIN_BALANCE_SATS,
        TOTAL_ONCHAIN_BALANCE_SATS,
        SEND_TO_ONCHAIN_ADDRESS,
        SEND_ALL_TO_ONCHAIN_ADDRESS,
        CONNECT,
        DISCONNECT,
        LIST_PEERS,
        CONNECT_OPEN_CHANNEL,
        CLOSE_CHANNEL,
        UPDATE_CHANNEL_CONFIG,
        LIST_CHANNELS,
        RECEIVE_PAYMENT,
        RECEIVE_VARIABLE_AMOUNT_PAYMENT,
        SEND_PAYMENT,
        SEND_PAYMENT_USING_AMOUNT,
        SEND_SPONTANEOUS_PAYMENT,
        PAYMENT,
        REMOVE_PAYMENT,
        LIST_PAYMENTS,
        LIST_PAYMENTS_WITH_FILTER,
        NEXT_EVENT,
        WAIT_UNTIL_NEXT_EVENT,
        EVENT_HANDLED,
        SIGN_MESSAGE,
        VERIFY_SIGNATURE,
    ];
}

fn unexpected(method: &str, expected: &'static str, found: Option<Value>) -> DispatchError {
    DispatchError::UnexpectedReply {
        method: method.to_owned(),
        expected,
        found: found.as_ref().map(Value::type_name).unwrap_or("nothing"),
    }
}

fn document(method: &str, data: &impl Serialize) -> Result<Value, DispatchError> {
    serde_json::to_string(data)
        .map(Value::Str)
        .map_err(|err| DispatchError::Arguments { method: method.to_owned(), details: err.to_string() })
}

fn record<T: DeserializeOwned>(method: &str, value: Value) -> Result<T, DispatchError> {
    let json = match value {
        Value::Str(json) => json,
        other => return Err(unexpected(method, "str", Some(other))),
    };
    serde_json::from_str(&json).map_err(|err| DispatchError::MalformedRecord {
        method: method.to_owned(),
        details: err.to_string(),
    })
}

pub struct NodeApi<D>
where
    D: Dispatch,
{
    dispatcher: D,
}

impl<D> NodeApi<D>
where
    D: Dispatch,
{
    pub fn new(dispatcher: D) -> Self { NodeApi { dispatcher } }

    pub fn dispatcher(&self) -> &D { &self.dispatcher }

    fn call_unit(&self, method: &str, args: Option<Value>) -> Result<(), DispatchError> {
        match self.dispatcher.invoke(method, args)? {
            None => Ok(()),
            other => Err(unexpected(method, "nothing", other)),
        }
    }

    fn call_string(&self, method: &str, args: Option<Value>) -> Result<String, DispatchError> {
        match self.dispatcher.invoke(method, args)? {
            Some(Value::Str(s)) => Ok(s),
            other => Err(unexpected(method, "str", other)),
        }
    }

    fn call_bool(&self, method: &str, args: Option<Value>) -> Result<bool, DispatchError> {
        match self.dispatcher.invoke(method, args)? {
            Some(Value::Bool(flag)) => Ok(flag),
            other => Err(unexpected(method, "bool", other)),
        }
    }

    fn call_u64(&self, method: &str) -> Result<u64, DispatchError> {
        let value = self.dispatcher.invoke(method, None)?;
        value.as_ref().and_then(Value::as_u64).ok_or_else(|| unexpected(method, "uint", value))
    }

    fn call_records<T: DeserializeOwned>(
        &self,
        method: &str,
        args: Option<Value>,
    ) -> Result<Vec<T>, DispatchError> {
        match self.dispatcher.invoke(method, args)? {
            Some(Value::List(items)) => items.into_iter().map(|item| record(method, item)).collect(),
            other => Err(unexpected(method, "list", other)),
        }
    }

    /// Generates a fresh 24-word BIP39 mnemonic to be used as entropy source.
    pub fn generate_entropy_mnemonic(&self) -> Result<String, DispatchError> {
        self.call_string(method::GENERATE_ENTROPY_MNEMONIC, None)
    }

    /// Builds the node on the native side. Must precede [`NodeApi::start`].
    pub fn build_node(&self, builder: &NodeBuilder) -> Result<(), DispatchError> {
        let args = document(method::BUILD_NODE, builder)?;
        self.call_unit(method::BUILD_NODE, Some(args))
    }

    /// Starts the background tasks of the node.
    pub fn start(&self) -> Result<(), DispatchError> { self.call_unit(method::START, None) }

    /// Disconnects all peers and stops the node.
    pub fn stop(&self) -> Result<(), DispatchError> { self.call_unit(method::STOP, None) }

    /// Syncs the on-chain and lightning wallets with the chain tip.
    pub fn sync_wallets(&self) -> Result<(), DispatchError> {
        self.call_unit(method::SYNC_WALLETS, None)
    }

    pub fn node_id(&self) -> Result<String, DispatchError> {
        self.call_string(method::NODE_ID, None)
    }

    /// Address the node listens on, if it listens at all.
    pub fn listening_address(&self) -> Result<Option<String>, DispatchError> {
        self.dispatcher.invoke_str(method::LISTENING_ADDRESS, None)
    }

    pub fn new_onchain_address(&self) -> Result<String, DispatchError> {
        self.call_string(method::NEW_ONCHAIN_ADDRESS, None)
    }

    pub fn spendable_onchain_balance_sats(&self) -> Result<u64, DispatchError> {
        self.call_u64(method::SPENDABLE_ONCHAIN_BALANCE_SATS)
    }

    pub fn total_onchain_balance_sats(&self) -> Result<u64, DispatchError> {
        self.call_u64(method::TOTAL_ONCHAIN_BALANCE_SATS)
    }

    /// Sends an on-chain payment, returning the transaction id.
    pub fn send_to_onchain_address(
        &self,
        address: &str,
        amount_sats: u64,
    ) -> Result<String, DispatchError> {
        let args = Value::List(vec![address.into(), amount_sats.into()]);
        self.call_string(method::SEND_TO_ONCHAIN_ADDRESS, Some(args))
    }

    /// Sends all available on-chain funds, returning the transaction id.
    pub fn send_all_to_onchain_address(&self, address: &str) -> Result<String, DispatchError> {
        self.call_string(method::SEND_ALL_TO_ONCHAIN_ADDRESS, Some(address.into()))
    }

    /// Connects to a peer; a persisted peer is reconnected on restart.
    pub fn connect(&self, node_id: &str, address: &str, persist: bool) -> Result<(), DispatchError> {
        let args = Value::List(vec![node_id.into(), address.into(), persist.into()]);
        self.call_unit(method::CONNECT, Some(args))
    }

    /// Disconnects the peer and forgets it.
    pub fn disconnect(&self, counterparty_node_id: &str) -> Result<(), DispatchError> {
        self.call_unit(method::DISCONNECT, Some(counterparty_node_id.into()))
    }

    pub fn list_peers(&self) -> Result<Vec<PeerDetails>, DispatchError> {
        self.call_records(method::LIST_PEERS, None)
    }

    /// Connects to a peer and opens a channel with it. Nothing is pushed to
    /// the counterparty when `push_to_counterparty_msat` is `None`; without
    /// `channel_config` the node defaults apply.
    pub fn connect_open_channel(
        &self,
        address: &str,
        node_id: &str,
        channel_amount_sats: u64,
        push_to_counterparty_msat: Option<u64>,
        announce_channel: bool,
        channel_config: Option<&ChannelConfig>,
    ) -> Result<(), DispatchError> {
        let args = Value::List(vec![
            address.into(),
            node_id.into(),
            channel_amount_sats.into(),
            push_to_counterparty_msat.unwrap_or_default().into(),
            announce_channel.into(),
            document(method::CONNECT_OPEN_CHANNEL, &channel_config)?,
        ]);
        self.call_unit(method::CONNECT_OPEN_CHANNEL, Some(args))
    }

    pub fn close_channel(
        &self,
        channel_id: &str,
        counterparty_node_id: &str,
    ) -> Result<(), DispatchError> {
        let args = Value::List(vec![channel_id.into(), counterparty_node_id.into()]);
        self.call_unit(method::CLOSE_CHANNEL, Some(args))
    }

    pub fn update_channel_config(
        &self,
        channel_id: &str,
        counterparty_node_id: &str,
        channel_config: &ChannelConfig,
    ) -> Result<(), DispatchError> {
        let args = Value::List(vec![
            channel_id.into(),
            counterparty_node_id.into(),
            document(method::UPDATE_CHANNEL_CONFIG, channel_config)?,
        ]);
        self.call_unit(method::UPDATE_CHANNEL_CONFIG, Some(args))
    }

    pub fn list_channels(&self) -> Result<Vec<ChannelDetails>, DispatchError> {
        self.call_records(method::LIST_CHANNELS, None)
    }

    /// Creates an invoice for the given amount, returning it bech32-encoded.
    pub fn receive_payment(
        &self,
        amount_msat: u64,
        description: &str,
        expiry_secs: u32,
    ) -> Result<String, DispatchError> {
        let args = Value::List(vec![amount_msat.into(), description.into(), expiry_secs.into()]);
        self.call_string(method::RECEIVE_PAYMENT, Some(args))
    }

    /// Creates a zero-amount invoice, leaving the amount to the payer.
    pub fn receive_variable_amount_payment(
        &self,
        description: &str,
        expiry_secs: u32,
    ) -> Result<String, DispatchError> {
        let args = Value::List(vec![description.into(), expiry_secs.into()]);
        self.call_string(method::RECEIVE_VARIABLE_AMOUNT_PAYMENT, Some(args))
    }

    /// Pays a bech32-encoded invoice, returning the payment hash.
    pub fn send_payment(&self, invoice: &str) -> Result<String, DispatchError> {
        self.call_string(method::SEND_PAYMENT, Some(invoice.into()))
    }

    /// Pays an invoice with an explicit amount, which must cover the invoice
    /// amount if it has one.
    pub fn send_payment_using_amount(
        &self,
        invoice: &str,
        amount_msat: u64,
    ) -> Result<String, DispatchError> {
        let args = Value::List(vec![invoice.into(), amount_msat.into()]);
        self.call_string(method::SEND_PAYMENT_USING_AMOUNT, Some(args))
    }

    /// Sends a keysend payment, returning the payment hash.
    pub fn send_spontaneous_payment(
        &self,
        amount_msat: u64,
        node_id: &str,
    ) -> Result<String, DispatchError> {
        let args = Value::List(vec![amount_msat.into(), node_id.into()]);
        self.call_string(method::SEND_SPONTANEOUS_PAYMENT, Some(args))
    }

    /// Details of a known payment; `None` for unknown hashes.
    pub fn payment(&self, payment_hash: &str) -> Result<Option<PaymentDetails>, DispatchError> {
        self.dispatcher
            .invoke(method::PAYMENT, Some(payment_hash.into()))?
            .map(|value| record(method::PAYMENT, value))
            .transpose()
    }

    /// Removes a payment from the store, telling whether it was present.
    pub fn remove_payment(&self, payment_hash: &str) -> Result<bool, DispatchError> {
        self.call_bool(method::REMOVE_PAYMENT, Some(payment_hash.into()))
    }

    pub fn list_payments(&self) -> Result<Vec<PaymentDetails>, DispatchError> {
        self.call_records(method::LIST_PAYMENTS, None)
    }

    pub fn list_payments_with_filter(
        &self,
        direction: PaymentDirection,
    ) -> Result<Vec<PaymentDetails>, DispatchError> {
        self.call_records(method::LIST_PAYMENTS_WITH_FILTER, Some(direction.to_string().into()))
    }

    /// Next pending node event, serialized by the native side. The same event
    /// is returned until [`NodeApi::event_handled`] is called.
    pub fn next_event(&self) -> Result<Option<String>, DispatchError> {
        self.dispatcher.invoke_str(method::NEXT_EVENT, None)
    }

    /// Blocks inside the native library until an event is available.
    pub fn wait_until_next_event(&self) -> Result<String, DispatchError> {
        self.call_string(method::WAIT_UNTIL_NEXT_EVENT, None)
    }

    pub fn event_handled(&self) -> Result<(), DispatchError> {
        self.call_unit(method::EVENT_HANDLED, None)
    }

    /// Signs a message with the node key, returning zbase32 signature.
    pub fn sign_message(&self, msg: &[u8]) -> Result<String, DispatchError> {
        self.call_string(method::SIGN_MESSAGE, Some(msg.to_vec().into()))
    }

    pub fn verify_signature(
        &self,
        msg: &[u8],
        signature: &str,
        node_id: &str,
    ) -> Result<bool, DispatchError> {
        let args = Value::List(vec![msg.to_vec().into(), signature.into(), node_id.into()]);
        self.call_bool(method::VERIFY_SIGNATURE, Some(args))
    }
}

#[cfg(test)]
mod test {
    use ldk_bridge_rpc::MethodCall;

    use super::*;

    /// Answers every call with the same value
    struct Fixed(Option<Value>);

    impl Dispatch for Fixed {
        fn dispatch(&self, _: MethodCall) -> Result<Option<Value>, DispatchError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn unit_call_rejects_value() {
        let node = NodeApi::new(Fixed(Some(Value::Uint(1))));
        let err = node.start().unwrap_err();
        assert!(matches!(
            err,
            DispatchError::UnexpectedReply { ref method, expected: "nothing", found: "uint" }
                if method == method::START
        ));
    }

    #[test]
    fn malformed_record() {
        let node = NodeApi::new(Fixed(Some(Value::List(vec![Value::from("{}")]))));
        let err = node.list_peers().unwrap_err();
        assert!(matches!(err, DispatchError::MalformedRecord { ref method, .. } if method == method::LIST_PEERS));

        let node = NodeApi::new(Fixed(Some(Value::List(vec![Value::Uint(7)]))));
        let err = node.list_channels().unwrap_err();
        assert!(matches!(err, DispatchError::UnexpectedReply { expected: "str", found: "uint", .. }));
    }

    #[test]
    fn list_expected() {
        let node = NodeApi::new(Fixed(None));
        let err = node.list_payments().unwrap_err();
        assert!(matches!(err, DispatchError::UnexpectedReply { expected: "list", found: "nothing", .. }));
    }

    #[test]
    fn method_names_unique() {
        let mut names = method::ALL.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), method::ALL.len());
    }

    #[cfg(unix)]
    mod native {
        use super::super::*;
        use crate::dispatch::test::{
            native_node, ADDRESS, EVENT, MNEMONIC, NODE_ID, PAYMENT_HASH, TXID,
        };

        #[test]
        fn typed_calls() {
            let node = NodeApi::new(native_node());
            node.start().unwrap();
            assert_eq!(node.node_id().unwrap(), NODE_ID);
            assert_eq!(node.listening_address().unwrap().as_deref(), Some("0.0.0.0:9735"));
            assert_eq!(node.new_onchain_address().unwrap(), ADDRESS);
            assert_eq!(node.spendable_onchain_balance_sats().unwrap(), 50_000);
            assert_eq!(node.receive_payment(21_000, "coffee", 3600).unwrap(), "lnbcrt210n1coffee");
            assert!(node.verify_signature(b"hello", "d9ea", NODE_ID).unwrap());
            assert_eq!(node.next_event().unwrap(), None);
            node.event_handled().unwrap();
            node.sync_wallets().unwrap();
            node.stop().unwrap();
        }

        #[test]
        fn node_setup() {
            let node = NodeApi::new(native_node());
            let mnemonic = node.generate_entropy_mnemonic().unwrap();
            assert_eq!(mnemonic, MNEMONIC);
            assert_eq!(mnemonic.split_whitespace().count(), 24);

            let builder = NodeBuilder::new(NodeConfig {
                network: Network::Regtest,
                ..Default::default()
            })
            .with_esplora("http://127.0.0.1:3002")
            .with_entropy(EntropySource::Bip39Mnemonic { mnemonic, passphrase: None })
            .with_gossip(GossipSource::P2pNetwork);
            node.build_node(&builder).unwrap();

            let err = node.build_node(&NodeBuilder::default()).unwrap_err();
            assert!(matches!(err, DispatchError::Rejected { .. }));
        }

        #[test]
        fn peers_and_channels() {
            let node = NodeApi::new(native_node());
            node.connect(NODE_ID, "127.0.0.1:9735", true).unwrap();

            let peers = node.list_peers().unwrap();
            assert_eq!(peers.len(), 1);
            assert_eq!(peers[0].node_id, NODE_ID);
            assert!(peers[0].is_persisted && peers[0].is_connected);

            node.connect_open_channel("127.0.0.1:9735", NODE_ID, 100_000, None, false, None)
                .unwrap();
            let config = ChannelConfig { forwarding_fee_base_msat: 500, ..Default::default() };
            node.connect_open_channel(
                "127.0.0.1:9735",
                NODE_ID,
                100_000,
                Some(10_000),
                true,
                Some(&config),
            )
            .unwrap();

            let channels = node.list_channels().unwrap();
            assert_eq!(channels.len(), 1);
            assert_eq!(channels[0].channel_value_sats, 100_000);
            assert_eq!(channels[0].confirmations, Some(3));
            assert_eq!(channels[0].funding_txo, None);

            node.update_channel_config(&channels[0].channel_id, NODE_ID, &config).unwrap();
            node.close_channel(&channels[0].channel_id, NODE_ID).unwrap();

            node.disconnect(NODE_ID).unwrap();
            assert!(matches!(node.disconnect("03ff").unwrap_err(), DispatchError::Rejected { .. }));
        }

        #[test]
        fn payments() {
            let node = NodeApi::new(native_node());
            assert_eq!(node.receive_variable_amount_payment("tip", 600).unwrap(), "lnbcrt1tip");
            assert_eq!(node.send_payment_using_amount("lnbcrt1tip", 21_000).unwrap(), PAYMENT_HASH);

            let payment = node.payment(PAYMENT_HASH).unwrap().unwrap();
            assert_eq!(payment.amount_msat, Some(21_000));
            assert_eq!(payment.direction, PaymentDirection::Outbound);
            assert_eq!(payment.status, PaymentStatus::Succeeded);
            assert_eq!(node.payment("00").unwrap(), None);

            assert_eq!(node.list_payments().unwrap(), vec![payment.clone()]);
            assert_eq!(
                node.list_payments_with_filter(PaymentDirection::Outbound).unwrap(),
                vec![payment]
            );
            assert!(node.list_payments_with_filter(PaymentDirection::Inbound).unwrap().is_empty());

            assert!(node.remove_payment(PAYMENT_HASH).unwrap());
            assert!(!node.remove_payment("00").unwrap());
        }

        #[test]
        fn onchain_and_events() {
            let node = NodeApi::new(native_node());
            assert_eq!(node.send_to_onchain_address(ADDRESS, 10_000).unwrap(), TXID);
            assert!(matches!(
                node.send_to_onchain_address(ADDRESS, 0).unwrap_err(),
                DispatchError::Rejected { .. }
            ));
            assert_eq!(node.send_all_to_onchain_address(ADDRESS).unwrap(), TXID);
            assert_eq!(node.wait_until_next_event().unwrap(), EVENT);
        }

        #[test]
        fn schema_mismatch() {
            let node = NodeApi::new(native_node());
            let err = node.total_onchain_balance_sats().unwrap_err();
            assert!(matches!(err, DispatchError::UnexpectedReply { expected: "uint", found: "str", .. }));
        }

        #[test]
        fn unsupported_operation() {
            let node = NodeApi::new(native_node());
            let err = node.sign_message(b"hello").unwrap_err();
            assert!(matches!(err, DispatchError::NotImplemented(ref m) if m == method::SIGN_MESSAGE));
        }
    }
}
