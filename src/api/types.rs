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

//! Structured data crossing the native boundary. These travel as JSON
//! documents inside string values, since the boundary values themselves are
//! primitive.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate", rename_all = "snake_case")]
pub enum Network {
    #[display("bitcoin")]
    Bitcoin,

    #[display("testnet")]
    Testnet,

    #[display("signet")]
    Signet,

    #[display("regtest")]
    Regtest,
}

/// Node settings applied when the node is built
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate", default)]
pub struct NodeConfig {
    /// Directory where the node keeps its persistent data
    pub storage_dir_path: String,
    pub network: Network,
    /// Address to listen on for incoming peer connections, if any
    pub listening_address: Option<String>,
    pub default_cltv_expiry_delta: u32,
    pub onchain_wallet_sync_interval_secs: u64,
    pub wallet_sync_interval_secs: u64,
    pub fee_rate_cache_update_interval_secs: u64,
    /// Peers allowed to open zero-confirmation channels to us
    pub trusted_peers_0conf: Vec<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            storage_dir_path: s!("/tmp/ldk_node/"),
            network: Network::Bitcoin,
            listening_address: None,
            default_cltv_expiry_delta: 144,
            onchain_wallet_sync_interval_secs: 80,
            wallet_sync_interval_secs: 30,
            fee_rate_cache_update_interval_secs: 600,
            trusted_peers_0conf: vec![],
        }
    }
}

/// Source of chain data
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate", tag = "type", content = "value", rename_all = "snake_case")]
pub enum ChainSource {
    /// Esplora server URL
    Esplora(String),
}

/// Source of the node key material
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate", tag = "type", content = "value", rename_all = "snake_case")]
pub enum EntropySource {
    /// Path to a seed file, created on the first run
    SeedFile(String),

    /// 64-byte seed
    SeedBytes(Vec<u8>),

    Bip39Mnemonic { mnemonic: String, passphrase: Option<String> },
}

/// Source of the lightning network graph
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate", tag = "type", content = "value", rename_all = "snake_case")]
pub enum GossipSource {
    P2pNetwork,

    /// Rapid gossip sync server URL
    RapidGossipSync(String),
}

/// Everything the native side needs to build a node
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate")]
pub struct NodeBuilder {
    pub config: NodeConfig,
    pub chain_source: Option<ChainSource>,
    pub entropy_source: Option<EntropySource>,
    pub gossip_source: Option<GossipSource>,
}

impl NodeBuilder {
    pub fn new(config: NodeConfig) -> NodeBuilder { NodeBuilder { config, ..Default::default() } }

    pub fn with_esplora(mut self, url: impl ToString) -> Self {
        self.chain_source = Some(ChainSource::Esplora(url.to_string()));
        self
    }

    pub fn with_entropy(mut self, source: EntropySource) -> Self {
        self.entropy_source = Some(source);
        self
    }

    pub fn with_gossip(mut self, source: GossipSource) -> Self {
        self.gossip_source = Some(source);
        self
    }
}

/// Per-channel forwarding and safety parameters
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate", default)]
pub struct ChannelConfig {
    pub forwarding_fee_proportional_millionths: u32,
    pub forwarding_fee_base_msat: u32,
    pub cltv_expiry_delta: u16,
    pub max_dust_htlc_exposure_msat: u64,
    pub force_close_avoidance_max_fee_satoshis: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        ChannelConfig {
            forwarding_fee_proportional_millionths: 0,
            forwarding_fee_base_msat: 1000,
            cltv_expiry_delta: 72,
            max_dust_htlc_exposure_msat: 5_000_000,
            force_close_avoidance_max_fee_satoshis: 1000,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate")]
pub struct ChannelDetails {
    pub channel_id: String,
    pub counterparty_node_id: String,
    pub funding_txo: Option<String>,
    pub channel_value_sats: u64,
    pub outbound_capacity_msat: u64,
    pub inbound_capacity_msat: u64,
    pub confirmations: Option<u32>,
    pub is_outbound: bool,
    pub is_channel_ready: bool,
    pub is_usable: bool,
    pub is_public: bool,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate")]
pub struct PeerDetails {
    pub node_id: String,
    pub address: String,
    pub is_persisted: bool,
    pub is_connected: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate", rename_all = "snake_case")]
pub enum PaymentDirection {
    #[display("inbound")]
    Inbound,

    #[display("outbound")]
    Outbound,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate", rename_all = "snake_case")]
pub enum PaymentStatus {
    #[display("pending")]
    Pending,

    #[display("succeeded")]
    Succeeded,

    #[display("failed")]
    Failed,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate")]
pub struct PaymentDetails {
    /// Payment hash, hex-encoded
    pub hash: String,
    pub preimage: Option<String>,
    pub secret: Option<String>,
    pub amount_msat: Option<u64>,
    pub direction: PaymentDirection,
    pub status: PaymentStatus,
}
