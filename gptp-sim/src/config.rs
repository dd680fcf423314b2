use std::{fs::read_to_string, path::Path};

use gptp::{
    datastructures::{
        common::{ClockIdentity, ClockQuality, PortIdentity},
        frame::MacAddress,
    },
    time::Interval,
    PortConfig, ServoConfig,
};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// A point-to-point link with one gPTP end station on either side
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Simulated time in seconds
    #[serde(default = "default_duration")]
    pub duration: u64,
    /// One way propagation delay of the link in nanoseconds
    #[serde(default = "default_link_delay")]
    pub link_delay: u64,
    #[serde(rename = "node")]
    pub nodes: Vec<NodeConfig>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct NodeConfig {
    #[serde(deserialize_with = "deserialize_mac_address")]
    pub mac_address: MacAddress,
    /// Overrides the identity derived from the MAC address
    #[serde(default, deserialize_with = "deserialize_clock_identity")]
    pub identity: Option<ClockIdentity>,
    #[serde(default = "default_priority")]
    pub priority_1: u8,
    #[serde(default = "default_priority")]
    pub priority_2: u8,
    #[serde(default = "default_clock_class")]
    pub clock_class: u8,
    #[serde(default = "default_sync_interval")]
    pub sync_interval: Interval,
    #[serde(default = "default_interval")]
    pub announce_interval: Interval,
    #[serde(default = "default_interval")]
    pub pdelay_interval: Interval,
    #[serde(default)]
    pub tx_latency: u32,
    #[serde(default)]
    pub rx_latency: u32,
    /// Frequency error of the oscillator in parts per million
    #[serde(default)]
    pub drift_ppm: f64,
    /// Reading of the clock when the simulation starts, in nanoseconds
    #[serde(default)]
    pub initial_time: u64,
    #[serde(default)]
    pub servo: ServoConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error while reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("config toml parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("a link needs exactly two nodes, found {0}")]
    NodeCount(usize),
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let contents = read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        if config.nodes.len() != 2 {
            return Err(ConfigError::NodeCount(config.nodes.len()));
        }
        Ok(config)
    }
}

impl Default for Config {
    /// A better grandmaster running fast, and a follower running slow and
    /// starting a third of a second off.
    fn default() -> Self {
        Config {
            duration: default_duration(),
            link_delay: default_link_delay(),
            nodes: vec![
                NodeConfig {
                    priority_1: 100,
                    drift_ppm: 40.0,
                    ..NodeConfig::new([0x02, 0, 0, 0, 0, 0x01])
                },
                NodeConfig {
                    drift_ppm: -25.0,
                    initial_time: 333_333_333,
                    ..NodeConfig::new([0x02, 0, 0, 0, 0, 0x02])
                },
            ],
        }
    }
}

impl NodeConfig {
    pub fn new(mac_address: MacAddress) -> Self {
        NodeConfig {
            mac_address,
            identity: None,
            priority_1: default_priority(),
            priority_2: default_priority(),
            clock_class: default_clock_class(),
            sync_interval: default_sync_interval(),
            announce_interval: default_interval(),
            pdelay_interval: default_interval(),
            tx_latency: 0,
            rx_latency: 0,
            drift_ppm: 0.0,
            initial_time: 0,
            servo: ServoConfig::default(),
        }
    }
}

impl From<&NodeConfig> for PortConfig {
    fn from(node: &NodeConfig) -> Self {
        let mut config = PortConfig::for_mac_address(node.mac_address);
        if let Some(clock_identity) = node.identity {
            config.port_identity = PortIdentity {
                clock_identity,
                port_number: 1,
            };
        }
        PortConfig {
            clock_quality: ClockQuality {
                clock_class: node.clock_class,
                ..Default::default()
            },
            priority_1: node.priority_1,
            priority_2: node.priority_2,
            sync_interval: node.sync_interval,
            announce_interval: node.announce_interval,
            pdelay_interval: node.pdelay_interval,
            tx_latency: node.tx_latency,
            rx_latency: node.rx_latency,
            servo: node.servo,
            ..config
        }
    }
}

fn deserialize_mac_address<'de, D>(deserializer: D) -> Result<MacAddress, D::Error>
where
    D: Deserializer<'de>,
{
    use hex::FromHex;
    use serde::de::Error;
    let raw: String = Deserialize::deserialize(deserializer)?;
    <[u8; 6]>::from_hex(raw.replace(':', ""))
        .map_err(|e| D::Error::custom(format!("Invalid mac address: {}", e)))
}

fn deserialize_clock_identity<'de, D>(deserializer: D) -> Result<Option<ClockIdentity>, D::Error>
where
    D: Deserializer<'de>,
{
    use hex::FromHex;
    use serde::de::Error;
    let raw: String = Deserialize::deserialize(deserializer)?;
    Ok(Some(ClockIdentity(<[u8; 8]>::from_hex(raw).map_err(
        |e| D::Error::custom(format!("Invalid clock identifier: {}", e)),
    )?)))
}

fn default_duration() -> u64 {
    20
}

fn default_link_delay() -> u64 {
    500
}

fn default_priority() -> u8 {
    248
}

fn default_clock_class() -> u8 {
    248
}

fn default_sync_interval() -> Interval {
    Interval::EIGHTH_SECOND
}

fn default_interval() -> Interval {
    Interval::ONE_SECOND
}
