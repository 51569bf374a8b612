//! Configuration types for the W5500 driver

use crate::driver::error::{ConfigError, ConfigResult};
use crate::internal::constants::{
    DEFAULT_MAC_ADDR, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_TIME, MAC_ADDR_LEN, RESET_TIMEOUT_MS,
};

/// IPv4 addressing applied to the common register block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkConfig {
    /// Source IP address (`SIPR`)
    pub ip: [u8; 4],
    /// Subnet mask (`SUBR`)
    pub subnet: [u8; 4],
    /// Gateway IP address (`GAR`)
    pub gateway: [u8; 4],
}

impl NetworkConfig {
    /// Static addressing
    #[must_use]
    pub const fn new(ip: [u8; 4], subnet: [u8; 4], gateway: [u8; 4]) -> Self {
        Self {
            ip,
            subnet,
            gateway,
        }
    }
}

/// Driver bring-up configuration
///
/// Build with the `with_*` methods:
///
/// ```ignore
/// let config = W5500Config::new()
///     .with_mac_address([0x02, 0x00, 0x00, 0x12, 0x34, 0x56])
///     .with_ip_address([192, 168, 1, 50])
///     .with_subnet_mask([255, 255, 255, 0])
///     .with_gateway([192, 168, 1, 1]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct W5500Config {
    /// Source MAC address (`SHAR`)
    pub mac_address: [u8; MAC_ADDR_LEN],
    /// IPv4 addressing
    pub network: NetworkConfig,
    /// Retransmission timeout in 100 µs units (`RTR`)
    pub retransmission_time: u16,
    /// Retransmission count (`RCR`)
    pub retransmission_count: u8,
    /// How long to wait for the software reset bit to clear
    pub reset_timeout_ms: u32,
}

impl Default for W5500Config {
    fn default() -> Self {
        Self::new()
    }
}

impl W5500Config {
    /// Defaults: locally administered MAC, unconfigured addresses, chip
    /// default retry settings
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mac_address: DEFAULT_MAC_ADDR,
            network: NetworkConfig::new([0; 4], [0; 4], [0; 4]),
            retransmission_time: DEFAULT_RETRY_TIME,
            retransmission_count: DEFAULT_RETRY_COUNT,
            reset_timeout_ms: RESET_TIMEOUT_MS,
        }
    }

    /// Set the MAC address
    #[must_use]
    pub const fn with_mac_address(mut self, mac: [u8; MAC_ADDR_LEN]) -> Self {
        self.mac_address = mac;
        self
    }

    /// Set the source IP address
    #[must_use]
    pub const fn with_ip_address(mut self, ip: [u8; 4]) -> Self {
        self.network.ip = ip;
        self
    }

    /// Set the subnet mask
    #[must_use]
    pub const fn with_subnet_mask(mut self, subnet: [u8; 4]) -> Self {
        self.network.subnet = subnet;
        self
    }

    /// Set the gateway address
    #[must_use]
    pub const fn with_gateway(mut self, gateway: [u8; 4]) -> Self {
        self.network.gateway = gateway;
        self
    }

    /// Set all IPv4 addressing at once
    #[must_use]
    pub const fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    /// Set the retransmission timeout (100 µs units)
    #[must_use]
    pub const fn with_retransmission_time(mut self, time: u16) -> Self {
        self.retransmission_time = time;
        self
    }

    /// Set the retransmission count
    #[must_use]
    pub const fn with_retransmission_count(mut self, count: u8) -> Self {
        self.retransmission_count = count;
        self
    }

    /// Set the software reset timeout
    #[must_use]
    pub const fn with_reset_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.reset_timeout_ms = timeout_ms;
        self
    }

    /// Check the configuration before it reaches the chip
    ///
    /// Rejects multicast MAC addresses and a zero reset timeout.
    pub const fn validate(&self) -> ConfigResult<()> {
        if self.mac_address[0] & 0x01 != 0 {
            return Err(ConfigError::InvalidConfig);
        }
        if self.reset_timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig);
        }
        Ok(())
    }
}
