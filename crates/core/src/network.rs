//! Deposit networks and amount tiers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transfer rail an exchange accepts deposits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum DepositNetwork {
    Bsc = 1,
    Trc20 = 2,
    Sol = 3,
    Erc20 = 4,
    Arbitrum = 5,
    Optimism = 6,
    Polygon = 7,
    #[serde(rename = "AVAXC")]
    AvaxC = 8,
    #[serde(rename = "OPBNB")]
    OpBnb = 9,
    Aptos = 10,
    Eos = 11,
    Near = 12,
    Scroll = 13,
    Xtz = 14,
    #[serde(rename = "XLAYER")]
    XLayer = 15,
}

impl DepositNetwork {
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DepositNetwork::Bsc => "BSC",
            DepositNetwork::Trc20 => "TRC20",
            DepositNetwork::Sol => "SOL",
            DepositNetwork::Erc20 => "ERC20",
            DepositNetwork::Arbitrum => "ARBITRUM",
            DepositNetwork::Optimism => "OPTIMISM",
            DepositNetwork::Polygon => "POLYGON",
            DepositNetwork::AvaxC => "AVAXC",
            DepositNetwork::OpBnb => "OPBNB",
            DepositNetwork::Aptos => "APTOS",
            DepositNetwork::Eos => "EOS",
            DepositNetwork::Near => "NEAR",
            DepositNetwork::Scroll => "SCROLL",
            DepositNetwork::Xtz => "XTZ",
            DepositNetwork::XLayer => "XLAYER",
        }
    }

    /// Check if this network settles on an EVM chain.
    #[inline]
    pub fn is_evm(self) -> bool {
        matches!(
            self,
            DepositNetwork::Bsc
                | DepositNetwork::Erc20
                | DepositNetwork::Arbitrum
                | DepositNetwork::Optimism
                | DepositNetwork::Polygon
                | DepositNetwork::AvaxC
                | DepositNetwork::OpBnb
                | DepositNetwork::Scroll
                | DepositNetwork::XLayer
        )
    }
}

impl fmt::Display for DepositNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capital-size bracket used to pick a network preference ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountTier {
    Small,
    Medium,
    Large,
}

impl AmountTier {
    /// Upper bound (exclusive) of the small tier.
    pub const SMALL_LIMIT: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);
    /// Upper bound (inclusive) of the medium tier.
    pub const MEDIUM_LIMIT: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

    /// `< 1000` is small, `1000..=5000` is medium, anything above is large.
    pub fn for_amount(amount: Decimal) -> Self {
        if amount < Self::SMALL_LIMIT {
            AmountTier::Small
        } else if amount <= Self::MEDIUM_LIMIT {
            AmountTier::Medium
        } else {
            AmountTier::Large
        }
    }
}
