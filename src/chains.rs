//! Supported Chains
//!
//! The fixed set of blockchains the TokenGuard growth index can compare.
//! Each chain serializes to the lowercase token the API expects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dashboard::SelectionError;

/// A blockchain supported by the growth index timeline endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Solana,
    Arbitrum,
    Optimism,
    Polygon,
    Base,
    Avalanche,
    Bsc,
    Fantom,
    Gnosis,
    Celo,
    Zksync,
    Linea,
    Scroll,
    Mantle,
    Near,
    Aptos,
    Sui,
    Ton,
    Tron,
}

impl Chain {
    /// Every supported chain, in the order offered to users
    pub const ALL: [Chain; 20] = [
        Chain::Ethereum,
        Chain::Solana,
        Chain::Arbitrum,
        Chain::Optimism,
        Chain::Polygon,
        Chain::Base,
        Chain::Avalanche,
        Chain::Bsc,
        Chain::Fantom,
        Chain::Gnosis,
        Chain::Celo,
        Chain::Zksync,
        Chain::Linea,
        Chain::Scroll,
        Chain::Mantle,
        Chain::Near,
        Chain::Aptos,
        Chain::Sui,
        Chain::Ton,
        Chain::Tron,
    ];

    /// The token sent to the API as `chainName` / `compareWith`
    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Solana => "solana",
            Chain::Arbitrum => "arbitrum",
            Chain::Optimism => "optimism",
            Chain::Polygon => "polygon",
            Chain::Base => "base",
            Chain::Avalanche => "avalanche",
            Chain::Bsc => "bsc",
            Chain::Fantom => "fantom",
            Chain::Gnosis => "gnosis",
            Chain::Celo => "celo",
            Chain::Zksync => "zksync",
            Chain::Linea => "linea",
            Chain::Scroll => "scroll",
            Chain::Mantle => "mantle",
            Chain::Near => "near",
            Chain::Aptos => "aptos",
            Chain::Sui => "sui",
            Chain::Ton => "ton",
            Chain::Tron => "tron",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        Chain::ALL
            .iter()
            .copied()
            .find(|chain| chain.as_str() == token)
            .ok_or_else(|| SelectionError::UnsupportedChain(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_chain() {
        assert_eq!("ethereum".parse::<Chain>().unwrap(), Chain::Ethereum);
        assert_eq!(" Solana ".parse::<Chain>().unwrap(), Chain::Solana);
    }

    #[test]
    fn test_parse_unsupported_chain() {
        let err = "dogechain".parse::<Chain>().unwrap_err();
        assert!(matches!(err, SelectionError::UnsupportedChain(ref s) if s == "dogechain"));
    }

    #[test]
    fn test_tokens_round_trip_through_serde() {
        for chain in Chain::ALL {
            let json = serde_json::to_string(&chain).unwrap();
            assert_eq!(json, format!("\"{}\"", chain.as_str()));
            assert_eq!(chain.as_str().parse::<Chain>().unwrap(), chain);
        }
    }
}
