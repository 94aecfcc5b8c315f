/// Network name for a chain id, using the names ethers reports.
pub fn network_name(chain_id: u64) -> &'static str {
    match chain_id {
        1 => "mainnet",
        3 => "ropsten",
        4 => "rinkeby",
        5 => "goerli",
        10 => "optimism",
        42 => "kovan",
        56 => "bnb",
        137 => "matic",
        42161 => "arbitrum",
        80001 => "maticmum",
        11155111 => "sepolia",
        _ => "unknown",
    }
}

/// Parse a JSON-RPC hex quantity such as `"0x4"`.
pub fn parse_quantity(raw: &str) -> Option<u64> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_chains() {
        assert_eq!(network_name(4), "rinkeby");
        assert_eq!(network_name(1), "mainnet");
        assert_eq!(network_name(31337), "unknown");
    }

    #[test]
    fn quantities_parse_with_or_without_prefix() {
        assert_eq!(parse_quantity("0x4"), Some(4));
        assert_eq!(parse_quantity("aa36a7"), Some(11_155_111));
        assert_eq!(parse_quantity("0x"), None);
        assert_eq!(parse_quantity("0xzz"), None);
    }
}
