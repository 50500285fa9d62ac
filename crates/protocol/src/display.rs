//! Small presentation helpers for hashes and certificate links.

/// Public IPFS gateway used to open certificate files.
const IPFS_GATEWAY: &str = "https://gateway.pinata.cloud/ipfs";

/// Shorten a long hash or CID for display: `abcdef…` → `abcde...vwxyz`.
///
/// Values short enough to show whole are returned unchanged; empty input
/// renders as `-`.
pub fn short(value: &str, keep: usize) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "-".to_string();
    }
    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() <= keep * 2 + 3 {
        return trimmed.to_string();
    }
    let head: String = chars[..keep].iter().collect();
    let tail: String = chars[chars.len() - keep..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Gateway URL for an IPFS CID, or `None` for a blank CID.
pub fn ipfs_gateway_url(cid: &str) -> Option<String> {
    let cid = cid.trim();
    if cid.is_empty() {
        None
    } else {
        Some(format!("{}/{}", IPFS_GATEWAY, cid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_keeps_small_values() {
        assert_eq!(short("abc123", 10), "abc123");
    }

    #[test]
    fn short_truncates_long_values() {
        let hash = "a46a9f0e7c1d5b2e8f3a6c9d0e1f2a3b4c5d6e7f";
        assert_eq!(short(hash, 6), "a46a9f...5d6e7f");
    }

    #[test]
    fn short_renders_empty_as_dash() {
        assert_eq!(short("  ", 8), "-");
    }

    #[test]
    fn gateway_url_for_cid() {
        assert_eq!(
            ipfs_gateway_url("QmYwAPJzv5CZsnA"),
            Some("https://gateway.pinata.cloud/ipfs/QmYwAPJzv5CZsnA".to_string())
        );
        assert_eq!(ipfs_gateway_url("   "), None);
    }
}
