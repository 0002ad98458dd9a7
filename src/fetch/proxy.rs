//! Public CORS relay rewrites used when a direct page fetch fails.

/// A public relay that re-requests a target URL on the caller's behalf.
#[derive(Clone, Copy)]
pub struct ProxyStrategy {
    pub name: &'static str,
    rewrite: fn(&str) -> String,
}

impl ProxyStrategy {
    /// The relay URL that fetches `url` through this proxy.
    pub fn rewrite(&self, url: &str) -> String {
        (self.rewrite)(url)
    }
}

/// Relays in the fixed order they are attempted. The target URL is
/// substituted without re-encoding, matching what each relay accepts.
pub const PROXY_STRATEGIES: [ProxyStrategy; 3] = [
    ProxyStrategy {
        name: "allorigins",
        rewrite: |url| format!("https://api.allorigins.win/raw?url={}", url),
    },
    ProxyStrategy {
        name: "codetabs",
        rewrite: |url| format!("https://api.codetabs.com/v1/proxy?quest={}", url),
    },
    ProxyStrategy {
        name: "corsproxy",
        rewrite: |url| format!("https://corsproxy.io/?{}", url),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_order_is_fixed() {
        let names: Vec<&str> = PROXY_STRATEGIES.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["allorigins", "codetabs", "corsproxy"]);
    }

    #[test]
    fn test_rewrites_substitute_target_url() {
        let url = "https://example.com/page?x=1";
        assert_eq!(
            PROXY_STRATEGIES[0].rewrite(url),
            "https://api.allorigins.win/raw?url=https://example.com/page?x=1"
        );
        assert_eq!(
            PROXY_STRATEGIES[1].rewrite(url),
            "https://api.codetabs.com/v1/proxy?quest=https://example.com/page?x=1"
        );
        assert_eq!(
            PROXY_STRATEGIES[2].rewrite(url),
            "https://corsproxy.io/?https://example.com/page?x=1"
        );
    }
}
