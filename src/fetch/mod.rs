// Declare submodules
pub mod client;
pub mod proxy;

// Re-export key functions and types for easier access
pub use client::{
    create_http_client, fetch_candidates, fetch_page_text, is_usable_response, is_valid_url,
    DESKTOP_USER_AGENT, MIN_BODY_CHARS, REQUEST_TIMEOUT,
};
pub use proxy::{ProxyStrategy, PROXY_STRATEGIES};
