#![no_main]

use libfuzzer_sys::fuzz_target;
use proman_core::{parse_remote_url, RepositoryUrlNormalizer};

fuzz_target!(|data: &[u8]| {
    let Ok(remote) = std::str::from_utf8(data) else {
        return;
    };

    let normalizer = RepositoryUrlNormalizer::with_known_hosts(["gitlab.com"]);
    if let Some(url) = normalizer.canonical_url(remote) {
        assert!(url.starts_with("https://"));
        assert!(url.ends_with('/'));
        assert!(parse_remote_url(remote).is_some());
    }
});
