// crates/core/src/repo_url.rs
//! Remote URL parsing and canonical repository URLs.
//!
//! Remotes come in two shapes, `scheme://host/owner/repo.git` and
//! `user@host:owner/repo.git`. Both are split into host/owner/repo by one
//! pattern; which hosts get a canonical browser URL is decided by the
//! registered [`HostingProvider`]s.

use regex_lite::Regex;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// Host whose remotes are canonicalized out of the box.
pub const GITHUB_HOST: &str = "github.com";

static REMOTE_URL_RE: OnceLock<Regex> = OnceLock::new();

fn remote_url_regex() -> &'static Regex {
    REMOTE_URL_RE.get_or_init(|| {
        Regex::new(r"^.+(@|://)(?P<host>.+)[:/](?P<owner>.+)/(?P<repo>.+)\.(?P<vcs>.+)$")
            .expect("remote URL pattern is valid")
    })
}

/// The pieces of a remote URL the normalizer cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteUrl<'a> {
    pub host: &'a str,
    pub owner: &'a str,
    /// Repository name with the VCS suffix removed.
    pub repo: &'a str,
    /// The stripped suffix, e.g. `git`.
    pub vcs: &'a str,
}

/// Split a remote URL into host/owner/repo. Returns `None` when the URL does
/// not look like a hosted repository (local paths, URLs without a suffix).
pub fn parse_remote_url(url: &str) -> Option<RemoteUrl<'_>> {
    let caps = remote_url_regex().captures(url)?;
    Some(RemoteUrl {
        host: caps.name("host")?.as_str(),
        owner: caps.name("owner")?.as_str(),
        repo: caps.name("repo")?.as_str(),
        vcs: caps.name("vcs")?.as_str(),
    })
}

/// A hosting service whose remotes map to a browsable repository URL.
pub trait HostingProvider: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Whether this provider owns `remote`.
    fn claims(&self, remote: &RemoteUrl<'_>) -> bool;

    /// Canonical URL for a remote this provider claims.
    fn canonical_url(&self, remote: &RemoteUrl<'_>) -> String;
}

/// Provider matching a single host name exactly (case-sensitive),
/// producing `https://<host>/<owner>/<repo>/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactHost {
    host: String,
}

impl ExactHost {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn github() -> Self {
        Self::new(GITHUB_HOST)
    }
}

impl HostingProvider for ExactHost {
    fn name(&self) -> &str {
        &self.host
    }

    fn claims(&self, remote: &RemoteUrl<'_>) -> bool {
        remote.host == self.host
    }

    fn canonical_url(&self, remote: &RemoteUrl<'_>) -> String {
        format!("https://{}/{}/{}/", remote.host, remote.owner, remote.repo)
    }
}

/// Registry of known hosting providers. The first provider that claims a
/// remote produces its canonical URL.
pub struct RepositoryUrlNormalizer {
    providers: Vec<Box<dyn HostingProvider>>,
}

impl Default for RepositoryUrlNormalizer {
    fn default() -> Self {
        let mut normalizer = Self::empty();
        normalizer.register(ExactHost::github());
        normalizer
    }
}

impl fmt::Debug for RepositoryUrlNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.name()))
            .finish()
    }
}

impl RepositoryUrlNormalizer {
    /// A normalizer that knows no hosts.
    pub fn empty() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// The default providers plus an exact-host provider for each extra host.
    pub fn with_known_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut normalizer = Self::default();
        for host in hosts {
            let host = host.into();
            if host.is_empty() || normalizer.knows_host(&host) {
                continue;
            }
            normalizer.register(ExactHost::new(host));
        }
        normalizer
    }

    pub fn register(&mut self, provider: impl HostingProvider + 'static) -> &mut Self {
        self.providers.push(Box::new(provider));
        self
    }

    fn knows_host(&self, host: &str) -> bool {
        let probe = RemoteUrl {
            host,
            owner: "",
            repo: "",
            vcs: "",
        };
        self.providers.iter().any(|p| p.claims(&probe))
    }

    /// Canonical URL for one remote, if it parses and a provider claims it.
    pub fn canonical_url(&self, url: &str) -> Option<String> {
        let Some(remote) = parse_remote_url(url) else {
            debug!(url, "Failed to parse remote URL");
            return None;
        };
        let provider = self.providers.iter().find(|p| p.claims(&remote))?;
        debug!(url, provider = provider.name(), "Matched remote URL");
        Some(provider.canonical_url(&remote))
    }

    /// Canonical URLs for `urls`, in input order. Unparseable URLs and
    /// unknown hosts contribute nothing.
    pub fn canonicalize(&self, urls: &[String]) -> Vec<String> {
        urls.iter()
            .filter_map(|url| self.canonical_url(url))
            .collect()
    }
}
