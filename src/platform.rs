use std::fmt;
use std::sync::LazyLock;

use serde::Deserialize;
use serde::Serialize;

use crate::matcher;
use crate::parsed;
use crate::parsed::ParsedUrl;

/// Transport a Git URL is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Ssh,
    Https,
    Git,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ssh => "ssh",
            Self::Https => "https",
            Self::Git => "git",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hosting convention a URL was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    GitHub,
    Bitbucket,
    Assembla,
    GitLab,
}

impl Platform {
    /// Symbolic tag, e.g. `"github"`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::Bitbucket => "bitbucket",
            Self::Assembla => "assembla",
            Self::GitLab => "gitlab",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Which hosts a platform definition is authoritative for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRule {
    /// Only the listed hostnames, compared ASCII case-insensitively.
    Exact(Vec<String>),
    /// Any host. Used by the fallback definition.
    Any,
}

impl HostRule {
    pub fn accepts(&self, host: &str) -> bool {
        match self {
            Self::Exact(hosts) => hosts.iter().any(|h| h.eq_ignore_ascii_case(host)),
            Self::Any => true,
        }
    }
}

/// Path grammar a platform accepts for one protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPattern {
    pub protocol: Protocol,
    /// Namespace segments may appear between owner and repository.
    pub nested_groups: bool,
    /// A numeric port may follow the host.
    pub port: bool,
    /// `blob`/`tree` suffixes after the repository are recognised.
    pub sub_resources: bool,
}

impl PathPattern {
    /// Flat `owner/repo` grammar with `blob`/`tree` suffixes.
    const fn owner_repo(protocol: Protocol) -> Self {
        Self {
            protocol,
            nested_groups: false,
            port: false,
            sub_resources: true,
        }
    }

    /// Flat `owner/repo` grammar with nothing after the repository.
    const fn bare(protocol: Protocol) -> Self {
        Self {
            protocol,
            nested_groups: false,
            port: false,
            sub_resources: false,
        }
    }

    /// `owner/group.../repo` grammar with ports and suffixes.
    const fn nested(protocol: Protocol) -> Self {
        Self {
            protocol,
            nested_groups: true,
            port: true,
            sub_resources: true,
        }
    }
}

/// One supported hosting convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDefinition {
    pub platform: Platform,
    pub hosts: HostRule,
    /// At most one pattern per protocol.
    pub patterns: Vec<PathPattern>,
}

impl PlatformDefinition {
    pub fn pattern(&self, protocol: Protocol) -> Option<&PathPattern> {
        self.patterns.iter().find(|p| p.protocol == protocol)
    }

    pub fn is_fallback(&self) -> bool {
        self.hosts == HostRule::Any
    }
}

/// Additional hostnames for the exact-host platforms, e.g. a GitHub
/// Enterprise server. The fallback accepts any host already.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostOverrides {
    pub github: Vec<String>,
    pub bitbucket: Vec<String>,
    pub assembla: Vec<String>,
}

impl HostOverrides {
    pub fn hosts_for(&self, platform: Platform) -> &[String] {
        match platform {
            Platform::GitHub => &self.github,
            Platform::Bitbucket => &self.bitbucket,
            Platform::Assembla => &self.assembla,
            Platform::GitLab => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.github.is_empty() && self.bitbucket.is_empty() && self.assembla.is_empty()
    }
}

/// Ordered, immutable set of platform definitions.
#[derive(Debug, Clone)]
pub struct Registry {
    definitions: Vec<PlatformDefinition>,
}

static BUILTIN: LazyLock<Registry> = LazyLock::new(|| Registry {
    definitions: builtin_definitions(),
});

fn builtin_definitions() -> Vec<PlatformDefinition> {
    vec![
        PlatformDefinition {
            platform: Platform::GitHub,
            hosts: HostRule::Exact(vec!["github.com".to_string()]),
            patterns: vec![
                PathPattern::owner_repo(Protocol::Ssh),
                PathPattern::owner_repo(Protocol::Https),
                PathPattern::owner_repo(Protocol::Git),
            ],
        },
        PlatformDefinition {
            platform: Platform::Bitbucket,
            hosts: HostRule::Exact(vec!["bitbucket.org".to_string()]),
            patterns: vec![
                PathPattern::owner_repo(Protocol::Ssh),
                PathPattern::owner_repo(Protocol::Https),
            ],
        },
        PlatformDefinition {
            platform: Platform::Assembla,
            hosts: HostRule::Exact(vec!["git.assembla.com".to_string()]),
            patterns: vec![
                PathPattern::bare(Protocol::Ssh),
                PathPattern::bare(Protocol::Git),
            ],
        },
        PlatformDefinition {
            platform: Platform::GitLab,
            hosts: HostRule::Any,
            patterns: vec![
                PathPattern::nested(Protocol::Ssh),
                PathPattern::nested(Protocol::Https),
                PathPattern::nested(Protocol::Git),
            ],
        },
    ]
}

impl Registry {
    /// The process-wide registry of built-in platforms.
    pub fn builtin() -> &'static Registry {
        &BUILTIN
    }

    pub fn definitions(&self) -> &[PlatformDefinition] {
        &self.definitions
    }

    /// A copy of this registry whose exact-host platforms also accept the
    /// hostnames in `overrides`. Order and the fallback are unchanged.
    #[must_use]
    pub fn with_extra_hosts(&self, overrides: &HostOverrides) -> Registry {
        let definitions = self
            .definitions
            .iter()
            .cloned()
            .map(|mut definition| {
                if let HostRule::Exact(hosts) = &mut definition.hosts {
                    for extra in overrides.hosts_for(definition.platform) {
                        let extra = extra.trim();
                        if !extra.is_empty() && !hosts.iter().any(|h| h.eq_ignore_ascii_case(extra))
                        {
                            hosts.push(extra.to_ascii_lowercase());
                        }
                    }
                }
                definition
            })
            .collect();

        Registry { definitions }
    }

    /// The definition authoritative for `host` over `protocol`: the first one
    /// in order that accepts the host and defines a pattern for the protocol.
    pub fn authoritative(
        &self,
        host: &str,
        protocol: Protocol,
    ) -> Option<(&PlatformDefinition, &PathPattern)> {
        self.definitions
            .iter()
            .filter(|definition| definition.hosts.accepts(host))
            .find_map(|definition| {
                definition
                    .pattern(protocol)
                    .map(|pattern| (definition, pattern))
            })
    }

    /// Parse `url` against this registry. Never fails; rejection is reported
    /// through [`ParsedUrl::valid`].
    pub fn parse(&self, url: &str) -> ParsedUrl {
        match matcher::match_url(self, url) {
            Ok(captures) => parsed::build(captures),
            Err(error) => ParsedUrl::invalid(error),
        }
    }
}
