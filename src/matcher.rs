use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;
use tracing::debug;
use tracing::trace;

use crate::error::MismatchReason;
use crate::error::ParseError;
use crate::platform::PathPattern;
use crate::platform::Platform;
use crate::platform::Protocol;
use crate::platform::Registry;

/// Path tokens that introduce a sub-resource after the repository.
const SUB_RESOURCE_MARKERS: [&str; 2] = ["blob", "tree"];

/// Separator segment some GitLab routes put before a marker (`/-/tree/...`).
const MARKER_SEPARATOR: &str = "-";

const GIT_SUFFIX: &str = ".git";

static SSH_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i:(?:git\+)?ssh://|ssh\+git://)?(?P<user>[^@/:\s]+)@(?P<host>[^@/:\s]+)(?::(?P<port>[0-9]+))?[:/](?P<path>\S*)$",
    )
    .expect("valid ssh url regex")
});

static HTTPS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i:(?:git\+)?https://)(?:(?P<user>[^@/:\s]+)@)?(?P<host>[^@/:\s]+)(?::(?P<port>[0-9]+))?/(?P<path>\S*)$",
    )
    .expect("valid https url regex")
});

static GIT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:git://)(?P<host>[^@/:\s]+)(?::(?P<port>[0-9]+))?/(?P<path>\S*)$")
        .expect("valid git url regex")
});

/// Raw captures from a successful structural match, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// The input, trimmed.
    pub url: String,
    pub protocol: Protocol,
    pub platform: Platform,
    /// `None` when the syntax carries no user.
    pub user: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub owner: String,
    /// Segments between owner and repository, still `/`-joined.
    pub groups_path: String,
    /// Repository segment as written, possibly ending in `.git`.
    pub repo: String,
    /// Everything after the repository, with its leading `/`.
    pub sub_path: String,
}

/// Pick the protocol from the URL shape alone.
///
/// Returns `None` for unknown schemes and for strings with neither a scheme
/// nor an `@`.
pub fn detect_protocol(url: &str) -> Option<Protocol> {
    if let Some(scheme) = scheme(url) {
        return match scheme.to_ascii_lowercase().as_str() {
            "ssh" | "git+ssh" | "ssh+git" => Some(Protocol::Ssh),
            "https" | "git+https" => Some(Protocol::Https),
            "git" => Some(Protocol::Git),
            _ => None,
        };
    }

    // scp-like: user@host:path
    url.split_once('@')
        .is_some_and(|(_, rest)| rest.contains([':', '/']))
        .then_some(Protocol::Ssh)
}

/// The text before `://`, unless it is part of a user, host or path.
fn scheme(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once("://")?;
    (!scheme.contains(['@', '/', ':'])).then_some(scheme)
}

fn authority_grammar(protocol: Protocol) -> &'static Regex {
    match protocol {
        Protocol::Ssh => &SSH_URL,
        Protocol::Https => &HTTPS_URL,
        Protocol::Git => &GIT_URL,
    }
}

/// Match `url` against `registry`.
///
/// The first definition that accepts the host and defines the detected
/// protocol is authoritative: if its path grammar rejects the URL, later
/// definitions are not consulted.
pub fn match_url(registry: &Registry, url: &str) -> Result<MatchResult, ParseError> {
    let url = url.trim();
    let Some(protocol) = detect_protocol(url) else {
        trace!(url, "no protocol recognized");
        return Err(ParseError::UnknownProtocol {
            url: url.to_string(),
        });
    };

    let mismatch = |reason: MismatchReason| {
        trace!(url, %protocol, %reason, "structural mismatch");
        ParseError::StructuralMismatch {
            url: url.to_string(),
            protocol,
            reason,
        }
    };

    let captures = authority_grammar(protocol)
        .captures(url)
        .ok_or_else(|| mismatch(MismatchReason::MalformedAuthority))?;
    let host = &captures["host"];

    let (definition, pattern) = registry
        .authoritative(host, protocol)
        .ok_or_else(|| mismatch(MismatchReason::NoPlatform))?;
    debug!(url, %protocol, platform = %definition.platform, "matched platform");

    let (port, raw_path) = match captures.name("port") {
        // scp-like `host:1234/...` on a platform without ports: the digits
        // are the first path segment.
        Some(digits) if !pattern.port && scheme(url).is_none() => (None, &url[digits.start()..]),
        _ => (
            capture_port(&captures, pattern).map_err(mismatch)?,
            &captures["path"],
        ),
    };
    let raw_path = raw_path.strip_suffix('/').unwrap_or(raw_path);
    let segments: Vec<&str> = if raw_path.is_empty() {
        Vec::new()
    } else {
        raw_path.split('/').collect()
    };
    let path = split_path(&segments, pattern).map_err(mismatch)?;

    Ok(MatchResult {
        url: url.to_string(),
        protocol,
        platform: definition.platform,
        user: captures.name("user").map(|m| m.as_str().to_string()),
        host: host.to_string(),
        port,
        owner: path.owner.to_string(),
        groups_path: path.groups.join("/"),
        repo: path.repo.to_string(),
        sub_path: path.sub_resource.iter().map(|s| format!("/{s}")).collect(),
    })
}

fn capture_port(
    captures: &Captures<'_>,
    pattern: &PathPattern,
) -> Result<Option<u16>, MismatchReason> {
    let Some(port) = captures.name("port") else {
        return Ok(None);
    };
    if !pattern.port {
        return Err(MismatchReason::PortNotAllowed);
    }
    port.as_str()
        .parse()
        .map(Some)
        .map_err(|_| MismatchReason::PortOutOfRange)
}

/// A path split at its structural boundaries.
#[derive(Debug, Default, PartialEq, Eq)]
struct PathSegments<'a> {
    owner: &'a str,
    groups: &'a [&'a str],
    repo: &'a str,
    sub_resource: &'a [&'a str],
}

fn split_path<'a>(
    segments: &'a [&'a str],
    pattern: &PathPattern,
) -> Result<PathSegments<'a>, MismatchReason> {
    if segments.is_empty() {
        return Ok(PathSegments::default());
    }
    let (namespace, sub_resource) = segments.split_at(namespace_end(segments, pattern));
    if namespace.iter().any(|s| s.is_empty()) {
        return Err(MismatchReason::EmptySegment);
    }
    if !sub_resource.is_empty() && !(pattern.sub_resources && is_sub_resource(sub_resource)) {
        return Err(MismatchReason::UnknownSubResource);
    }

    let Some((owner, rest)) = namespace.split_first() else {
        return Ok(PathSegments::default());
    };
    let (repo, groups): (&str, &[&str]) = match rest.split_last() {
        Some((repo, groups)) => (*repo, groups),
        None => ("", &[]),
    };
    if !groups.is_empty() && !pattern.nested_groups {
        return Err(MismatchReason::NestedGroups);
    }

    Ok(PathSegments {
        owner: *owner,
        groups,
        repo,
        sub_resource,
    })
}

/// Index one past the repository segment.
///
/// The namespace ends at the first `.git`-suffixed segment after the owner,
/// before the first `-` separator after the owner, or before the first
/// sub-resource marker that has both an owner and a repository in front of
/// it, whichever comes first.
fn namespace_end(segments: &[&str], pattern: &PathPattern) -> usize {
    for (i, segment) in segments.iter().enumerate().skip(1) {
        if *segment == MARKER_SEPARATOR {
            return i;
        }
        if i >= 2 && pattern.sub_resources && is_sub_resource(&segments[i..]) {
            return i;
        }
        if segment.len() > GIT_SUFFIX.len() && segment.ends_with(GIT_SUFFIX) {
            return i + 1;
        }
    }
    segments.len()
}

/// `[-/]blob/<..>` or `[-/]tree/<..>` with at least one segment after the
/// marker.
fn is_sub_resource(segments: &[&str]) -> bool {
    let segments = match segments {
        [MARKER_SEPARATOR, rest @ ..] => rest,
        _ => segments,
    };
    matches!(segments, [marker, _, ..] if SUB_RESOURCE_MARKERS.contains(marker))
}
