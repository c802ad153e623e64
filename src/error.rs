use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::platform::Protocol;

/// Errors that can occur while parsing a Git URL.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ParseError {
    /// Neither a known scheme nor the scp-like `user@host:path` shape.
    #[error("unrecognized git URL scheme: '{url}'")]
    #[diagnostic(help("use `user@host:owner/repo`, `ssh://`, `https://` or `git://`"))]
    UnknownProtocol { url: String },

    /// The protocol was recognised but the URL does not fit its grammar.
    #[error("'{url}' is not a valid {protocol} URL: {reason}")]
    #[diagnostic(help("run `giturlparse platforms` to list the accepted forms"))]
    StructuralMismatch {
        url: String,
        protocol: Protocol,
        reason: MismatchReason,
    },

    /// Matched, but the owner or the repository is empty.
    #[error("'{url}' has no owner/repository path")]
    #[diagnostic(help("a repository URL needs at least `owner/repo` after the host"))]
    MissingOwnerOrRepo { url: String },
}

impl ParseError {
    /// The protocol that was detected before the failure, if any.
    pub fn protocol(&self) -> Option<Protocol> {
        match self {
            Self::StructuralMismatch { protocol, .. } => Some(*protocol),
            Self::UnknownProtocol { .. } | Self::MissingOwnerOrRepo { .. } => None,
        }
    }
}

/// The part of the grammar a structurally mismatched URL violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchReason {
    /// User, host, port or path separator could not be read.
    MalformedAuthority,
    /// No platform defines a pattern for this host and protocol.
    NoPlatform,
    PortNotAllowed,
    PortOutOfRange,
    EmptySegment,
    /// Namespace segments between owner and repository on a flat platform.
    NestedGroups,
    /// Something other than a `blob`/`tree` suffix follows the repository.
    UnknownSubResource,
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedAuthority => write!(f, "expected user, host and path"),
            Self::NoPlatform => write!(f, "no platform accepts this host"),
            Self::PortNotAllowed => write!(f, "this platform does not use ports"),
            Self::PortOutOfRange => write!(f, "port is out of range"),
            Self::EmptySegment => write!(f, "empty path segment"),
            Self::NestedGroups => write!(f, "this platform does not support nested groups"),
            Self::UnknownSubResource => {
                write!(f, "expected `blob/<ref>` or `tree/<ref>` after the repository")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_mismatch_names_protocol_and_reason() {
        let err = ParseError::StructuralMismatch {
            url: "https://github.com/a/b/c".into(),
            protocol: Protocol::Https,
            reason: MismatchReason::NestedGroups,
        };
        assert_eq!(
            err.to_string(),
            "'https://github.com/a/b/c' is not a valid https URL: this platform does not \
             support nested groups"
        );
        assert_eq!(err.protocol(), Some(Protocol::Https));
    }

    #[test]
    fn unknown_protocol_is_actionable() {
        let err = ParseError::UnknownProtocol {
            url: "ftp://host/a/b".into(),
        };
        assert!(err.to_string().contains("ftp://host/a/b"));
        assert_eq!(err.protocol(), None);
        let help = miette::Diagnostic::help(&err).expect("UnknownProtocol should have help");
        let help_text = help.to_string();
        assert!(help_text.contains("ssh://"));
        assert!(help_text.contains("git://"));
    }

    #[test]
    fn missing_owner_or_repo_has_help() {
        let err = ParseError::MissingOwnerOrRepo {
            url: "git://github.com/Org".into(),
        };
        let help = miette::Diagnostic::help(&err).expect("MissingOwnerOrRepo should have help");
        assert!(help.to_string().contains("owner/repo"));
    }
}
