//! Classify and decompose Git repository URLs.
//!
//! Accepts scp-like SSH (`git@host:owner/repo.git`), `ssh://`, `https://` and
//! `git://` URLs and splits them into host, port, user, owner, nested groups,
//! repository and an optional `blob`/`tree` sub-resource.
//!
//! ```
//! let url = giturlparse::parse("git@host.org:9999/Org/Group/subGroup/Repo.git");
//! assert!(url.valid());
//! assert_eq!(url.owner(), "Org");
//! assert_eq!(url.groups(), ["Group", "subGroup"]);
//! assert_eq!(url.repo(), "Repo");
//! assert_eq!(url.port(), Some(9999));
//! assert!(url.is_gitlab());
//! ```
//!
//! Parsing never fails: a rejected URL comes back with `valid() == false`.
//! Use [`try_parse`] to get the reason as an error instead.

pub mod error;
pub mod matcher;
pub mod parsed;
pub mod platform;

pub use crate::error::ParseError;
pub use crate::parsed::ParsedUrl;
pub use crate::platform::Platform;
pub use crate::platform::PlatformDefinition;
pub use crate::platform::Protocol;
pub use crate::platform::Registry;

/// Parse `url` with the built-in platforms.
pub fn parse(url: &str) -> ParsedUrl {
    Registry::builtin().parse(url)
}

/// Parse `url`, returning the rejection reason for invalid URLs.
///
/// # Errors
///
/// Returns the [`ParseError`] that made the URL invalid.
pub fn try_parse(url: &str) -> Result<ParsedUrl, ParseError> {
    parse(url).into_result()
}

/// The built-in platform definitions in match order.
pub fn definitions() -> &'static [PlatformDefinition] {
    Registry::builtin().definitions()
}
