use crate::error::ParseError;
use crate::matcher::MatchResult;
use crate::platform::Platform;
use crate::platform::Protocol;

/// Account every supported hosting convention uses for Git transport.
pub const DEFAULT_USER: &str = "git";

/// A decomposed Git repository URL.
///
/// Immutable once built. `valid()` and the platform predicates are derived
/// from the stored fields, so they can never disagree with them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUrl {
    url: String,
    protocol: Option<Protocol>,
    host: String,
    port: Option<u16>,
    user: String,
    owner: String,
    groups: Vec<String>,
    repo: String,
    path: String,
    pathname: String,
    branch: String,
    platform: Option<Platform>,
    error: Option<ParseError>,
}

/// Normalize raw captures into a [`ParsedUrl`].
///
/// Strips `.git` from the repository, splits the group path and reads the
/// sub-resource suffix. An empty owner or repository yields an invalid
/// result carrying the other fields.
pub fn build(captures: MatchResult) -> ParsedUrl {
    let repo = captures
        .repo
        .strip_suffix(".git")
        .unwrap_or(&captures.repo)
        .to_string();

    let groups = if captures.groups_path.is_empty() {
        Vec::new()
    } else {
        captures.groups_path.split('/').map(String::from).collect()
    };

    let (path, branch) = match sub_resource(&captures.sub_path) {
        Some(SubResource::Blob(path)) => (path.to_string(), String::new()),
        Some(SubResource::Tree(branch)) => (String::new(), branch.to_string()),
        None => (String::new(), String::new()),
    };

    let error = (captures.owner.is_empty() || repo.is_empty()).then(|| {
        ParseError::MissingOwnerOrRepo {
            url: captures.url.clone(),
        }
    });

    ParsedUrl {
        url: captures.url,
        protocol: Some(captures.protocol),
        host: captures.host,
        port: captures.port,
        user: captures.user.unwrap_or_else(|| DEFAULT_USER.to_string()),
        owner: captures.owner,
        groups,
        repo,
        path,
        pathname: captures.sub_path,
        branch,
        platform: Some(captures.platform),
        error,
    }
}

enum SubResource<'a> {
    /// File path, starting with the ref.
    Blob(&'a str),
    /// Ref name, which may contain `/`.
    Tree(&'a str),
}

/// Everything after a `tree` marker is the branch, including any `/`.
fn sub_resource(sub_path: &str) -> Option<SubResource<'_>> {
    let rest = sub_path.strip_prefix('/')?;
    let rest = rest.strip_prefix("-/").unwrap_or(rest);
    match rest.split_once('/')? {
        ("blob", path) => Some(SubResource::Blob(path)),
        ("tree", branch) => Some(SubResource::Tree(branch)),
        _ => None,
    }
}

impl ParsedUrl {
    /// A rejected URL. Only the protocol, when it was detected, survives.
    pub fn invalid(error: ParseError) -> Self {
        let url = match &error {
            ParseError::UnknownProtocol { url }
            | ParseError::StructuralMismatch { url, .. }
            | ParseError::MissingOwnerOrRepo { url } => url.clone(),
        };
        Self {
            url,
            protocol: error.protocol(),
            error: Some(error),
            ..Self::default()
        }
    }

    /// True iff both owner and repository are non-empty.
    pub fn valid(&self) -> bool {
        !self.owner.is_empty() && !self.repo.is_empty()
    }

    /// `Ok(self)` when valid, otherwise the reason it is not.
    pub fn into_result(self) -> Result<Self, ParseError> {
        if self.valid() {
            return Ok(self);
        }
        let url = self.url.clone();
        Err(self
            .error
            .unwrap_or(ParseError::MissingOwnerOrRepo { url }))
    }

    /// The input as parsed, with surrounding whitespace trimmed.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn protocol(&self) -> Option<Protocol> {
        self.protocol
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Connecting user; `"git"` unless the URL names one.
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Namespaces between owner and repository, outermost first.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Repository name without `.git`.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// File path after a `blob` marker, beginning with the ref.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw sub-resource suffix including its marker, e.g.
    /// `/blob/master/file.py`.
    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    /// Ref after a `tree` marker.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn platform(&self) -> Option<Platform> {
        self.platform
    }

    /// Why the URL is invalid. `None` for valid URLs.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    pub fn is_platform(&self, platform: Platform) -> bool {
        self.platform == Some(platform)
    }

    pub fn is_github(&self) -> bool {
        self.is_platform(Platform::GitHub)
    }

    pub fn is_bitbucket(&self) -> bool {
        self.is_platform(Platform::Bitbucket)
    }

    pub fn is_assembla(&self) -> bool {
        self.is_platform(Platform::Assembla)
    }

    pub fn is_gitlab(&self) -> bool {
        self.is_platform(Platform::GitLab)
    }
}
