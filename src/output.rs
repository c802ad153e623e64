use std::fmt::Write;

use console::style;
use giturlparse::ParsedUrl;
use giturlparse::Platform;
use giturlparse::PlatformDefinition;
use giturlparse::Protocol;
use giturlparse::platform::HostRule;
use serde::Serialize;

use crate::cli::parse::Field;

/// JSON shape of one parsed URL.
#[derive(Debug, Serialize)]
pub struct UrlReport<'a> {
    pub url: &'a str,
    pub valid: bool,
    pub platform: Option<Platform>,
    pub protocol: Option<Protocol>,
    pub host: &'a str,
    pub port: Option<u16>,
    pub user: &'a str,
    pub owner: &'a str,
    pub groups: &'a [String],
    pub repo: &'a str,
    pub path: &'a str,
    pub pathname: &'a str,
    pub branch: &'a str,
    pub github: bool,
    pub bitbucket: bool,
    pub assembla: bool,
    pub gitlab: bool,
    pub error: Option<String>,
}

impl<'a> From<&'a ParsedUrl> for UrlReport<'a> {
    fn from(parsed: &'a ParsedUrl) -> Self {
        Self {
            url: parsed.url(),
            valid: parsed.valid(),
            platform: parsed.platform(),
            protocol: parsed.protocol(),
            host: parsed.host(),
            port: parsed.port(),
            user: parsed.user(),
            owner: parsed.owner(),
            groups: parsed.groups(),
            repo: parsed.repo(),
            path: parsed.path(),
            pathname: parsed.pathname(),
            branch: parsed.branch(),
            github: parsed.is_github(),
            bitbucket: parsed.is_bitbucket(),
            assembla: parsed.is_assembla(),
            gitlab: parsed.is_gitlab(),
            error: parsed.error().map(ToString::to_string),
        }
    }
}

pub fn render_json(parsed: &[ParsedUrl]) -> serde_json::Result<String> {
    let reports: Vec<UrlReport<'_>> = parsed.iter().map(UrlReport::from).collect();
    serde_json::to_string_pretty(&reports)
}

/// One field as plain text. Absent values render as an empty string.
pub fn field_value(parsed: &ParsedUrl, field: Field) -> String {
    match field {
        Field::Valid => parsed.valid().to_string(),
        Field::Platform => parsed.platform().map(|p| p.to_string()).unwrap_or_default(),
        Field::Protocol => parsed.protocol().map(|p| p.to_string()).unwrap_or_default(),
        Field::Host => parsed.host().to_string(),
        Field::Port => parsed.port().map(|p| p.to_string()).unwrap_or_default(),
        Field::User => parsed.user().to_string(),
        Field::Owner => parsed.owner().to_string(),
        Field::Groups => parsed.groups().join("/"),
        Field::Repo => parsed.repo().to_string(),
        Field::Path => parsed.path().to_string(),
        Field::Pathname => parsed.pathname().to_string(),
        Field::Branch => parsed.branch().to_string(),
    }
}

const TEXT_FIELDS: [(&str, Field); 11] = [
    ("platform", Field::Platform),
    ("protocol", Field::Protocol),
    ("host", Field::Host),
    ("port", Field::Port),
    ("user", Field::User),
    ("owner", Field::Owner),
    ("groups", Field::Groups),
    ("repo", Field::Repo),
    ("branch", Field::Branch),
    ("path", Field::Path),
    ("pathname", Field::Pathname),
];

/// Multi-line, human-readable view of one result.
pub fn render_text(parsed: &ParsedUrl) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style(parsed.url()).bold());

    if parsed.valid() {
        let _ = writeln!(out, "  {:<9} {}", "valid", style("yes").green());
        for (label, field) in TEXT_FIELDS {
            let value = field_value(parsed, field);
            if !value.is_empty() {
                let _ = writeln!(out, "  {label:<9} {value}");
            }
        }
    } else {
        let _ = writeln!(out, "  {:<9} {}", "valid", style("no").red());
        if let Some(error) = parsed.error() {
            let _ = writeln!(out, "  {:<9} {error}", "error");
            if let Some(help) = miette::Diagnostic::help(error) {
                let _ = writeln!(out, "  {:<9} {help}", "help");
            }
        }
    }

    out
}

/// The registry in match order, one platform per line.
pub fn render_platforms(definitions: &[PlatformDefinition]) -> String {
    let mut out = String::new();
    for definition in definitions {
        let hosts = match &definition.hosts {
            HostRule::Exact(hosts) => hosts.join(", "),
            HostRule::Any => "any host (fallback)".to_string(),
        };
        let protocols: Vec<&str> = definition
            .patterns
            .iter()
            .map(|p| p.protocol.as_str())
            .collect();

        let _ = writeln!(out, "{}", style(definition.platform).bold());
        let _ = writeln!(out, "  hosts      {hosts}");
        let _ = writeln!(out, "  protocols  {}", protocols.join(", "));

        let mut features = Vec::new();
        if definition.patterns.iter().any(|p| p.nested_groups) {
            features.push("nested groups");
        }
        if definition.patterns.iter().any(|p| p.port) {
            features.push("ports");
        }
        if definition.patterns.iter().any(|p| p.sub_resources) {
            features.push("blob/tree paths");
        }
        if !features.is_empty() {
            let _ = writeln!(out, "  supports   {}", features.join(", "));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_report_carries_flags_and_fields() {
        let parsed = [giturlparse::parse(
            "https://github.com/nephila/giturlparse/tree/feature/py37",
        )];
        let json: serde_json::Value = serde_json::from_str(&render_json(&parsed).unwrap()).unwrap();
        let report = &json[0];
        assert_eq!(report["valid"], true);
        assert_eq!(report["platform"], "github");
        assert_eq!(report["protocol"], "https");
        assert_eq!(report["user"], "git");
        assert_eq!(report["branch"], "feature/py37");
        assert_eq!(report["pathname"], "/tree/feature/py37");
        assert_eq!(report["github"], true);
        assert_eq!(report["gitlab"], false);
        assert_eq!(report["port"], serde_json::Value::Null);
        assert_eq!(report["error"], serde_json::Value::Null);
    }

    #[test]
    fn json_report_for_invalid_url() {
        let parsed = [giturlparse::parse("git@github.com:Org")];
        let json: serde_json::Value = serde_json::from_str(&render_json(&parsed).unwrap()).unwrap();
        assert_eq!(json[0]["valid"], false);
        assert!(json[0]["error"].as_str().unwrap().contains("git@github.com:Org"));
    }

    #[test]
    fn field_values() {
        let parsed = giturlparse::parse("git@host.org:9999/Org/Group/subGroup/Repo.git");
        assert_eq!(field_value(&parsed, Field::Port), "9999");
        assert_eq!(field_value(&parsed, Field::Groups), "Group/subGroup");
        assert_eq!(field_value(&parsed, Field::Platform), "gitlab");
        assert_eq!(field_value(&parsed, Field::Valid), "true");
        assert_eq!(field_value(&parsed, Field::Branch), "");
    }

    #[test]
    fn text_skips_empty_fields() {
        let text = render_text(&giturlparse::parse("git@github.com:Org/Repo.git"));
        assert!(text.contains("owner     Org"));
        assert!(text.contains("repo      Repo"));
        assert!(!text.contains("branch"));
        assert!(!text.contains("port"));
    }

    #[test]
    fn text_explains_invalid_urls() {
        let text = render_text(&giturlparse::parse("ftp://host/Org/Repo"));
        assert!(text.contains("error"));
        assert!(text.contains("help"));
        assert!(text.contains("unrecognized git URL scheme"));
    }

    #[test]
    fn platforms_listing_in_order() {
        let text = render_platforms(giturlparse::definitions());
        let github = text.find("github.com").unwrap();
        let fallback = text.find("any host (fallback)").unwrap();
        assert!(github < fallback);
        assert!(text.contains("ssh, https, git"));
        assert!(text.contains("nested groups"));
    }
}
