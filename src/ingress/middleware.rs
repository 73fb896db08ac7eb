use std::collections::BTreeMap;

use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Traefik 2.x Middleware
///
/// A middleware holds exactly one kind; the kind is flattened into `spec`
/// (`spec.stripPrefix`, `spec.headers`, ...).
#[derive(CustomResource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[kube(
    group = "traefik.containo.us",
    version = "v1alpha1",
    kind = "Middleware",
    namespaced,
    derive = "PartialEq",
    schema = "disabled"
)]
pub struct MiddlewareSpec {
    #[serde(flatten)]
    pub kind: MiddlewareKind,
}

impl Middleware {
    pub fn with_kind(namespace: &str, name: &str, kind: MiddlewareKind) -> Self {
        let mut middleware = Middleware::new(name, MiddlewareSpec { kind });
        middleware.metadata.namespace = Some(namespace.to_string());
        middleware
    }

    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MiddlewareKind {
    BasicAuth(BasicAuth),
    Headers(Headers),
    #[serde(rename = "ipWhiteList")]
    IPWhiteList(IPWhiteList),
    RedirectRegex(RedirectRegex),
    ReplacePath(ReplacePath),
    ReplacePathRegex(ReplacePathRegex),
    AddPrefix(AddPrefix),
    StripPrefix(StripPrefix),
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicAuth {
    pub secret: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub remove_header: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_field: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_request_headers: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_response_headers: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_hosts: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts_proxy_headers: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_temporary_redirect: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_proxy_headers: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_force_host: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sts_seconds: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sts_include_subdomains: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sts_preload: Option<bool>,

    #[serde(
        default,
        rename = "forceSTSHeader",
        skip_serializing_if = "Option::is_none"
    )]
    pub force_sts_header: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_deny: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_frame_options_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type_nosniff: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_xss_filter: Option<bool>,

    #[serde(
        default,
        rename = "customBrowserXSSValue",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_browser_xss_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_security_policy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer_policy: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_development: Option<bool>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IPWhiteList {
    pub source_range: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_strategy: Option<IPStrategy>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IPStrategy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<i64>,

    #[serde(
        default,
        rename = "excludedIPs",
        skip_serializing_if = "Option::is_none"
    )]
    pub excluded_ips: Option<Vec<String>>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectRegex {
    pub regex: String,

    pub replacement: String,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub permanent: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacePath {
    pub path: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacePathRegex {
    pub regex: String,

    pub replacement: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddPrefix {
    pub prefix: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripPrefix {
    pub prefixes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn serialize_with_kind_flattened_into_spec() {
        let middleware = Middleware::with_kind(
            "apps",
            "whoami-strip-prefix-example-com-api",
            MiddlewareKind::StripPrefix(StripPrefix {
                prefixes: vec!["/api".into()],
            }),
        );

        let actual = serde_yaml::to_string(&middleware).unwrap();

        let expected = indoc! {"
            apiVersion: traefik.containo.us/v1alpha1
            kind: Middleware
            metadata:
              name: whoami-strip-prefix-example-com-api
              namespace: apps
            spec:
              stripPrefix:
                prefixes:
                - /api
        "};

        assert_eq!(actual, expected);
    }

    #[test]
    fn unset_fields_are_omitted() {
        let middleware = Middleware::with_kind(
            "apps",
            "whoami-whitelist",
            MiddlewareKind::IPWhiteList(IPWhiteList {
                source_range: vec!["10.0.0.0/8".into()],
                ip_strategy: None,
            }),
        );

        let actual = serde_yaml::to_string(&middleware).unwrap();

        let expected = indoc! {"
            apiVersion: traefik.containo.us/v1alpha1
            kind: Middleware
            metadata:
              name: whoami-whitelist
              namespace: apps
            spec:
              ipWhiteList:
                sourceRange:
                - 10.0.0.0/8
        "};

        assert_eq!(actual, expected);
    }

    #[test]
    fn deserialize_middleware() {
        let actual: Middleware = serde_yaml::from_str(indoc! {"
            apiVersion: traefik.containo.us/v1alpha1
            kind: Middleware
            metadata:
              name: whoami-headers
              namespace: apps
            spec:
              headers:
                frameDeny: true
                forceSTSHeader: true
                customBrowserXSSValue: 1; mode=block
        "})
        .unwrap();

        assert_eq!(actual.name(), "whoami-headers");
        assert_eq!(actual.namespace(), "apps");
        assert_eq!(
            actual.spec.kind,
            MiddlewareKind::Headers(Headers {
                frame_deny: Some(true),
                force_sts_header: Some(true),
                custom_browser_xss_value: Some("1; mode=block".into()),
                ..Default::default()
            })
        );
    }
}
