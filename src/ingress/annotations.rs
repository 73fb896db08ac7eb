use std::collections::BTreeMap;

pub const INGRESS_CLASS: &str = "kubernetes.io/ingress.class";

pub const FRONTEND_ENTRY_POINTS: &str = "traefik.ingress.kubernetes.io/frontend-entry-points";
pub const ROUTER_ENTRY_POINTS: &str = "traefik.ingress.kubernetes.io/router.entrypoints";
pub const ROUTER_MIDDLEWARES: &str = "traefik.ingress.kubernetes.io/router.middlewares";

pub const SSL_REDIRECT: &str = "ingress.kubernetes.io/ssl-redirect";

pub const AUTH_TYPE: &str = "ingress.kubernetes.io/auth-type";
pub const AUTH_SECRET: &str = "ingress.kubernetes.io/auth-secret";
pub const AUTH_HEADER_FIELD: &str = "ingress.kubernetes.io/auth-header-field";
pub const AUTH_REMOVE_HEADER: &str = "ingress.kubernetes.io/auth-remove-header";
pub const AUTH_REALM: &str = "ingress.kubernetes.io/auth-realm";

pub const CUSTOM_REQUEST_HEADERS: &str = "ingress.kubernetes.io/custom-request-headers";
pub const CUSTOM_RESPONSE_HEADERS: &str = "ingress.kubernetes.io/custom-response-headers";
pub const ALLOWED_HOSTS: &str = "ingress.kubernetes.io/allowed-hosts";
pub const PROXY_HEADERS: &str = "ingress.kubernetes.io/proxy-headers";
pub const SSL_TEMPORARY_REDIRECT: &str = "ingress.kubernetes.io/ssl-temporary-redirect";
pub const SSL_HOST: &str = "ingress.kubernetes.io/ssl-host";
pub const SSL_PROXY_HEADERS: &str = "ingress.kubernetes.io/ssl-proxy-headers";
pub const SSL_FORCE_HOST: &str = "ingress.kubernetes.io/ssl-force-host";
pub const HSTS_MAX_AGE: &str = "ingress.kubernetes.io/hsts-max-age";
pub const HSTS_INCLUDE_SUBDOMAINS: &str = "ingress.kubernetes.io/hsts-include-subdomains";
pub const HSTS_PRELOAD: &str = "ingress.kubernetes.io/hsts-preload";
pub const FORCE_HSTS: &str = "ingress.kubernetes.io/force-hsts";
pub const FRAME_DENY: &str = "ingress.kubernetes.io/frame-deny";
pub const CUSTOM_FRAME_OPTIONS_VALUE: &str = "ingress.kubernetes.io/custom-frame-options-value";
pub const CONTENT_TYPE_NOSNIFF: &str = "ingress.kubernetes.io/content-type-nosniff";
pub const BROWSER_XSS_FILTER: &str = "ingress.kubernetes.io/browser-xss-filter";
pub const CUSTOM_BROWSER_XSS_VALUE: &str = "ingress.kubernetes.io/custom-browser-xss-value";
pub const CONTENT_SECURITY_POLICY: &str = "ingress.kubernetes.io/content-security-policy";
pub const PUBLIC_KEY: &str = "ingress.kubernetes.io/public-key";
pub const REFERRER_POLICY: &str = "ingress.kubernetes.io/referrer-policy";
pub const IS_DEVELOPMENT: &str = "ingress.kubernetes.io/is-development";

pub const WHITELIST_SOURCE_RANGE: &str = "ingress.kubernetes.io/whitelist-source-range";
pub const WHITELIST_X_FORWARDED_FOR: &str = "ingress.kubernetes.io/whitelist-x-forwarded-for";

pub const REQUEST_MODIFIER: &str = "traefik.ingress.kubernetes.io/request-modifier";
pub const APP_ROOT: &str = "traefik.ingress.kubernetes.io/app-root";

pub const REDIRECT_ENTRY_POINT: &str = "traefik.ingress.kubernetes.io/redirect-entry-point";
pub const REDIRECT_PERMANENT: &str = "traefik.ingress.kubernetes.io/redirect-permanent";
pub const REDIRECT_REGEX: &str = "traefik.ingress.kubernetes.io/redirect-regex";
pub const REDIRECT_REPLACEMENT: &str = "traefik.ingress.kubernetes.io/redirect-replacement";

pub const RULE_TYPE: &str = "traefik.ingress.kubernetes.io/rule-type";
pub const REWRITE_TARGET: &str = "ingress.kubernetes.io/rewrite-target";

pub const ERROR_PAGES: &str = "traefik.ingress.kubernetes.io/error-pages";
pub const BUFFERING: &str = "traefik.ingress.kubernetes.io/buffering";
pub const CIRCUIT_BREAKER_EXPRESSION: &str =
    "traefik.ingress.kubernetes.io/circuit-breaker-expression";
pub const MAX_CONN_AMOUNT: &str = "traefik.ingress.kubernetes.io/max-conn-amount";
pub const MAX_CONN_EXTRACTOR_FUNC: &str = "traefik.ingress.kubernetes.io/max-conn-extractor-func";
pub const RESPONSE_FORWARDING_FLUSH_INTERVAL: &str =
    "traefik.ingress.kubernetes.io/responseforwarding-flushinterval";
pub const LOAD_BALANCER_METHOD: &str = "traefik.ingress.kubernetes.io/load-balancer-method";
pub const SERVICE_WEIGHTS: &str = "traefik.ingress.kubernetes.io/service-weights";
pub const PROTOCOL: &str = "ingress.kubernetes.io/protocol";
pub const PRESERVE_HOST: &str = "traefik.ingress.kubernetes.io/preserve-host";
pub const RATE_LIMIT: &str = "traefik.ingress.kubernetes.io/rate-limit";
pub const PRIORITY: &str = "traefik.ingress.kubernetes.io/priority";
pub const AFFINITY: &str = "traefik.ingress.kubernetes.io/affinity";
pub const SESSION_COOKIE_NAME: &str = "traefik.ingress.kubernetes.io/session-cookie-name";
pub const PASS_CLIENT_TLS_CERT: &str = "ingress.kubernetes.io/pass-client-tls-cert";

/// Annotations with no automatic equivalent, paired with a hint for the manual migration.
pub const UNSUPPORTED: [(&str, &str); 17] = [
    (ERROR_PAGES, "See https://docs.traefik.io/middlewares/errorpages/"),
    (BUFFERING, "See https://docs.traefik.io/middlewares/buffering/"),
    (
        CIRCUIT_BREAKER_EXPRESSION,
        "See https://docs.traefik.io/middlewares/circuitbreaker/",
    ),
    (MAX_CONN_AMOUNT, "See https://docs.traefik.io/middlewares/inflightreq/"),
    (
        MAX_CONN_EXTRACTOR_FUNC,
        "See https://docs.traefik.io/middlewares/inflightreq/",
    ),
    (
        RESPONSE_FORWARDING_FLUSH_INTERVAL,
        "See https://docs.traefik.io/providers/kubernetes-crd/",
    ),
    (
        LOAD_BALANCER_METHOD,
        "See https://docs.traefik.io/providers/kubernetes-crd/",
    ),
    (AUTH_REALM, "See https://docs.traefik.io/middlewares/basicauth/"),
    (
        SERVICE_WEIGHTS,
        "See https://docs.traefik.io/providers/kubernetes-crd/",
    ),
    (
        PROTOCOL,
        "set traefik.ingress.kubernetes.io/service.serversscheme on Service resource",
    ),
    (
        PRESERVE_HOST,
        "set traefik.ingress.kubernetes.io/service.passhostheader on Service resource",
    ),
    (
        REDIRECT_ENTRY_POINT,
        "See https://docs.traefik.io/middlewares/redirectscheme/",
    ),
    (RATE_LIMIT, "See https://docs.traefik.io/middlewares/ratelimit/"),
    (PRIORITY, "set traefik.ingress.kubernetes.io/router.priority"),
    (
        AFFINITY,
        "set traefik.ingress.kubernetes.io/service.sticky.cookie on Service resource",
    ),
    (
        SESSION_COOKIE_NAME,
        "set traefik.ingress.kubernetes.io/service.sticky.cookie.name on Service resource",
    ),
    (
        PASS_CLIENT_TLS_CERT,
        "See https://docs.traefik.io/middlewares/passtlsclientcert/",
    ),
];

const MAP_ENTRY_SEPARATOR: &str = "||";
const MAP_KEY_VALUE_SEPARATOR: char = ':';

/// 文字列アノテーションの読み取り専用ビュー
#[derive(Debug, Clone, Copy)]
pub struct Annotations<'a> {
    inner: Option<&'a BTreeMap<String, String>>,
}

impl<'a> Annotations<'a> {
    pub fn new(inner: Option<&'a BTreeMap<String, String>>) -> Self {
        Self { inner }
    }

    /// Returns the value, or `None` when the annotation is missing or empty.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.inner
            .and_then(|annotations| annotations.get(key))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(parse_bool).unwrap_or(default)
    }

    pub fn i64(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Comma-separated values, trimmed, empty entries dropped.
    pub fn slice(&self, key: &str) -> Option<Vec<String>> {
        let values: Vec<String> = self
            .get(key)?
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToString::to_string)
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values)
        }
    }

    /// `Name:value||Name:value` with canonicalized header names.
    pub fn header_map(&self, key: &str) -> Option<BTreeMap<String, String>> {
        let raw = self.get(key)?;

        let mut map = BTreeMap::new();

        for entry in raw.split(MAP_ENTRY_SEPARATOR) {
            match entry.split_once(MAP_KEY_VALUE_SEPARATOR) {
                Some((name, value)) if !name.trim().is_empty() => {
                    map.insert(
                        canonical_header_key(name.trim()),
                        value.trim().to_string(),
                    );
                }
                _ => {
                    log::warn!("Could not load {key:?}: {entry:?}, skipping...");
                }
            }
        }

        if map.is_empty() {
            log::warn!("Could not load {key:?}, skipping...");
            None
        } else {
            Some(map)
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// `x-forwarded-for` -> `X-Forwarded-For`
///
/// Names containing characters outside the HTTP token set are returned as is.
fn canonical_header_key(name: &str) -> String {
    let is_token = |c: char| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c);

    if !name.chars().all(is_token) {
        return name.to_string();
    }

    let mut upper = true;

    name.chars()
        .map(|c| {
            let c = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            c
        })
        .collect()
}
