//! アノテーションごとのMiddleware生成
//!
//! Each function reads one legacy directive and returns the middleware kind it
//! maps to, or `None` when the directive is absent or unusable.

use super::{
    annotations::*,
    middleware::{
        BasicAuth, Headers, IPStrategy, IPWhiteList, MiddlewareKind, RedirectRegex,
        ReplacePathRegex, StripPrefix,
    },
};

const BASIC_AUTH_TYPE: &str = "basic";

pub fn basic_auth(annotations: &Annotations, resource: &str) -> Option<MiddlewareKind> {
    let auth_type = annotations.get(AUTH_TYPE)?;

    if !auth_type.eq_ignore_ascii_case(BASIC_AUTH_TYPE) {
        log::warn!(
            "{resource}: The annotation {AUTH_TYPE}={auth_type} on Ingress must be converted manually. See https://docs.traefik.io/middlewares/overview/"
        );
        return None;
    }

    let Some(secret) = annotations.get(AUTH_SECRET) else {
        log::warn!("{resource}: {AUTH_TYPE} is {auth_type} but {AUTH_SECRET} is not set, skipping");
        return None;
    };

    Some(MiddlewareKind::BasicAuth(BasicAuth {
        secret: secret.to_string(),
        remove_header: annotations.bool(AUTH_REMOVE_HEADER, false),
        header_field: annotations.get(AUTH_HEADER_FIELD).map(ToString::to_string),
    }))
}

/// Aggregates every header annotation into a single `Headers` middleware.
pub fn headers(annotations: &Annotations) -> Option<MiddlewareKind> {
    let flag = |key: &str| annotations.bool(key, false).then_some(true);
    let string = |key: &str| annotations.get(key).map(ToString::to_string);

    let headers = Headers {
        custom_request_headers: annotations.header_map(CUSTOM_REQUEST_HEADERS),
        custom_response_headers: annotations.header_map(CUSTOM_RESPONSE_HEADERS),
        allowed_hosts: annotations.slice(ALLOWED_HOSTS),
        hosts_proxy_headers: annotations.slice(PROXY_HEADERS),
        ssl_temporary_redirect: flag(SSL_TEMPORARY_REDIRECT),
        ssl_host: string(SSL_HOST),
        ssl_proxy_headers: annotations.header_map(SSL_PROXY_HEADERS),
        ssl_force_host: flag(SSL_FORCE_HOST),
        sts_seconds: Some(annotations.i64(HSTS_MAX_AGE, 0)).filter(|seconds| *seconds > 0),
        sts_include_subdomains: flag(HSTS_INCLUDE_SUBDOMAINS),
        sts_preload: flag(HSTS_PRELOAD),
        force_sts_header: flag(FORCE_HSTS),
        frame_deny: flag(FRAME_DENY),
        custom_frame_options_value: string(CUSTOM_FRAME_OPTIONS_VALUE),
        content_type_nosniff: flag(CONTENT_TYPE_NOSNIFF),
        browser_xss_filter: flag(BROWSER_XSS_FILTER),
        custom_browser_xss_value: string(CUSTOM_BROWSER_XSS_VALUE),
        content_security_policy: string(CONTENT_SECURITY_POLICY),
        public_key: string(PUBLIC_KEY),
        referrer_policy: string(REFERRER_POLICY),
        is_development: flag(IS_DEVELOPMENT),
    };

    (headers != Headers::default()).then_some(MiddlewareKind::Headers(headers))
}

pub fn ip_white_list(annotations: &Annotations) -> Option<MiddlewareKind> {
    let source_range = annotations.slice(WHITELIST_SOURCE_RANGE)?;

    // X-Forwarded-Forの右端のIPをクライアントIPとして扱う
    let ip_strategy = annotations
        .bool(WHITELIST_X_FORWARDED_FOR, false)
        .then_some(IPStrategy {
            depth: Some(1),
            excluded_ips: None,
        });

    Some(MiddlewareKind::IPWhiteList(IPWhiteList {
        source_range,
        ip_strategy,
    }))
}

pub fn redirect(annotations: &Annotations, resource: &str) -> Option<MiddlewareKind> {
    match (
        annotations.get(REDIRECT_REGEX),
        annotations.get(REDIRECT_REPLACEMENT),
    ) {
        (Some(regex), Some(replacement)) => Some(MiddlewareKind::RedirectRegex(RedirectRegex {
            regex: regex.to_string(),
            replacement: replacement.to_string(),
            permanent: annotations.bool(REDIRECT_PERMANENT, false),
        })),
        (None, None) => None,
        _ => {
            log::warn!(
                "{resource}: {REDIRECT_REGEX} and {REDIRECT_REPLACEMENT} must be set together, skipping"
            );
            None
        }
    }
}

pub fn strip_prefix(path: &str) -> MiddlewareKind {
    MiddlewareKind::StripPrefix(StripPrefix {
        prefixes: vec![path.to_string()],
    })
}

/// `rewrite-target` の置き換え
pub fn rewrite_target(path: &str, target: &str) -> MiddlewareKind {
    MiddlewareKind::ReplacePathRegex(ReplacePathRegex {
        regex: format!("^{path}(.*)"),
        replacement: format!("{}$1", target.trim_end_matches('/')),
    })
}

/// Redirect from the root of `host + path` to the application root.
///
/// Only applies to `/` and empty paths.
pub fn app_root(annotations: &Annotations, host: &str, path: &str) -> Option<MiddlewareKind> {
    let app_root = annotations.get(APP_ROOT)?;

    if !path.is_empty() && path != "/" {
        return None;
    }

    let base = format!("{host}{path}");

    let regex = if path.is_empty() {
        format!("{host}/$")
    } else {
        format!("{base}$")
    };

    Some(MiddlewareKind::RedirectRegex(RedirectRegex {
        regex,
        replacement: format!(
            "{}/{}",
            base.trim_end_matches('/'),
            app_root.trim_start_matches('/')
        ),
        permanent: annotations.bool(REDIRECT_PERMANENT, false),
    }))
}
