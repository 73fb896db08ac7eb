use k8s_openapi::api::networking::v1::Ingress;

use crate::{config::Config, error::Result};

use super::{
    annotations::*,
    codec::{Codec, Resource},
    directives,
    error::ConvertError,
    list::extract_list,
    manifest,
    middleware::{Middleware, MiddlewareKind},
    name::normalize_object_name,
    request_modifier::parse_request_modifier,
    rule_type::{ResolvedRuleType, RuleType},
};

/// Rewritten ingress and the middlewares it references, sorted by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub ingress: Ingress,
    pub middlewares: Vec<Middleware>,
}

/// Middlewares collected for one ingress, in reference order.
struct MiddlewareChain<'a> {
    namespace: &'a str,
    owner: &'a str,
    provider: &'a str,
    references: Vec<String>,
    middlewares: Vec<Middleware>,
}

impl<'a> MiddlewareChain<'a> {
    fn new(namespace: &'a str, owner: &'a str, provider: &'a str) -> Self {
        Self {
            namespace,
            owner,
            provider,
            references: Vec::new(),
            middlewares: Vec::new(),
        }
    }

    /// 既存のMiddlewareへの参照のみ追加する
    fn reference(&mut self, reference: &str) {
        self.references.push(reference.to_string());
    }

    fn push(&mut self, suffix: &str, kind: MiddlewareKind) {
        let name = format!("{}-{suffix}", self.owner);

        // 正規化後に同名になるパスは最初の1つだけ残す
        if self.middlewares.iter().any(|m| m.name() == name) {
            log::warn!(
                "{}/{}: Middleware {name} is generated more than once, keeping the first one",
                self.namespace,
                self.owner
            );
            return;
        }

        self.references
            .push(format!("{}-{name}@{}", self.namespace, self.provider));

        self.middlewares
            .push(Middleware::with_kind(self.namespace, &name, kind));
    }

    fn finish(self) -> (Vec<String>, Vec<Middleware>) {
        let mut middlewares = self.middlewares;
        middlewares.sort_by(|a, b| a.name().cmp(b.name()));
        (self.references, middlewares)
    }
}

/// `<prefix>-<normalized host+path>`, or just `<prefix>` when nothing is left
/// after normalization.
fn suffix_with(prefix: &str, host_path: &str) -> String {
    let normalized = normalize_object_name(host_path);

    if normalized.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}-{normalized}")
    }
}

/// Converts legacy Traefik ingresses to Traefik 2.x resources.
///
/// Built once per run; holds the configuration and the codec.
#[derive(Debug, Clone)]
pub struct Converter {
    config: Config,
    codec: Codec,
}

impl Converter {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            codec: Codec::new(),
        }
    }

    /// Converts every document of a manifest file.
    ///
    /// Documents that are not ingresses, and ingresses that fail to convert,
    /// are written back verbatim.
    pub fn convert_manifest(&self, content: &str) -> Result<String> {
        let mut output = Vec::new();

        for fragment in manifest::split(content) {
            for fragment in extract_list(&self.codec, &fragment)? {
                output.extend(self.convert_fragment(fragment)?);
            }
        }

        Ok(manifest::join(&output))
    }

    fn convert_fragment(&self, fragment: String) -> Result<Vec<String>> {
        let ingress = match self.codec.decode(&fragment) {
            Resource::Unknown(reason) => {
                log::warn!("Failed to read a document, it is kept as is: {reason}");
                return Ok(vec![fragment]);
            }
            Resource::Other(type_meta) => {
                log::info!(
                    "Skip {} ({}): not an Ingress",
                    type_meta.kind,
                    type_meta.api_version
                );
                return Ok(vec![fragment]);
            }
            Resource::LegacyIngress(ingress) => (*ingress).into_current(),
            Resource::Ingress(ingress) => *ingress,
        };

        let Conversion {
            ingress: converted,
            middlewares,
        } = match self.convert_ingress(&ingress) {
            Ok(conversion) => conversion,
            Err(err) => {
                log::error!(
                    "{}: {err}. The Ingress is kept unconverted",
                    resource_name(&ingress, &self.config.default_namespace)
                );
                return Ok(vec![fragment]);
            }
        };

        let mut fragments = Vec::with_capacity(middlewares.len() + 1);

        fragments.push(self.codec.encode(&converted)?);

        for middleware in &middlewares {
            fragments.push(self.codec.encode(middleware)?);
        }

        Ok(fragments)
    }

    /// Compiles the legacy annotations of `ingress` into middlewares.
    pub fn convert_ingress(&self, ingress: &Ingress) -> Result<Conversion, ConvertError> {
        let annotations = Annotations::new(ingress.metadata.annotations.as_ref());

        let unchanged = || Conversion {
            ingress: ingress.clone(),
            middlewares: Vec::new(),
        };

        if let Some(class) = annotations.get(INGRESS_CLASS) {
            if !class.contains(&self.config.ingress_class_marker) {
                log::debug!(
                    "{}: ingress class {class:?} is not handled, skipping",
                    resource_name(ingress, &self.config.default_namespace)
                );
                return Ok(unchanged());
            }
        }

        let name = ingress.metadata.name.as_deref().unwrap_or_default();
        let namespace = ingress
            .metadata
            .namespace
            .as_deref()
            .unwrap_or(&self.config.default_namespace);
        let resource = format!("{namespace}/{name}");

        for (key, hint) in UNSUPPORTED {
            if annotations.contains(key) {
                log::warn!(
                    "{resource}: The annotation {key} on Ingress must be converted manually. {hint}"
                );
            }
        }

        let mut converted = ingress.clone();

        if let Some(entry_points) = annotations.get(FRONTEND_ENTRY_POINTS) {
            converted
                .metadata
                .annotations
                .get_or_insert_with(Default::default)
                .insert(ROUTER_ENTRY_POINTS.to_string(), entry_points.to_string());
        }

        let mut chain = MiddlewareChain::new(namespace, name, &self.config.middleware_provider);

        if annotations.contains(SSL_REDIRECT) {
            chain.reference(&self.config.ssl_redirect_middleware);
        }

        if let Some(kind) = directives::basic_auth(&annotations, &resource) {
            chain.push("auth", kind);
        }

        if let Some(kind) = directives::headers(&annotations) {
            chain.push("headers", kind);
        }

        if let Some(kind) = directives::ip_white_list(&annotations) {
            chain.push("whitelist", kind);
        }

        if let Some(value) = annotations.get(REQUEST_MODIFIER) {
            match parse_request_modifier(value) {
                Ok(kind) => chain.push("request-modifier", kind),
                Err(err) => log::warn!("{resource}: Invalid {REQUEST_MODIFIER}: {err}, skipping"),
            }
        }

        if !annotations.contains(APP_ROOT) {
            if let Some(kind) = directives::redirect(&annotations, &resource) {
                chain.push("redirect", kind);
            }
        }

        let rule_type = ResolvedRuleType::from_annotations(&annotations)?;
        let rewrite_target = annotations.get(REWRITE_TARGET);

        let rules = ingress.spec.iter().flat_map(|spec| spec.rules.iter().flatten());

        for rule in rules {
            let Some(http) = &rule.http else {
                continue;
            };

            let host = rule.host.as_deref().unwrap_or_default();

            for path in &http.paths {
                let path = path.path.as_deref().unwrap_or_default();
                let host_path = format!("{host}{path}");

                if !path.is_empty() {
                    if rule_type.strip_prefix {
                        chain.push(
                            &suffix_with("strip-prefix", &host_path),
                            directives::strip_prefix(path),
                        );
                    }

                    if let Some(target) = rewrite_target {
                        if rule_type.rule_type == RuleType::ReplacePath {
                            return Err(ConvertError::RewriteTargetWithReplacePath);
                        }

                        chain.push(
                            &suffix_with("replace-path", &host_path),
                            directives::rewrite_target(path, target),
                        );
                    }
                }

                if let Some(kind) = directives::app_root(&annotations, host, path) {
                    chain.push(&suffix_with("redirect-app-root", &host_path), kind);
                }
            }
        }

        let (references, middlewares) = chain.finish();

        if !references.is_empty() {
            converted
                .metadata
                .annotations
                .get_or_insert_with(Default::default)
                .insert(ROUTER_MIDDLEWARES.to_string(), references.join(","));
        }

        Ok(Conversion {
            ingress: converted,
            middlewares,
        })
    }
}

fn resource_name(ingress: &Ingress, default_namespace: &str) -> String {
    format!(
        "{}/{}",
        ingress
            .metadata
            .namespace
            .as_deref()
            .unwrap_or(default_namespace),
        ingress.metadata.name.as_deref().unwrap_or_default()
    )
}
