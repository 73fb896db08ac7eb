//! `extensions/v1beta1` and `networking.k8s.io/v1beta1` Ingress.
//!
//! k8s-openapi no longer ships these versions, so only the fields that matter
//! for the projection onto `networking.k8s.io/v1` are modeled here.

use k8s_openapi::{
    api::{
        core::v1::TypedLocalObjectReference,
        networking::v1::{
            HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
            IngressServiceBackend, IngressSpec, IngressStatus, IngressTLS, ServiceBackendPort,
        },
    },
    apimachinery::pkg::{apis::meta::v1::ObjectMeta, util::intstr::IntOrString},
};
use serde::Deserialize;

pub const LEGACY_API_VERSIONS: [&str; 2] = ["extensions/v1beta1", "networking.k8s.io/v1beta1"];

/// v1beta1ではAPIサーバーがデフォルト値を設定していた
const DEFAULT_PATH_TYPE: &str = "ImplementationSpecific";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyIngress {
    pub api_version: String,

    pub kind: String,

    #[serde(default)]
    pub metadata: ObjectMeta,

    pub spec: Option<LegacyIngressSpec>,

    pub status: Option<IngressStatus>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyIngressSpec {
    pub backend: Option<LegacyIngressBackend>,

    pub ingress_class_name: Option<String>,

    pub rules: Option<Vec<LegacyIngressRule>>,

    pub tls: Option<Vec<IngressTLS>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyIngressRule {
    pub host: Option<String>,

    pub http: Option<LegacyHTTPIngressRuleValue>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyHTTPIngressRuleValue {
    #[serde(default)]
    pub paths: Vec<LegacyHTTPIngressPath>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyHTTPIngressPath {
    #[serde(default)]
    pub backend: LegacyIngressBackend,

    pub path: Option<String>,

    pub path_type: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyIngressBackend {
    pub service_name: Option<String>,

    pub service_port: Option<IntOrString>,

    pub resource: Option<TypedLocalObjectReference>,
}

impl LegacyIngress {
    pub fn is_legacy_api_version(api_version: &str) -> bool {
        LEGACY_API_VERSIONS.contains(&api_version)
    }

    /// Projects the resource onto `networking.k8s.io/v1`.
    pub fn into_current(self) -> Ingress {
        Ingress {
            metadata: self.metadata,
            spec: self.spec.map(Into::into),
            status: self.status,
        }
    }
}

impl From<LegacyIngressSpec> for IngressSpec {
    fn from(spec: LegacyIngressSpec) -> Self {
        IngressSpec {
            default_backend: spec.backend.map(Into::into),
            ingress_class_name: spec.ingress_class_name,
            rules: spec
                .rules
                .map(|rules| rules.into_iter().map(Into::into).collect()),
            tls: spec.tls,
        }
    }
}

impl From<LegacyIngressRule> for IngressRule {
    fn from(rule: LegacyIngressRule) -> Self {
        IngressRule {
            host: rule.host,
            http: rule.http.map(|http| HTTPIngressRuleValue {
                paths: http.paths.into_iter().map(Into::into).collect(),
            }),
        }
    }
}

impl From<LegacyHTTPIngressPath> for HTTPIngressPath {
    fn from(path: LegacyHTTPIngressPath) -> Self {
        HTTPIngressPath {
            backend: path.backend.into(),
            path: path.path,
            path_type: path
                .path_type
                .unwrap_or_else(|| DEFAULT_PATH_TYPE.to_string()),
        }
    }
}

impl From<LegacyIngressBackend> for IngressBackend {
    fn from(backend: LegacyIngressBackend) -> Self {
        let service = backend.service_name.map(|name| IngressServiceBackend {
            name,
            port: backend.service_port.map(|port| match port {
                IntOrString::Int(number) => ServiceBackendPort {
                    number: Some(number),
                    ..Default::default()
                },
                IntOrString::String(name) => ServiceBackendPort {
                    name: Some(name),
                    ..Default::default()
                },
            }),
        });

        IngressBackend {
            resource: backend.resource,
            service,
        }
    }
}
