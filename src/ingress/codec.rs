use k8s_openapi::{api::networking::v1::Ingress, Resource as _};
use kube::core::TypeMeta;
use serde::Serialize;
use serde_yaml::Value;

use super::legacy::{LegacyIngress, LEGACY_API_VERSIONS};

/// Result of classifying one manifest fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// デコードできなかったフラグメント（理由を保持する）
    Unknown(String),
    LegacyIngress(Box<LegacyIngress>),
    Ingress(Box<Ingress>),
    Other(TypeMeta),
}

/// Encoder/decoder for the resource types the converter knows about.
///
/// Built once per run and passed by reference.
#[derive(Debug, Clone)]
pub struct Codec {
    ingress_api_versions: Vec<&'static str>,
}

impl Default for Codec {
    fn default() -> Self {
        let mut ingress_api_versions = LEGACY_API_VERSIONS.to_vec();
        ingress_api_versions.push(Ingress::API_VERSION);

        Self {
            ingress_api_versions,
        }
    }
}

impl Codec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_meta(value: &Value) -> Option<TypeMeta> {
        Some(TypeMeta {
            api_version: value.get("apiVersion")?.as_str()?.to_string(),
            kind: value.get("kind")?.as_str()?.to_string(),
        })
    }

    /// Whether `type_meta` identifies an Ingress of a known version.
    pub fn is_ingress(&self, type_meta: &TypeMeta) -> bool {
        type_meta.kind == Ingress::KIND
            && self
                .ingress_api_versions
                .contains(&type_meta.api_version.as_str())
    }

    pub fn decode(&self, fragment: &str) -> Resource {
        let value: Value = match serde_yaml::from_str(fragment) {
            Ok(value) => value,
            Err(err) => return Resource::Unknown(format!("error decoding YAML: {err}")),
        };

        let Some(type_meta) = Self::type_meta(&value) else {
            return Resource::Unknown("Object 'apiVersion' or 'kind' is missing".into());
        };

        if !self.is_ingress(&type_meta) {
            return Resource::Other(type_meta);
        }

        if LegacyIngress::is_legacy_api_version(&type_meta.api_version) {
            match serde_yaml::from_value::<LegacyIngress>(value) {
                Ok(ingress) => Resource::LegacyIngress(Box::new(ingress)),
                Err(err) => Resource::Unknown(format!(
                    "error decoding {}: {err}",
                    type_meta.api_version
                )),
            }
        } else {
            match serde_yaml::from_value::<Ingress>(value) {
                Ok(ingress) => Resource::Ingress(Box::new(ingress)),
                Err(err) => Resource::Unknown(format!(
                    "error decoding {}: {err}",
                    type_meta.api_version
                )),
            }
        }
    }

    pub fn encode<K: Serialize>(&self, resource: &K) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(resource)
    }
}

#[cfg(test)]
mod tests {
    use indoc::{formatdoc, indoc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    mod decode {
        use super::*;
        use pretty_assertions::assert_eq;

        #[rstest]
        #[case("extensions/v1beta1")]
        #[case("networking.k8s.io/v1beta1")]
        fn legacy_ingress(#[case] api_version: &str) {
            let fragment = formatdoc! {"
                apiVersion: {api_version}
                kind: Ingress
                metadata:
                  name: whoami
            "};

            let Resource::LegacyIngress(ingress) = Codec::new().decode(&fragment) else {
                panic!("expected a legacy ingress");
            };

            assert_eq!(ingress.metadata.name.as_deref(), Some("whoami"));
        }

        #[test]
        fn current_ingress() {
            let fragment = indoc! {"
                apiVersion: networking.k8s.io/v1
                kind: Ingress
                metadata:
                  name: whoami
            "};

            let Resource::Ingress(ingress) = Codec::new().decode(fragment) else {
                panic!("expected an ingress");
            };

            assert_eq!(ingress.metadata.name.as_deref(), Some("whoami"));
        }

        #[rstest]
        #[case::service("v1", "Service")]
        #[case::custom_resource("traefik.containo.us/v1alpha1", "Middleware")]
        #[case::unknown_ingress_version("networking.k8s.io/v2", "Ingress")]
        fn other_resources(#[case] api_version: &str, #[case] kind: &str) {
            let fragment = format!("apiVersion: {api_version}\nkind: {kind}\n");

            assert_eq!(
                Codec::new().decode(&fragment),
                Resource::Other(TypeMeta {
                    api_version: api_version.into(),
                    kind: kind.into(),
                })
            );
        }

        #[rstest]
        #[case::invalid_yaml("a: [b\n")]
        #[case::no_kind("apiVersion: v1\nmetadata: {}\n")]
        #[case::only_comment("# nothing here\n")]
        #[case::scalar("just a string\n")]
        #[case::schema_mismatch("apiVersion: networking.k8s.io/v1\nkind: Ingress\nspec: [1, 2]\n")]
        fn unknown(#[case] fragment: &str) {
            assert!(matches!(
                Codec::new().decode(fragment),
                Resource::Unknown(_)
            ));
        }
    }

    #[rstest]
    #[case("extensions/v1beta1", "Ingress", true)]
    #[case("networking.k8s.io/v1beta1", "Ingress", true)]
    #[case("networking.k8s.io/v1", "Ingress", true)]
    #[case("networking.k8s.io/v1", "IngressClass", false)]
    #[case("v1", "Ingress", false)]
    fn is_ingress(#[case] api_version: &str, #[case] kind: &str, #[case] expected: bool) {
        let type_meta = TypeMeta {
            api_version: api_version.into(),
            kind: kind.into(),
        };

        assert_eq!(Codec::new().is_ingress(&type_meta), expected);
    }
}
