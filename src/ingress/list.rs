use serde_yaml::{Mapping, Value};

use super::codec::Codec;

const ITEMS: &str = "items";
const LIST_KIND_SUFFIX: &str = "List";

/// Splits a list fragment into a residual list and standalone ingresses.
///
/// Items that are ingresses of a known version are re-encoded as their own
/// fragments so they can be converted one by one. The remaining items stay in
/// the list wrapper, which keeps every other top-level key in place.
/// Fragments that are not lists, or contain no ingress, are returned as is.
pub fn extract_list(codec: &Codec, fragment: &str) -> Result<Vec<String>, serde_yaml::Error> {
    let Ok(Value::Mapping(mut list)) = serde_yaml::from_str::<Value>(fragment) else {
        return Ok(vec![fragment.to_string()]);
    };

    let Some(items) = list_items(&list) else {
        return Ok(vec![fragment.to_string()]);
    };

    let (to_convert, to_keep): (Vec<Value>, Vec<Value>) = items
        .iter()
        .cloned()
        .partition(|item| Codec::type_meta(item).is_some_and(|tm| codec.is_ingress(&tm)));

    if to_convert.is_empty() {
        return Ok(vec![fragment.to_string()]);
    }

    log::debug!(
        "extract {} ingress(es) from list, {} item(s) kept",
        to_convert.len(),
        to_keep.len()
    );

    let mut fragments = Vec::with_capacity(to_convert.len() + 1);

    if !to_keep.is_empty() {
        list.insert(Value::from(ITEMS), Value::Sequence(to_keep));
        fragments.push(codec.encode(&list)?);
    }

    for item in &to_convert {
        fragments.push(codec.encode(item)?);
    }

    Ok(fragments)
}

fn list_items(list: &Mapping) -> Option<&Vec<Value>> {
    let is_list = list
        .get("kind")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind.ends_with(LIST_KIND_SUFFIX));

    if !is_list {
        return None;
    }

    list.get(ITEMS).and_then(Value::as_sequence)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn extract(fragment: &str) -> Vec<String> {
        extract_list(&Codec::new(), fragment).unwrap()
    }

    #[test]
    fn not_a_list_is_returned_unchanged() {
        let fragment = indoc! {"
            apiVersion: v1
            kind: Service
            metadata:
              name: whoami # comment
        "};

        assert_eq!(extract(fragment), vec![fragment.to_string()]);
    }

    #[test]
    fn invalid_yaml_is_returned_unchanged() {
        let fragment = "kind: List\nitems: [\n";

        assert_eq!(extract(fragment), vec![fragment.to_string()]);
    }

    #[test]
    fn list_without_ingress_is_byte_identical() {
        let fragment = indoc! {"
            apiVersion: v1
            kind: List
            items:
              # keep me
              - apiVersion: v1
                kind: Service
                metadata:
                  name: whoami
        "};

        assert_eq!(extract(fragment), vec![fragment.to_string()]);
    }

    #[test]
    fn only_ingresses_drops_the_list_wrapper() {
        let fragment = indoc! {"
            apiVersion: extensions/v1beta1
            kind: IngressList
            items:
              - apiVersion: extensions/v1beta1
                kind: Ingress
                metadata:
                  name: a
              - apiVersion: networking.k8s.io/v1
                kind: Ingress
                metadata:
                  name: b
        "};

        let expected = vec![
            indoc! {"
                apiVersion: extensions/v1beta1
                kind: Ingress
                metadata:
                  name: a
            "}
            .to_string(),
            indoc! {"
                apiVersion: networking.k8s.io/v1
                kind: Ingress
                metadata:
                  name: b
            "}
            .to_string(),
        ];

        assert_eq!(extract(fragment), expected);
    }

    #[test]
    fn mixed_list_keeps_residual_list_first() {
        let fragment = indoc! {"
            apiVersion: v1
            kind: List
            items:
              - apiVersion: v1
                kind: Service
                metadata:
                  name: whoami
              - apiVersion: networking.k8s.io/v1beta1
                kind: Ingress
                metadata:
                  name: whoami
            metadata:
              resourceVersion: ''
        "};

        let expected = vec![
            indoc! {"
                apiVersion: v1
                kind: List
                items:
                - apiVersion: v1
                  kind: Service
                  metadata:
                    name: whoami
                metadata:
                  resourceVersion: ''
            "}
            .to_string(),
            indoc! {"
                apiVersion: networking.k8s.io/v1beta1
                kind: Ingress
                metadata:
                  name: whoami
            "}
            .to_string(),
        ];

        assert_eq!(extract(fragment), expected);
    }

    #[test]
    fn items_are_conserved() {
        let fragment = indoc! {"
            kind: List
            items:
              - {apiVersion: v1, kind: ConfigMap}
              - {apiVersion: extensions/v1beta1, kind: Ingress}
              - {kind: Secret}
              - {apiVersion: networking.k8s.io/v1, kind: Ingress}
              - just a string
        "};

        let fragments = extract(fragment);

        let kept: Value = serde_yaml::from_str(&fragments[0]).unwrap();
        let kept = kept.get(ITEMS).and_then(Value::as_sequence).unwrap().len();
        let converted = fragments.len() - 1;

        assert_eq!((kept, converted), (3, 2));
    }
}
