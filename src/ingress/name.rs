/// 任意の文字列をKubernetesのオブジェクト名として使える形に変換する
///
/// Every character that is not a letter or a digit separates fields, and the
/// non-empty fields are joined with a single `-`.
///
/// https://kubernetes.io/docs/concepts/overview/working-with-objects/names/#names
pub fn normalize_object_name(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
