use std::{fs, path::Path};

use anyhow::Context as _;

use crate::error::{Error, Result};

use super::convert::Converter;

/// Converts `src` into `dst`.
///
/// A file is written to `dst/<file name>`. A directory is walked depth-first
/// in file name order and its entries are written under `dst/<directory name>`.
pub fn convert_path(converter: &Converter, src: &Path, dst: &Path) -> Result<()> {
    let metadata =
        fs::metadata(src).with_context(|| format!("Failed to read {}", src.display()))?;

    if !metadata.is_dir() {
        return convert_file(converter, src, dst);
    }

    // `.` や `..` はファイル名を持たない
    let dst = match src.file_name() {
        Some(name) => dst.join(name),
        None => dst.to_path_buf(),
    };

    let mut entries = fs::read_dir(src)
        .and_then(|entries| entries.collect::<std::io::Result<Vec<_>>>())
        .with_context(|| format!("Failed to read directory {}", src.display()))?;

    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        convert_path(converter, &entry.path(), &dst)?;
    }

    Ok(())
}

fn convert_file(converter: &Converter, src: &Path, dst_dir: &Path) -> Result<()> {
    let file_name = src
        .file_name()
        .ok_or_else(|| Error::InvalidPath(src.to_path_buf()))?;

    log::debug!("Convert {}", src.display());

    let bytes = fs::read(src).with_context(|| format!("Failed to read {}", src.display()))?;

    // UTF-8でないファイルはそのままコピーする
    let output = match String::from_utf8(bytes) {
        Ok(content) => converter
            .convert_manifest(&content)
            .with_context(|| format!("Failed to convert {}", src.display()))?
            .into_bytes(),
        Err(err) => {
            log::warn!(
                "{} is not valid UTF-8 ({}), copying it unchanged",
                src.display(),
                err.utf8_error()
            );
            err.into_bytes()
        }
    };

    fs::create_dir_all(dst_dir)
        .with_context(|| format!("Failed to create directory {}", dst_dir.display()))?;

    let dst = dst_dir.join(file_name);

    fs::write(&dst, output).with_context(|| format!("Failed to write {}", dst.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use crate::config::Config;

    use super::*;

    const SERVICE: &str = indoc! {"
        apiVersion: v1
        kind: Service
        metadata:
          name: whoami
    "};

    const INGRESS: &str = indoc! {"
        apiVersion: extensions/v1beta1
        kind: Ingress
        metadata:
          name: whoami
          annotations:
            ingress.kubernetes.io/ssl-redirect: 'true'
    "};

    fn converter() -> Converter {
        Converter::new(Config::default())
    }

    #[test]
    fn file_is_written_under_destination() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        let file = src.path().join("service.yaml");
        fs::write(&file, SERVICE).unwrap();

        convert_path(&converter(), &file, dst.path()).unwrap();

        assert_eq!(
            fs::read_to_string(dst.path().join("service.yaml")).unwrap(),
            SERVICE
        );
    }

    #[test]
    fn directory_tree_is_mirrored() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        let root = src.path().join("manifests");
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("service.yaml"), SERVICE).unwrap();
        fs::write(root.join("nested").join("ingress.yaml"), INGRESS).unwrap();

        convert_path(&converter(), &root, dst.path()).unwrap();

        assert_eq!(
            fs::read_to_string(dst.path().join("manifests").join("service.yaml")).unwrap(),
            SERVICE
        );

        let ingress =
            fs::read_to_string(dst.path().join("manifests/nested/ingress.yaml")).unwrap();

        assert!(ingress.starts_with("apiVersion: networking.k8s.io/v1\n"));
        assert!(ingress.contains("traefik.ingress.kubernetes.io/router.middlewares: ssl-redirect@file"));
    }

    #[test]
    fn non_utf8_file_is_copied_and_walk_continues() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        let root = src.path().join("manifests");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.yaml"), b"# caf\xe9\n").unwrap();
        fs::write(root.join("b.yaml"), INGRESS).unwrap();

        convert_path(&converter(), &root, dst.path()).unwrap();

        assert_eq!(
            fs::read(dst.path().join("manifests/a.yaml")).unwrap(),
            b"# caf\xe9\n".to_vec()
        );

        let ingress = fs::read_to_string(dst.path().join("manifests/b.yaml")).unwrap();

        assert!(ingress.starts_with("apiVersion: networking.k8s.io/v1\n"));
    }

    #[test]
    fn missing_source_is_an_error() {
        let dst = tempfile::tempdir().unwrap();

        let actual = convert_path(&converter(), &dst.path().join("missing.yaml"), dst.path());

        assert!(actual.is_err());
    }
}
