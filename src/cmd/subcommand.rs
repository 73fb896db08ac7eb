use std::{fs, io::ErrorKind, path::Path, path::PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser};

use crate::{
    config::Config,
    error::{Error, Result},
    ingress::{convert_path, Converter},
};

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub enum SubCommand {
    /// Convert Traefik 1.x Ingress manifests to Traefik 2.x Ingress and Middleware
    Ingress(IngressArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct IngressArgs {
    /// Input file or directory
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "./output")]
    pub output: PathBuf,
}

impl SubCommand {
    pub fn run(self, config: Config) -> Result<()> {
        match self {
            SubCommand::Ingress(args) => args.run(config),
            SubCommand::Version => {
                println!("{}", version());
                Ok(())
            }
        }
    }
}

impl IngressArgs {
    fn run(self, config: Config) -> Result<()> {
        prepare_output_dir(&self.output)?;

        let converter = Converter::new(config);

        convert_path(&converter, &self.input, &self.output)
    }
}

/// 出力先ディレクトリがなければ作成する
fn prepare_output_dir(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotADirectory(path.to_path_buf()).into()),
        Err(err) if err.kind() == ErrorKind::NotFound => fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display())),
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn version() -> String {
    format!(
        "{} {}\nPlatform: {}/{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    mod prepare_output_dir {
        use super::*;

        #[test]
        fn 存在しないディレクトリは作成する() {
            let dir = tempfile::tempdir().unwrap();
            let output = dir.path().join("a").join("b");

            prepare_output_dir(&output).unwrap();

            assert!(output.is_dir());
        }

        #[test]
        fn ファイルを指定するとエラーを返す() {
            let file = tempfile::NamedTempFile::new().unwrap();

            let err = prepare_output_dir(file.path()).unwrap_err();

            assert!(matches!(
                err.downcast_ref::<Error>(),
                Some(Error::NotADirectory(_))
            ));
        }
    }

    #[test]
    fn ingressサブコマンドでファイルを変換する() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ingress.yaml");
        let output = dir.path().join("output");

        fs::write(&input, "apiVersion: v1\nkind: Secret\n").unwrap();

        SubCommand::Ingress(IngressArgs {
            input,
            output: output.clone(),
        })
        .run(Config::default())
        .unwrap();

        assert_eq!(
            fs::read_to_string(output.join("ingress.yaml")).unwrap(),
            "apiVersion: v1\nkind: Secret\n"
        );
    }

    #[test]
    fn versionにパッケージ名を含む() {
        assert!(version().starts_with("ingress-migrate "));
    }
}
