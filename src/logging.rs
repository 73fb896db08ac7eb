use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::{json::JsonEncoder, pattern::PatternEncoder},
};
use std::env;
use std::path::Path;
use std::str::FromStr;

use crate::error::Result;

const STDERR_APPENDER: &str = "stderr";
const FILE_APPENDER: &str = "logfile";

pub struct Logger;

impl Logger {
    /// 標準エラー出力へのログ出力を初期化する
    ///
    /// `log_file` が指定された場合はJSON形式でファイルにも出力する。
    pub fn init(log_file: Option<&Path>) -> Result<()> {
        let config = Self::config(log_file)?;

        log4rs::init_config(config)?;

        Ok(())
    }

    fn config(log_file: Option<&Path>) -> Result<Config> {
        let level_filter = Self::level_filter();

        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new("{h({l})} - {m}{n}")))
            .build();

        let mut builder =
            Config::builder().appender(Appender::builder().build(STDERR_APPENDER, Box::new(stderr)));

        let mut root = Root::builder().appender(STDERR_APPENDER);

        if let Some(path) = log_file {
            let logfile = FileAppender::builder()
                .append(false)
                .encoder(Box::new(JsonEncoder::new()))
                .build(path)?;

            builder = builder.appender(Appender::builder().build(FILE_APPENDER, Box::new(logfile)));
            root = root.appender(FILE_APPENDER);
        }

        Ok(builder.build(root.build(level_filter))?)
    }

    fn level_filter() -> LevelFilter {
        env::var("RUST_LOG")
            .ok()
            .and_then(|level| LevelFilter::from_str(&level).ok())
            .unwrap_or(LevelFilter::Info)
    }
}
