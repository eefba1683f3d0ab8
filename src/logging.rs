use crate::config::LoggingConfig;
use crate::error::{OverlayError, Result};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;

const STDOUT: &str = "stdout";

pub fn init(config: &LoggingConfig) -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(&config.pattern)))
        .build();
    let log_config = Config::builder()
        .appender(Appender::builder().build(STDOUT, Box::new(stdout)))
        .build(Root::builder().appender(STDOUT).build(config.level))
        .map_err(|e| OverlayError::Logging(e.to_string()))?;
    log4rs::init_config(log_config).map_err(|e| OverlayError::Logging(e.to_string()))?;
    Ok(())
}
