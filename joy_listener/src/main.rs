use anyhow::Context;
use joy_listener::ListenerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ListenerConfig::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
        .context("invalid ROS arguments")?;

    let mut logger = env_logger::Builder::from_default_env();
    if let Some(level) = config.log_level {
        logger.filter_level(level);
    }
    logger.init();

    for arg in &config.ignored_args {
        log::warn!("ignoring argument: {arg}");
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            // Without a signal handler the only way out is killing the process
            log::error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    joy_listener::run(&config, std::io::stdout(), shutdown)
        .await
        .with_context(|| format!("listener on {} stopped", config.topic))?;
    Ok(())
}
