use anyhow::Result;

use tokenwatch_core::config::Config;

pub fn run(config: &Config, port: u16) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let config = config.clone();
    rt.block_on(async move {
        tokio::select! {
            result = tokenwatch_server::serve(config, port) => result,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                Ok(())
            }
        }
    })
}
