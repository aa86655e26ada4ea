use anyhow::Result;
use order_check::utils::logging;
use order_check::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 读取 .env（可选）
    dotenvy::dotenv().ok();

    // 加载配置
    let config = Config::from_env()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
