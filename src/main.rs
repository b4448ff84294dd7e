use anyhow::Result;
use exam_export::utils::logging;
use exam_export::{App, AppError, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置，第一个命令行参数覆盖 EXAM_FILE
    let mut config = Config::try_from_env().map_err(AppError::from)?;
    if let Some(path) = std::env::args().nth(1) {
        config = config.with_exam_path(path);
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let stats = App::initialize(config).run().await?;

    if stats.failed > 0 {
        anyhow::bail!("{} 份试卷导出失败", stats.failed);
    }

    Ok(())
}
