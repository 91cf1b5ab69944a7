// ==========================================
// 高校排课系统 - 命令行入口
// ==========================================
// 用法:
//   university-schedule generate <semester> <name> [heuristic|exact]
//   university-schedule evaluate <semester> [name]
//   university-schedule sets <semester>
//
// 数据库路径: 环境变量 UNIVERSITY_SCHEDULE_DB, 否则使用用户数据目录
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use university_schedule::app::{get_default_db_path, AppState};
use university_schedule::{logging, APP_NAME, VERSION};

const USAGE: &str = "用法:
  university-schedule generate <semester> <name> [heuristic|exact]
  university-schedule evaluate <semester> [name]
  university-schedule sets <semester>";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    tracing::info!("{} v{}", APP_NAME, VERSION);
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path)
        .await
        .map_err(|e| anyhow!(e))
        .context("无法初始化AppState")?;

    match command.as_str() {
        "generate" => {
            let (Some(semester), Some(name)) = (args.get(1), args.get(2)) else {
                bail!("generate 需要 <semester> <name>\n{}", USAGE);
            };
            let algorithm = args.get(3).map(String::as_str);

            let result = state
                .schedule_api
                .generate_schedule(semester, name, algorithm)
                .await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        "evaluate" => {
            let Some(semester) = args.get(1) else {
                bail!("evaluate 需要 <semester>\n{}", USAGE);
            };
            let name = args.get(2).map(String::as_str);

            let evaluation = state.schedule_api.evaluate_schedule(semester, name)?;
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
        }
        "sets" => {
            let Some(semester) = args.get(1) else {
                bail!("sets 需要 <semester>\n{}", USAGE);
            };
            for name in state.schedule_api.list_schedule_set_names(semester)? {
                println!("{}", name);
            }
        }
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }

    Ok(())
}
