use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use ruprobe::runner::CheckReporter;
use ruprobe::status::StatusStore;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 要检查的 *.http 文件
    #[arg(long = "http-file", value_name = "PATH")]
    pub http_file: PathBuf,

    /// 状态文件位置（默认为 <http-file>.json）
    #[arg(long = "status-file", value_name = "PATH")]
    pub status_file: Option<PathBuf>,

    /// 以 JSON 输出本轮结果
    #[arg(long, conflicts_with = "quiet")]
    pub json: bool,

    /// 不打印结果摘要
    #[arg(short, long)]
    pub quiet: bool,

    /// 打印全部错误详情
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 确定状态文件路径并创建所在目录
    pub fn prepare_status_file(&self) -> Result<PathBuf> {
        if !self.http_file.exists() {
            bail!("{} does not exist", self.http_file.display());
        }

        let status_file = self
            .status_file
            .clone()
            .unwrap_or_else(|| StatusStore::default_path_for(&self.http_file));

        if let Some(dir) = status_file.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {} directory", dir.display()))?;
        }

        Ok(status_file)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let status_file = cli.prepare_status_file()?;

    let summary = ruprobe::check_alerts(&cli.http_file, &status_file)
        .await
        .context("check alerts failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !cli.quiet {
        let reporter = CheckReporter::new(cli.verbose);
        reporter.print_header(&cli.http_file.display().to_string(), summary.total);
        reporter.print_summary(&summary);
    }
    Ok(())
}
