use crate::runner::types::{CheckResult, Delivery, RunSummary, Verdict};
use colored::Colorize;

/// 终端输出
pub struct CheckReporter {
    verbose: bool,
}

impl CheckReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// 打印单个检查结果
    pub fn print_result(&self, result: &CheckResult) {
        let symbol = match result.verdict {
            Verdict::Up => "✓".green(),
            Verdict::Down => "✗".red(),
            Verdict::Ignored => "⊘".dimmed(),
        };

        let status_part = match result.status {
            Some(code) => format!(" [{}]", code),
            None => String::new(),
        };

        let transition_part = if result.transition {
            let state = if result.is_up() { "up".green() } else { "down".red() };
            format!(" {} {}{}", "→".bold(), state, Self::delivery_note(result.delivery))
        } else {
            String::new()
        };

        println!(
            " {} #{} {} {}{} ({}ms){}",
            symbol,
            result.position,
            result.method.cyan(),
            result.url,
            status_part,
            result.duration_ms,
            transition_part
        );

        // 失败详情只在 verbose 或状态变化时显示
        if let Some(error) = &result.error
            && (self.verbose || result.transition)
        {
            println!("   {}: {}", "Error".red().bold(), error);
        }
    }

    fn delivery_note(delivery: Delivery) -> String {
        match delivery {
            Delivery::Sent => " (alert sent)".dimmed().to_string(),
            Delivery::Failed => " (alert failed)".yellow().to_string(),
            Delivery::Disabled => " (alerts disabled)".dimmed().to_string(),
            Delivery::None => String::new(),
        }
    }

    /// 打印标题
    pub fn print_header(&self, file_path: &str, total: usize) {
        println!("\nChecked {} requests from {}\n", total, file_path.bold());
    }

    /// 打印全部结果和摘要
    pub fn print_summary(&self, summary: &RunSummary) {
        for result in &summary.results {
            self.print_result(result);
        }

        println!("\n{}", "━".repeat(50));
        println!(
            "  {}: {} up, {} down, {} ignored, {} total",
            "Checks".bold(),
            summary.up.to_string().green(),
            summary.down.to_string().red(),
            summary.ignored.to_string().dimmed(),
            summary.total
        );
        if summary.transitions > 0 {
            println!(
                "  {}: {} ({} alerts sent, {} failed)",
                "Transitions".bold(),
                summary.transitions,
                summary.notifications_sent,
                summary.notifications_failed
            );
        }
        if summary.aborted > 0 {
            println!("  {}: {}", "Aborted".red().bold(), summary.aborted);
        }
        let elapsed = summary.finished_at - summary.started_at;
        println!(
            "  {}: {:.3}s",
            "Duration".bold(),
            elapsed.num_milliseconds() as f64 / 1000.0
        );
        println!();
    }
}
