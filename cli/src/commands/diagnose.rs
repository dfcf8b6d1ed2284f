use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use tracing::{info, warn};

use crate::chart;
use crate::commands::DiagnoseArgs;
use crate::export;
use crate::nprint;
use crate::terminal::{colors, format, print, spinner};
use netdiag_common::{config::Config, report::DiagnosticReport, success};
use netdiag_core::{
    Diagnostics, Probes, SpeedtestCli, StageHook, StopSignal, Throughput, measure_throughput,
};

pub async fn diagnose(args: DiagnoseArgs) -> anyhow::Result<()> {
    let cfg: Config = args.to_config();

    print::header("getting ready for diagnostics", cfg.quiet);
    if !cfg.skip_link_layer && !is_root::is_root() {
        warn!("Not running as root, ARP discovery will most likely fall back to a ping sweep");
    }

    let stop = StopSignal::new();
    let interrupt = {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping after the current stage");
                stop.raise();
            }
        })
    };

    let hook: StageHook = Arc::new(spinner::report_stage);
    let start_time: Instant = Instant::now();
    let result = Diagnostics::new(&cfg, Probes::system(&cfg))
        .with_stage_hook(hook)
        .run(&stop)
        .await;

    interrupt.abort();
    spinner::finish();
    let report: DiagnosticReport = result?;

    diagnostics_end(&report, start_time.elapsed(), &cfg);

    if !args.no_csv {
        let path = export::write_csv(&report, &args.output_dir)
            .context("failed to save the CSV report")?;
        success!("Report saved to {}", path.display());
    }

    if !args.no_chart {
        let written = chart::write_chart(&report, &args.output_dir)
            .context("failed to save the latency chart")?;
        if let Some(path) = written {
            success!("Chart saved to {}", path.display());
        }
    }

    if !args.no_speedtest {
        print::header("speed test", cfg.quiet);
        info!("Running speed test, this can take a minute...");
        let client = SpeedtestCli::default();
        tokio::select! {
            measured = measure_throughput(&client) => {
                if let Some(throughput) = measured {
                    print_throughput(&throughput);
                }
            }
            _ = tokio::signal::ctrl_c() => warn!("Speed test interrupted"),
        }
    }

    print::end_of_program();
    Ok(())
}

fn diagnostics_end(report: &DiagnosticReport, total_time: Duration, cfg: &Config) {
    if cfg.quiet > 0 {
        nprint!();
    }

    print::header("latency report", cfg.quiet);
    if cfg.quiet < 2 {
        print_records(report);
    }
    print_summary(report, total_time, cfg);
}

fn print_records(report: &DiagnosticReport) {
    print::print(&format::table_head());
    for (idx, row) in report.rows().enumerate() {
        print::print(&format::table_row(idx, &row));
    }
}

fn print_summary(report: &DiagnosticReport, total_time: Duration, cfg: &Config) {
    let endpoints: ColoredString = format!("{} endpoints", report.len()).bold().green();
    let replies: ColoredString = format!("{} replied", report.replies()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString = format!(
        "Diagnostics Complete via {}: {endpoints}, {replies} in {total_time}",
        report.method
    )
    .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ => {
            nprint!();
            success!("{}", output)
        }
    }
}

fn print_throughput(throughput: &Throughput) {
    let download: ColoredString = format!("{:.2} Mbps", throughput.download_mbps).bold().green();
    let upload: ColoredString = format!("{:.2} Mbps", throughput.upload_mbps).bold().green();
    let rtt: ColoredString = format!("{:.1} ms", throughput.server_rtt_ms).bold().yellow();
    print::print_status(format!("Download    {download}"));
    print::print_status(format!("Upload      {upload}"));
    print::print_status(format!("Server ping {rtt}"));
}
