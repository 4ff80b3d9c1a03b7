use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use kite_core::analysis::{Grade, RecommendationPriority};
use kite_core::model::{AuthMethod, TestConfig, TestScope, TestSession, TestStatus};
use kite_core::report::{ReportWriter, TestReport};
use kite_runner::{SessionRegistry, TestRunner};

use crate::OutputFormat;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    url: &str,
    auth_method: AuthMethod,
    token: &str,
    token_name: Option<String>,
    scope: TestScope,
    seed: Option<u64>,
    pacing_ms: u64,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut config = TestConfig::new(url, auth_method, token);
    config.token_name = token_name;
    config.scope = scope;

    let registry = Arc::new(SessionRegistry::new());
    let runner =
        TestRunner::new(Arc::clone(&registry)).with_pacing(Duration::from_millis(pacing_ms));

    let id = runner.start(config, seed).await?;
    let session = wait_for_completion(&registry, &id, format).await?;

    if session.status == TestStatus::Failed {
        bail!("test session {id} failed; start a new session to retry");
    }

    let report = TestReport::from_session(&session)?;

    match format {
        OutputFormat::Json => println!("{}", ReportWriter::to_string(&report)?),
        OutputFormat::Pretty => print_pretty(&session),
    }

    if let Some(path) = output {
        ReportWriter::to_file(&report, &path)?;
        if format == OutputFormat::Pretty {
            println!("\nReport written to {}", path.display());
        }
    }

    Ok(())
}

/// Poll the registry until the session reaches a terminal state.
async fn wait_for_completion(
    registry: &SessionRegistry,
    id: &str,
    format: OutputFormat,
) -> Result<TestSession> {
    let spinner = if format == OutputFormat::Pretty {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Some(spinner)
    } else {
        None
    };

    loop {
        let Some(session) = registry.get(id) else {
            bail!("session {id} disappeared from the registry");
        };
        if session.status.is_terminal() {
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            return Ok(session);
        }
        if let (Some(spinner), Some(phase)) = (spinner.as_ref(), session.phase.as_ref()) {
            spinner.set_message(phase.clone());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

fn print_pretty(session: &TestSession) {
    use console::style;

    println!(
        "\n{}",
        style(format!("Authenticated Load Test: {}", session.config.target_url))
            .bold()
            .cyan()
    );
    println!(
        "  Session {} completed in {:.1}s\n",
        session.id,
        session.duration_ms as f64 / 1000.0
    );

    if let Some(grade) = &session.grade {
        println!("{}", style("Grades").bold());
        println!(
            "  Overall {}  ({:.0}/100)",
            styled_grade(grade.overall),
            grade.score
        );
        println!(
            "  API {}   Security {}   Caching {}",
            styled_grade(grade.api),
            styled_grade(grade.security),
            styled_grade(grade.caching)
        );
    }

    if let Some(vitals) = &session.vitals {
        println!("\n{}", style("Core Web Vitals").bold());
        println!(
            "  TTFB {:.0}ms   FCP {:.0}ms   LCP {:.0}ms   FID {:.0}ms   CLS {:.2}",
            vitals.ttfb, vitals.fcp, vitals.lcp, vitals.fid, vitals.cls
        );
    }

    if let Some(metrics) = &session.metrics {
        println!("\n{}", style("Network").bold());
        println!(
            "  {} requests, {} transferred, {} cached, {} failed",
            metrics.resources.total_requests,
            format_bytes(metrics.resources.total_bytes),
            metrics.resources.cached_requests,
            metrics.resources.failed_requests
        );
        println!(
            "  {} API calls across {} endpoints, avg {:.0}ms, {:.0}% cache hits",
            metrics.api.total_calls,
            metrics.api.unique_endpoints,
            metrics.api.average_response_time,
            metrics.api.cache_hit_ratio
        );
        if let Some(slowest) = &metrics.api.slowest {
            println!(
                "  Slowest call: {} {} ({:.0}ms)",
                slowest.method,
                style(&slowest.endpoint).dim(),
                slowest.duration
            );
        }
    }

    if let Some(waterfall) = &session.waterfall {
        if !waterfall.critical_path.is_empty() {
            println!("\n{}", style("Critical Path").bold());
            for id in &waterfall.critical_path {
                if let Some(entry) = waterfall.timeline.iter().find(|e| &e.id == id) {
                    println!(
                        "  {:<28} {:>6.0}ms{}",
                        entry.name,
                        entry.duration,
                        if entry.third_party_auth { "  (auth provider)" } else { "" }
                    );
                }
            }
        }
    }

    if let Some(auth) = &session.authentication {
        println!("\n{}", style("Authentication").bold());
        println!(
            "  {} via {:?} ({})",
            auth.method.profile().label,
            auth.token_location,
            auth.token_name
        );
        if auth.injection_success {
            println!("  {}", style("Credential injection succeeded").green());
        } else {
            println!(
                "  {} ({} redirect(s) handled)",
                style("Credential injection failed").red(),
                auth.redirects_handled
            );
        }
        if auth.memberstack_detected {
            let gated = if auth.gated_content_loaded {
                style("gated content visible").green()
            } else {
                style("gated content missing").red()
            };
            println!("  Provider detected, {gated}");
        }
    }

    if !session.recommendations.is_empty() {
        println!("\n{}", style("Recommendations").bold());
        for rec in &session.recommendations {
            println!(
                "  {} {}",
                styled_priority(rec.priority),
                style(&rec.title).bold()
            );
            println!("      {}", rec.description);
            println!("      {}", style(&rec.remediation).dim());
        }
    }
    println!();
}

fn styled_grade(grade: Grade) -> console::StyledObject<&'static str> {
    use console::style;
    match grade {
        Grade::A | Grade::B => style(grade.as_str()).green().bold(),
        Grade::C => style(grade.as_str()).yellow().bold(),
        Grade::D | Grade::F => style(grade.as_str()).red().bold(),
    }
}

fn styled_priority(priority: RecommendationPriority) -> console::StyledObject<&'static str> {
    use console::style;
    match priority {
        RecommendationPriority::Critical => style("[critical]").red().bold(),
        RecommendationPriority::High => style("[high]").red(),
        RecommendationPriority::Medium => style("[medium]").yellow(),
        RecommendationPriority::Low => style("[low]").dim(),
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_000_000 {
        format!("{:.1} MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{bytes} B")
    }
}
