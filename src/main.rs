use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use pyqual::cli::{Cli, Commands, FormatArg, SeverityArg};
use pyqual::{
    analyze_and_fix, analyze_batch, summarize, QualityConfig, QualityReport, Severity, SourceUnit,
};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Review {
            path,
            severity,
            format,
            config,
        } => review(&path, severity, format, config.as_deref()),
        Commands::Fix {
            path,
            dry_run,
            output,
            config,
        } => fix(&path, dry_run, output, config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<QualityConfig> {
    match path {
        Some(p) => {
            let text = fs::read_to_string(p)
                .with_context(|| format!("reading config {}", p.display()))?;
            Ok(QualityConfig::from_toml_str(&text)?)
        }
        None => Ok(QualityConfig::default()),
    }
}

fn collect_units(path: &Path) -> Result<Vec<SourceUnit>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.extension().and_then(|e| e.to_str()) == Some("py") {
                files.push(p.to_path_buf());
            }
        }
        files.sort();
    } else {
        bail!("path not found: {}", path.display());
    }

    let mut units = Vec::new();
    for file in files {
        match fs::read_to_string(&file) {
            Ok(text) => units.push(SourceUnit::new(file.display().to_string(), text)),
            Err(err) => log::warn!("skipping {}: {err}", file.display()),
        }
    }
    if units.is_empty() {
        bail!("no Python files found under {}", path.display());
    }
    Ok(units)
}

fn review(
    path: &Path,
    severity: SeverityArg,
    format: FormatArg,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let units = collect_units(path)?;
    let reports = analyze_batch(&units, &config);

    if format == FormatArg::Json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print_reports(&reports, severity.into(), &config);
    }

    let failed = reports.iter().any(|r| {
        r.score < config.min_quality_score
            || r.has_issue_at_or_above(config.severity_fail_threshold)
    });
    if failed {
        std::process::exit(1);
    }
    Ok(())
}

fn print_reports(reports: &[QualityReport], min_severity: Severity, config: &QualityConfig) {
    for report in reports {
        let passing = report.score >= config.min_quality_score
            && !report.has_issue_at_or_above(config.severity_fail_threshold);
        let status = if passing {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };

        println!("{status} {} ({:.1}/100, grade {})", report.unit_id, report.score, report.grade);

        if let Some(metrics) = &report.metrics {
            println!(
                "     complexity {} | doc coverage {:.0}% | smells {} | debt {} min",
                metrics.cyclomatic_complexity,
                metrics.docstring_coverage,
                metrics.code_smells,
                metrics.technical_debt_minutes
            );
        } else {
            println!("     metrics unavailable (unit failed to parse)");
        }

        for issue in report.issues.iter().filter(|i| i.severity >= min_severity) {
            let raw_tag = format!("[{}]", issue.severity);
            let tag = match issue.severity {
                Severity::Critical => raw_tag.as_str().red(),
                Severity::Warning => raw_tag.as_str().yellow(),
                Severity::Info => raw_tag.as_str().blue(),
            };
            println!(
                "     {tag} {}:{} ({}) {}",
                issue.line, issue.column, issue.category, issue.message
            );
            if let Some(suggestion) = &issue.suggestion {
                println!("           hint: {suggestion}");
            }
        }
    }

    let summary = summarize(reports);
    println!(
        "\n{} file(s), average {:.1}/100 (grade {}), {} critical / {} warning / {} info, {} debt min",
        summary.files,
        summary.average_score,
        summary.grade,
        summary.critical,
        summary.warnings,
        summary.info,
        summary.total_debt_minutes
    );
}

fn fix(
    path: &Path,
    dry_run: bool,
    output: Option<PathBuf>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    config.autofix_enabled = true;

    let units = collect_units(path)?;
    if output.is_some() && units.len() > 1 {
        bail!("--output only applies when fixing a single file");
    }

    let mut total_applied = 0usize;
    for unit in &units {
        let (_, fixes) = analyze_and_fix(unit, &config);
        let fixes = fixes.expect("autofix enabled");

        if !fixes.changed() {
            println!("{} {}: nothing to fix", "ok".green(), unit.id);
            continue;
        }

        total_applied += fixes.applied.len();
        println!(
            "{} {}: {} fix(es), {} skipped",
            if dry_run { "would fix".yellow() } else { "fixed".green() },
            unit.id,
            fixes.applied.len(),
            fixes.skipped_count()
        );
        for applied in &fixes.applied {
            println!("     line {}: {}", applied.line, applied.description);
        }
        for skipped in &fixes.skipped {
            println!("     skipped line {}: {} ({})", skipped.line, skipped.description, skipped.reason);
        }

        if !dry_run {
            let target = output
                .clone()
                .unwrap_or_else(|| PathBuf::from(&unit.id));
            fs::write(&target, &fixes.fixed_text)
                .with_context(|| format!("writing {}", target.display()))?;
        }
    }

    println!(
        "\n{} {} fix(es) across {} file(s)",
        if dry_run { "Would apply" } else { "Applied" },
        total_applied,
        units.len()
    );
    Ok(())
}
