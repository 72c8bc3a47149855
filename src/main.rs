use anyhow::{bail, Context, Result};
use clap::Parser;
use tabclean::{
    cli::CliArgs,
    pipeline::{write_reports, Job, Pipeline},
    schema::{builtin_profiles, load_profiles},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    let args = CliArgs::parse();
    info!(?args, "startup");

    // ─── 2) load dataset profiles ────────────────────────────────────
    let profiles = match &args.profiles {
        Some(path) => load_profiles(path)
            .with_context(|| format!("loading profiles from {}", path.display()))?,
        None => builtin_profiles(),
    };

    let pipeline = Pipeline::new(
        &args.input_dir,
        &args.output_dir,
        profiles,
        args.validation_mode(),
    )
    .with_context(|| format!("preparing output directory {}", args.output_dir.display()))?;

    // ─── 3) run every dataset ────────────────────────────────────────
    let jobs: Vec<Job> = if args.files.is_empty() {
        pipeline.default_jobs()
    } else {
        args.files.iter().cloned().map(Job::File).collect()
    };
    let outcomes = pipeline.run_all(&jobs, args.parallel);

    // ─── 4) reports + exit status ────────────────────────────────────
    if let Some(path) = &args.report {
        let reports: Vec<_> = outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .collect();
        write_reports(path, &reports)
            .with_context(|| format!("writing report {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|o| o.result.is_err())
        .map(|o| o.label.as_str())
        .collect();
    if !failed.is_empty() {
        bail!("{} dataset(s) failed: {}", failed.len(), failed.join(", "));
    }

    info!("done");
    Ok(())
}
