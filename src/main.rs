use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use youtube_transcripts::cli::{Cli, Commands, OutputFormat, TranscriptFilter};
use youtube_transcripts::utils::extract_video_id;
use youtube_transcripts::{
    ensure_no_cookies, output, run_batch, Config, Proxies, TranscriptApi, TranscriptItem,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only transcripts
    let default_filter = if cli.verbose {
        "youtube_transcripts=debug"
    } else {
        "youtube_transcripts=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Fetch {
            video_ids,
            languages,
            exclude_generated,
            exclude_manually_created,
            translate,
            format,
            output: output_path,
            http_proxy,
            https_proxy,
            cookies,
            fail_fast,
        } => {
            ensure_no_cookies(cookies.as_deref())?;

            let languages = if languages.is_empty() {
                config.fetch.languages.clone()
            } else {
                languages
            };
            let format = match format {
                Some(format) => format,
                None => config
                    .app
                    .default_output_format
                    .parse::<OutputFormat>()
                    .map_err(|err| anyhow::anyhow!("Invalid default output format: {}", err))?,
            };
            let request = FetchRequest {
                languages: languages.iter().map(String::as_str).collect(),
                filter: TranscriptFilter::from_flags(exclude_generated, exclude_manually_created),
                translate: translate.as_deref(),
                proxies: Proxies {
                    http: http_proxy,
                    https: https_proxy,
                },
            };
            let continue_after_error = config.app.continue_after_error && !fail_fast;

            let api = TranscriptApi::new(&config.fetch).context("Failed to create HTTP client")?;
            let (transcripts, failures) =
                fetch_all(&api, &video_ids, &request, continue_after_error, cli.quiet).await?;

            match output_path {
                Some(path) => {
                    output::save_to_file(&transcripts, &path, &format)?;
                    eprintln!("Transcripts saved to: {}", path.display());
                }
                None if !transcripts.is_empty() => {
                    output::print_to_console(&transcripts, &format)?;
                }
                None => {}
            }

            report_failures(&failures, video_ids.len())?;
        }
        Commands::List {
            video_ids,
            http_proxy,
            https_proxy,
            cookies,
        } => {
            ensure_no_cookies(cookies.as_deref())?;

            let api = TranscriptApi::new(&config.fetch).context("Failed to create HTTP client")?;
            let proxies = Proxies {
                http: http_proxy,
                https: https_proxy,
            };

            let mut failures = Vec::new();
            for input in &video_ids {
                let Some(video_id) = extract_video_id(input) else {
                    tracing::warn!("Not a YouTube video id or URL: {}", input);
                    failures.push(input.clone());
                    continue;
                };

                match api.list_transcripts(&video_id, Some(&proxies), None).await {
                    Ok(list) => println!("{}", list),
                    Err(err) => {
                        tracing::warn!("Skipping video {}: {}", video_id, err);
                        failures.push(video_id);
                    }
                }
            }

            report_failures(&failures, video_ids.len())?;
        }
        Commands::Config { show, init } => {
            if init {
                config.validate()?;
                let path = config.save()?;
                println!("Configuration written to: {}", path.display());
            } else if show {
                config.display();
            } else {
                println!("Configuration file: {}", Config::config_path()?.display());
                println!("Use --show to print it or --init to write the defaults");
            }
        }
    }

    Ok(())
}

struct FetchRequest<'a> {
    languages: Vec<&'a str>,
    filter: TranscriptFilter,
    translate: Option<&'a str>,
    proxies: Proxies,
}

/// Fetch every video in order; returns transcripts in input order and failed ids
async fn fetch_all(
    api: &TranscriptApi,
    inputs: &[String],
    request: &FetchRequest<'_>,
    continue_after_error: bool,
    quiet: bool,
) -> Result<(Vec<Vec<TranscriptItem>>, Vec<String>)> {
    let mut video_ids = Vec::with_capacity(inputs.len());
    let mut invalid = Vec::new();
    for input in inputs {
        match extract_video_id(input) {
            Some(video_id) => video_ids.push(video_id),
            None if continue_after_error => {
                tracing::warn!("Not a YouTube video id or URL: {}", input);
                invalid.push(input.clone());
            }
            None => anyhow::bail!("not a YouTube video id or URL: {}", input),
        }
    }

    let progress = if quiet || video_ids.len() < 2 {
        ProgressBar::hidden()
    } else {
        let progress = ProgressBar::new(video_ids.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?,
        );
        progress
    };

    let progress_ref = &progress;
    let mut batch = run_batch(&video_ids, continue_after_error, |video_id| async move {
        progress_ref.set_message(video_id.clone());
        let outcome = fetch_one(api, &video_id, request).await;
        progress_ref.inc(1);
        outcome
    })
    .await?;
    progress.finish_and_clear();

    let mut transcripts = Vec::new();
    for video_id in &video_ids {
        match batch.successes.remove(video_id) {
            Some(Some(items)) => transcripts.push(items),
            Some(None) => tracing::info!("All transcript kinds excluded for video {}", video_id),
            None => {}
        }
    }

    invalid.append(&mut batch.failures);
    Ok((transcripts, invalid))
}

async fn fetch_one(
    api: &TranscriptApi,
    video_id: &str,
    request: &FetchRequest<'_>,
) -> youtube_transcripts::Result<Option<Vec<TranscriptItem>>> {
    let list = api
        .list_transcripts(video_id, Some(&request.proxies), None)
        .await?;

    let Some(transcript) = request.filter.select(&list, &request.languages)? else {
        return Ok(None);
    };

    let items = match request.translate {
        Some(language_code) => transcript.translate(language_code)?.fetch().await?,
        None => transcript.fetch().await?,
    };

    Ok(Some(items))
}

fn report_failures(failures: &[String], total: usize) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }

    for video_id in failures {
        eprintln!("{} {}", style("✗").red(), style(video_id).bold());
    }

    anyhow::bail!("{} of {} videos could not be retrieved", failures.len(), total)
}
