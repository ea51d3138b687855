mod settings;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use transcript_compare_core::alignment::infrastructure::renderer_factory::create_renderer;
use transcript_compare_core::normalization::domain::text_normalizer::normalize_text;
use transcript_compare_core::normalization::infrastructure::word_map_store::WordMapStore;
use transcript_compare_core::pipeline::compare_transcripts_use_case::{
    CompareTranscriptsUseCase, Panel, PanelReport,
};
use transcript_compare_core::pipeline::comparison_executor::{
    ComparisonExecutor, SequentialComparisonExecutor,
};
use transcript_compare_core::pipeline::comparison_logger::SummaryComparisonLogger;
use transcript_compare_core::pipeline::infrastructure::threaded_comparison_executor::ThreadedComparisonExecutor;
use transcript_compare_core::scoring::domain::der::DerMetrics;
use transcript_compare_core::scoring::domain::wer::WerMetrics;
use transcript_compare_core::shared::config::{
    ComparisonConfig, DiarizationConfig, MissingTimestampPolicy,
};
use transcript_compare_core::shared::rate::format_percent;
use transcript_compare_core::shared::tokenizer::Granularity;
use transcript_compare_core::suggestions::domain::suggestion_miner::SuggestionMiner;
use transcript_compare_core::{calculate_der, calculate_wer, strip_speaker_tags};

use settings::{OutputFormat, Settings};

/// Compare transcripts against a ground truth: diffs, WER, DER and word-map
/// suggestions.
#[derive(Parser)]
#[command(name = "transcript-compare", version)]
struct Cli {
    /// Word map file (defaults to the per-user config directory).
    #[arg(long, global = true)]
    word_map: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Diff, WER, DER and suggestions for each hypothesis.
    Compare(CompareArgs),

    /// Word error rate of one hypothesis.
    Wer {
        reference: PathBuf,
        hypothesis: PathBuf,

        /// Normalize case, punctuation and mapped words first.
        #[arg(long)]
        normalized: bool,
    },

    /// Diarization error rate of one hypothesis.
    Der {
        reference: PathBuf,
        hypothesis: PathBuf,

        #[command(flatten)]
        diarization: DiarizationArgs,
    },

    /// Print a transcript without timestamps and speaker labels.
    Strip { file: PathBuf },

    /// List one-word substitutions not yet in the word map.
    Suggest {
        reference: PathBuf,

        #[arg(required = true)]
        hypotheses: Vec<PathBuf>,

        /// Add the suggestions to the word map.
        #[arg(long)]
        apply: bool,
    },

    /// Inspect or edit the word map.
    Map {
        #[command(subcommand)]
        action: MapCommand,
    },
}

#[derive(clap::Args)]
struct CompareArgs {
    reference: PathBuf,

    #[arg(required = true)]
    hypotheses: Vec<PathBuf>,

    /// Normalize case, punctuation and mapped words before comparing.
    #[arg(long)]
    normalized: bool,

    /// Diff granularity: word or char.
    #[arg(long)]
    mode: Option<String>,

    /// Output format: ansi, html, plain or json.
    #[arg(long)]
    format: Option<String>,

    /// Worker threads (1 = score panels sequentially).
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    diarization: DiarizationArgs,
}

#[derive(clap::Args)]
struct DiarizationArgs {
    /// Seconds given to the last speaker turn when nothing bounds it.
    #[arg(long)]
    tail_seconds: Option<f64>,

    /// Untimed speaker lines: skip or zero.
    #[arg(long)]
    missing_timestamp: Option<String>,
}

#[derive(Subcommand)]
enum MapCommand {
    /// Show every target with its aliases.
    List,
    /// Map SOURCE to TARGET.
    Add { source: String, target: String },
    /// Remove one alias.
    Remove { source: String, target: String },
    /// Remove a target and all of its aliases.
    RemoveTarget { target: String },
    /// Replace the map with a JSON file.
    Import { file: PathBuf },
    /// Write the map as JSON to a file or stdout.
    Export { file: Option<PathBuf> },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let store = match &cli.word_map {
        Some(path) => WordMapStore::new(path),
        None => WordMapStore::default_location()?,
    };
    let settings = Settings::load();

    match cli.command {
        Command::Compare(args) => run_compare(&args, &settings, &store),
        Command::Wer {
            reference,
            hypothesis,
            normalized,
        } => run_wer(&reference, &hypothesis, normalized || settings.normalized, &store),
        Command::Der {
            reference,
            hypothesis,
            diarization,
        } => {
            let config = diarization_config(&diarization, &settings)?;
            let metrics = calculate_der(&read_text(&reference)?, &read_text(&hypothesis)?, &config);
            println!("{}", describe_der(&metrics));
            Ok(())
        }
        Command::Strip { file } => {
            println!("{}", strip_speaker_tags(&read_text(&file)?));
            Ok(())
        }
        Command::Suggest {
            reference,
            hypotheses,
            apply,
        } => run_suggest(&reference, &hypotheses, apply, &store),
        Command::Map { action } => run_map(action, &store),
    }
}

fn run_compare(
    args: &CompareArgs,
    settings: &Settings,
    store: &WordMapStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = comparison_config(args, settings)?;
    let format = match &args.format {
        Some(raw) => raw.parse::<OutputFormat>()?,
        None => settings.format,
    };
    let threads = args.threads.unwrap_or(settings.threads);
    if threads == 0 {
        return Err("Threads must be at least 1".into());
    }

    let mut panels = vec![read_panel(&args.reference)?];
    for path in &args.hypotheses {
        panels.push(read_panel(path)?);
    }

    let executor: Box<dyn ComparisonExecutor> = if threads > 1 {
        Box::new(ThreadedComparisonExecutor::new(threads))
    } else {
        Box::new(SequentialComparisonExecutor)
    };
    let mut use_case = CompareTranscriptsUseCase::new(
        config,
        store.load()?,
        create_renderer(format.markup()),
        executor,
        Box::new(SummaryComparisonLogger::new()),
    );
    let reports = use_case.execute(&panels)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }
    Ok(())
}

fn run_wer(
    reference: &Path,
    hypothesis: &Path,
    normalized: bool,
    store: &WordMapStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reference = strip_speaker_tags(&read_text(reference)?);
    let mut hypothesis = strip_speaker_tags(&read_text(hypothesis)?);
    if normalized {
        let map = store.load()?;
        reference = normalize_text(&reference, &map);
        hypothesis = normalize_text(&hypothesis, &map);
    }
    println!("{}", describe_wer(&calculate_wer(&reference, &hypothesis)));
    Ok(())
}

fn run_suggest(
    reference: &Path,
    hypotheses: &[PathBuf],
    apply: bool,
    store: &WordMapStore,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut map = store.load()?;
    let reference = read_text(reference)?;
    let texts = hypotheses
        .iter()
        .map(|path| read_text(path))
        .collect::<Result<Vec<_>, _>>()?;
    let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();

    let suggestions = SuggestionMiner::new(&map).mine(&reference, &text_refs);
    if suggestions.is_empty() {
        eprintln!("No new suggestions");
        return Ok(());
    }
    for suggestion in &suggestions {
        println!("{suggestion}");
    }

    if apply {
        let mut added = 0;
        for suggestion in &suggestions {
            if map.add_alias(&suggestion.source, &suggestion.target)? {
                added += 1;
            }
        }
        store.save(&map)?;
        eprintln!("Added {added} mappings to {}", store.path().display());
    }
    Ok(())
}

fn run_map(action: MapCommand, store: &WordMapStore) -> Result<(), Box<dyn std::error::Error>> {
    let mut map = store.load()?;
    match action {
        MapCommand::List => {
            if map.is_empty() {
                eprintln!("Word map is empty");
            }
            for (target, aliases) in map.iter() {
                println!("{target}: {}", aliases.collect::<Vec<_>>().join(", "));
            }
            return Ok(());
        }
        MapCommand::Export { file } => {
            let json = map.to_json_pretty()?;
            match file {
                Some(path) => fs::write(&path, json)
                    .map_err(|e| format!("Failed to write {}: {e}", path.display()))?,
                None => println!("{json}"),
            }
            return Ok(());
        }
        MapCommand::Add { source, target } => {
            if !map.add_alias(&source, &target)? {
                eprintln!("'{source}' already maps to '{target}'");
                return Ok(());
            }
        }
        MapCommand::Remove { source, target } => {
            if !map.remove_alias(&source, &target) {
                return Err(format!("No mapping '{source}' -> '{target}'").into());
            }
        }
        MapCommand::RemoveTarget { target } => {
            if !map.remove_target(&target) {
                return Err(format!("No target '{target}' in word map").into());
            }
        }
        MapCommand::Import { file } => {
            map.replace_with_json(&read_text(&file)?)?;
        }
    }
    store.save(&map)?;
    log::info!(
        "Word map saved to {} ({} targets, {} aliases)",
        store.path().display(),
        map.len(),
        map.alias_count()
    );
    Ok(())
}

fn comparison_config(
    args: &CompareArgs,
    settings: &Settings,
) -> Result<ComparisonConfig, Box<dyn std::error::Error>> {
    let granularity = match &args.mode {
        Some(raw) => raw.parse::<Granularity>()?,
        None => settings.mode,
    };
    Ok(ComparisonConfig {
        normalized: args.normalized || settings.normalized,
        granularity,
        diarization: diarization_config(&args.diarization, settings)?,
    })
}

fn diarization_config(
    args: &DiarizationArgs,
    settings: &Settings,
) -> Result<DiarizationConfig, Box<dyn std::error::Error>> {
    let mut config = settings.diarization.clone();
    if let Some(tail) = args.tail_seconds {
        if !tail.is_finite() || tail < 0.0 {
            return Err(format!("Tail seconds must be a non-negative number, got {tail}").into());
        }
        config = config.with_tail_seconds(tail);
    }
    if let Some(raw) = &args.missing_timestamp {
        config = config.with_missing_timestamp(raw.parse::<MissingTimestampPolicy>()?);
    }
    Ok(config)
}

fn read_text(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()).into())
}

fn read_panel(path: &Path) -> Result<Panel, Box<dyn std::error::Error>> {
    Ok(Panel::new(panel_title(path), read_text(path)?))
}

fn panel_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn describe_wer(metrics: &WerMetrics) -> String {
    format!(
        "WER {} (S={} I={} D={}, {} reference words)",
        format_percent(metrics.wer),
        metrics.subs,
        metrics.ins,
        metrics.dels,
        metrics.reference_words
    )
}

fn describe_der(metrics: &DerMetrics) -> String {
    format!(
        "DER {} (confusion {:.2}s, missed {:.2}s, false alarm {:.2}s over {:.2}s)",
        format_percent(metrics.der),
        metrics.speaker_confusion,
        metrics.missed_speech,
        metrics.false_alarm,
        metrics.reference_duration
    )
}

fn print_report(report: &PanelReport) {
    println!("== {} ==", report.title);
    println!("{}", describe_wer(&report.wer));
    println!("{}", describe_der(&report.der));
    println!();
    println!("{}", report.diff_markup);
    if !report.suggestions.is_empty() {
        println!();
        println!("Suggestions:");
        for suggestion in &report.suggestions {
            println!("  {suggestion}");
        }
    }
    println!();
}
