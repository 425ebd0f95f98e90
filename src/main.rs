use arabic_cloze::audio::audio_manifest;
use arabic_cloze::config::AudioScheme;
use arabic_cloze::csv_codec::{decode_dataset, decode_word_list};
use arabic_cloze::dataset::renumber;
use arabic_cloze::pipeline::{run, RunStats};
use arabic_cloze::{BuilderConfig, ConsensusResolver, DatasetWriter, JsonLookupClient, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arabic-cloze-builder")]
#[command(about = "Build an Arabic vocabulary flashcard dataset with voted vocalizations and cloze examples")]
struct Args {
    /// Settings file (default: cloze.yaml in the current directory, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Append every new word of a word list to a dataset
    Build {
        /// Input word list CSV (partOfSpeech, note, word, cefrLevel, frequencyRank; one header row)
        word_list: PathBuf,

        /// Output dataset CSV, created if missing and otherwise appended to
        dataset: PathBuf,

        /// JSON file of saved transliteration and dictionary responses
        #[arg(long)]
        lookups: PathBuf,

        /// Only consider the first N words of the list
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List the audio files a dataset needs, as JSON lines
    AudioManifest {
        /// Dataset CSV
        dataset: PathBuf,

        /// Output JSONL file
        output: PathBuf,

        /// Skip files already present in this directory
        #[arg(long)]
        media_dir: Option<PathBuf>,

        /// Filename scheme (overrides the settings file)
        #[arg(long, value_enum)]
        scheme: Option<AudioScheme>,
    },

    /// Copy a dataset with its sequence numbers shifted
    Renumber {
        input: PathBuf,

        output: PathBuf,

        #[arg(long, allow_hyphen_values = true)]
        offset: i64,
    },
}

fn print_stats(stats: &RunStats, writer: &DatasetWriter) {
    println!();
    println!("============================================================");
    println!("Words considered: {}", stats.words_seen);
    println!("Words written: {}", stats.written);
    if let (Some(first), Some(last)) = (stats.first_sequence, stats.last_sequence) {
        println!("Sequence numbers: {}..={}", first, last);
    }
    println!("Already written: {}", stats.duplicates);
    println!("Without definitions: {}", stats.no_definitions);
    println!("Failed lookups: {}", stats.failed);
    println!("------------------------------------------------------------");
    println!("Dataset: {} ({} words)", writer.path().display(), writer.len());
    println!("Time: {}m {}s", stats.elapsed.as_secs() / 60, stats.elapsed.as_secs() % 60);
    println!("============================================================");
}

fn build(
    config: &BuilderConfig,
    word_list: PathBuf,
    dataset: PathBuf,
    lookups: PathBuf,
    limit: Option<usize>,
    quiet: bool,
) -> Result<()> {
    let words = decode_word_list(&word_list)?;
    let client = JsonLookupClient::from_file(&lookups)?;
    let mut writer = DatasetWriter::open(&dataset)?;
    let resolver = ConsensusResolver::new(config.voting);

    if !quiet {
        println!("Word list: {} ({} words)", word_list.display(), words.len());
        println!("Dataset: {} ({} words, last sequence {})", dataset.display(), writer.len(), writer.last_sequence());
        if let Some(limit) = limit {
            println!("Limit: {} words", limit);
        }
        println!();
    }

    let total = limit.map_or(words.len(), |l| l.min(words.len()));
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{bar:40}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    };

    let stats = run(words, &mut writer, &client, &resolver, limit, &pb)?;

    if !quiet {
        print_stats(&stats, &writer);
    }
    Ok(())
}

fn write_manifest(
    config: &BuilderConfig,
    dataset: PathBuf,
    output: PathBuf,
    media_dir: Option<PathBuf>,
    scheme: Option<AudioScheme>,
    quiet: bool,
) -> Result<()> {
    let records = decode_dataset(&dataset)?;
    let mut audio = config.audio;
    if let Some(scheme) = scheme {
        audio.scheme = scheme;
    }

    let entries = audio_manifest(&records, &audio, media_dir.as_deref());
    let mut writer = BufWriter::new(File::create(&output)?);
    for entry in &entries {
        writeln!(writer, "{}", serde_json::to_string(entry)?)?;
    }
    writer.flush()?;

    if !quiet {
        println!("Records: {}", records.len());
        println!("Audio files needed: {}", entries.len());
        println!("Output: {}", output.display());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match BuilderConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Command::Build {
            word_list,
            dataset,
            lookups,
            limit,
        } => build(&config, word_list, dataset, lookups, limit, args.quiet),
        Command::AudioManifest {
            dataset,
            output,
            media_dir,
            scheme,
        } => write_manifest(&config, dataset, output, media_dir, scheme, args.quiet),
        Command::Renumber {
            input,
            output,
            offset,
        } => renumber(&input, &output, offset).map(|count| {
            if !args.quiet {
                println!("Renumbered {} records by {:+} into {}", count, offset, output.display());
            }
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
