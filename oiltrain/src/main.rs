use std::fs::File;
use std::io::{prelude::*, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use fastoil::report::{Classifier, Committee, Evaluation};
use fastoil::{Label, Nfa, OilTrainer, SampleSet};
use rand::rngs::StdRng;
use rand::SeedableRng;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::info;
use tracing::metadata::LevelFilter;

#[derive(Clone, Copy, Debug)]
enum ArgColor {
    Never,
    Always,
    Auto,
}

impl FromStr for ArgColor {
    type Err = &'static str;
    fn from_str(color: &str) -> Result<Self, Self::Err> {
        match color {
            "never" => Ok(Self::Never),
            "always" => Ok(Self::Always),
            "auto" => Ok(Self::Auto),
            _ => Err("Could not parse a color"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "oiltrain", about = "Trains and evaluates automata with the OIL algorithm.")]
struct Opt {
    #[command(subcommand)]
    command: Command,

    /// Colors the summary. [never, always, auto]
    #[arg(long, global = true, default_value = "auto")]
    color: ArgColor,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trains one model, writing it to <MODEL> and a Graphviz rendering to <MODEL>.dot.
    #[command(name = "train_single")]
    TrainSingle {
        samples: PathBuf,
        model: PathBuf,
        #[command(flatten)]
        train: TrainOpt,
    },

    /// Trains <COUNT> models listed in the manifest <MANIFEST>.
    #[command(name = "train_multiple")]
    TrainMultiple {
        samples: PathBuf,
        manifest: PathBuf,
        count: usize,
        #[command(flatten)]
        train: TrainOpt,
    },

    /// Evaluates one model on a sample file.
    #[command(name = "test_single")]
    TestSingle {
        samples: PathBuf,
        model: PathBuf,
        report: PathBuf,
    },

    /// Evaluates the majority vote of the models listed in a manifest.
    #[command(name = "test_multiple")]
    TestMultiple {
        samples: PathBuf,
        manifest: PathBuf,
        report: PathBuf,
    },
}

#[derive(Args, Debug)]
struct TrainOpt {
    /// Commits the first safe merge instead of searching for the best one.
    #[arg(long)]
    skip_search: bool,

    /// Considers new states in creation order.
    #[arg(long)]
    no_random: bool,

    /// Seed of the random merge order. Model i of train_multiple uses SEED + i.
    #[arg(long)]
    seed: Option<u64>,

    /// Logs every considered and committed merge.
    #[arg(short, long)]
    verbose: bool,

    /// Suppresses progress messages.
    #[arg(short, long)]
    quiet: bool,
}

impl TrainOpt {
    fn trainer(&self) -> OilTrainer {
        OilTrainer::new()
            .show_progress(!self.quiet)
            .show_merges(self.verbose)
            .show_possible_merges(self.verbose)
            .skip_best_search(self.skip_search)
            .deterministic(self.no_random)
    }

    fn max_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::DEBUG
        } else if self.quiet {
            LevelFilter::WARN
        } else {
            LevelFilter::INFO
        }
    }
}

const MODEL_PREFIX: &str = "automata-";
const MODEL_EXTENSION: &str = "auto";

fn load_samples(path: &Path) -> Result<SampleSet, Box<dyn std::error::Error>> {
    info!(path = %path.display(), "loading samples");
    let buf = BufReader::new(File::open(path)?);
    Ok(SampleSet::from_reader(buf)?)
}

fn load_model(path: &Path) -> Result<Nfa, Box<dyn std::error::Error>> {
    info!(path = %path.display(), "loading model");
    let buf = BufReader::new(File::open(path)?);
    Ok(Nfa::deserialize(buf)?)
}

fn train_single(
    samples: &mut SampleSet,
    model: &Path,
    opt: &TrainOpt,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let seed = seed.unwrap_or_else(rand::random);
    info!(seed, model = %model.display(), "training");
    let mut rng = StdRng::seed_from_u64(seed);
    let nfa = opt.trainer().train(samples, &mut rng)?;

    let mut wtr = BufWriter::new(File::create(model)?);
    nfa.serialize(&mut wtr)?;
    wtr.flush()?;

    let mut dot_path = model.as_os_str().to_owned();
    dot_path.push(".dot");
    let mut wtr = BufWriter::new(File::create(dot_path)?);
    nfa.write_dot(&mut wtr)?;
    wtr.flush()?;
    Ok(())
}

fn train_multiple(
    samples: &mut SampleSet,
    manifest: &Path,
    count: usize,
    opt: &TrainOpt,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = manifest.parent().unwrap_or_else(|| Path::new(""));
    let mut wtr = BufWriter::new(File::create(manifest)?);
    writeln!(wtr, "# Classifier manifest")?;
    writeln!(wtr, "# Model files, relative to this manifest")?;
    for i in 0..count {
        let name = format!("{MODEL_PREFIX}{i}.{MODEL_EXTENSION}");
        let seed = opt.seed.map(|seed| seed.wrapping_add(i as u64));
        train_single(samples, &dir.join(&name), opt, seed)?;
        writeln!(wtr, "{name}")?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads the model paths listed in a manifest, resolved against its directory.
fn read_manifest(manifest: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let dir = manifest.parent().unwrap_or_else(|| Path::new(""));
    let buf = BufReader::new(File::open(manifest)?);
    let mut models = vec![];
    for line in buf.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        models.push(dir.join(line));
    }
    Ok(models)
}

fn check_alphabet(nfa: &Nfa, samples: &SampleSet) -> Result<(), Box<dyn std::error::Error>> {
    if nfa.alphabet_size() < samples.alphabet_size() {
        return Err(format!(
            "model alphabet of size {} is smaller than the sample alphabet of size {}",
            nfa.alphabet_size(),
            samples.alphabet_size()
        )
        .into());
    }
    Ok(())
}

/// Evaluates `classifier`, writing one line per decision and the totals to `report`.
fn write_report<C>(
    classifier: &C,
    samples: &SampleSet,
    report: &Path,
) -> Result<Evaluation, Box<dyn std::error::Error>>
where
    C: Classifier,
{
    let mut wtr = BufWriter::new(File::create(report)?);
    let mut result = Ok(());
    let eval = Evaluation::run(classifier, samples, |label, i, accepted| {
        if result.is_err() {
            return;
        }
        if i == 0 {
            let header = match label {
                Label::Positive => "Positive samples",
                Label::Negative => "Negative samples",
            };
            result = writeln!(wtr, "{header}");
        }
        if result.is_ok() {
            result = writeln!(wtr, "Evaluation # {i} class: {}", u8::from(accepted));
        }
    });
    result?;
    write_totals(&mut wtr, &eval)?;
    wtr.flush()?;
    Ok(eval)
}

fn write_totals<W>(mut wtr: W, eval: &Evaluation) -> std::io::Result<()>
where
    W: Write,
{
    writeln!(
        wtr,
        "TP: {}/{} TN: {}/{}",
        eval.true_positives, eval.positives, eval.true_negatives, eval.negatives
    )?;
    writeln!(
        wtr,
        "Total: {} Total P: {} Total N: {}",
        eval.total(),
        eval.positives,
        eval.negatives
    )
}

/// Prints the totals, highlighting the accuracy.
fn print_summary(eval: &Evaluation, stream: &mut StandardStream) -> std::io::Result<()> {
    write_totals(&mut *stream, eval)?;
    if let Some(accuracy) = eval.accuracy() {
        write!(stream, "Accuracy: ")?;
        let color = if eval.correct() == eval.total() {
            Color::Green
        } else {
            Color::Yellow
        };
        stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(stream, "{:.2}%", accuracy * 100.0)?;
        stream.reset()?;
        writeln!(stream)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Opt::parse();

    let max_level = match &opt.command {
        Command::TrainSingle { train, .. } | Command::TrainMultiple { train, .. } => {
            train.max_level()
        }
        Command::TestSingle { .. } | Command::TestMultiple { .. } => LevelFilter::INFO,
    };
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Initialize the stream of termcolor.
    let mut stdout = match opt.color {
        ArgColor::Never => StandardStream::stdout(ColorChoice::Never),
        ArgColor::Always => StandardStream::stdout(ColorChoice::Always),
        ArgColor::Auto => StandardStream::stdout(ColorChoice::Auto),
    };

    match opt.command {
        Command::TrainSingle {
            samples,
            model,
            train,
        } => {
            let mut samples = load_samples(&samples)?;
            train_single(&mut samples, &model, &train, train.seed)?;
        }
        Command::TrainMultiple {
            samples,
            manifest,
            count,
            train,
        } => {
            let mut samples = load_samples(&samples)?;
            train_multiple(&mut samples, &manifest, count, &train)?;
        }
        Command::TestSingle {
            samples,
            model,
            report,
        } => {
            let nfa = load_model(&model)?;
            let samples = load_samples(&samples)?;
            check_alphabet(&nfa, &samples)?;
            let eval = write_report(&nfa, &samples, &report)?;
            print_summary(&eval, &mut stdout)?;
        }
        Command::TestMultiple {
            samples,
            manifest,
            report,
        } => {
            let mut models = vec![];
            for path in read_manifest(&manifest)? {
                models.push(load_model(&path)?);
            }
            info!(models = models.len(), "loaded manifest");
            let samples = load_samples(&samples)?;
            for nfa in &models {
                check_alphabet(nfa, &samples)?;
            }
            let committee = Committee::new(models)?;
            let eval = write_report(&committee, &samples, &report)?;
            print_summary(&eval, &mut stdout)?;
        }
    }

    Ok(())
}
