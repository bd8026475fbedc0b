use clap::{Parser, ValueEnum};
use findimg::io::{load_rgba_image, save_rgba_image};
use findimg::{random_subimage, Match, Metric, OwnedImage, Options, Rectangle, ScoreMap};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Locate a subimage inside an image")]
struct Cli {
    /// Image to search in.
    #[arg(value_name = "IMAGE", required_unless_present = "print_example")]
    image: Option<PathBuf>,
    /// Subimage to look for.
    #[arg(value_name = "SUBIMAGE", required_unless_present_any = ["random", "print_example"])]
    subimage: Option<PathBuf>,
    /// Result output format.
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,
    /// Cut a random subimage out of IMAGE and search for it.
    #[arg(long)]
    random: bool,
    /// Seed for --random; a fresh seed is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Write the --random subimage to this file.
    #[arg(long, value_name = "FILE", requires = "random")]
    save_sample: Option<PathBuf>,
    /// JSON options file; flags given on the command line take precedence.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print an example options file and exit.
    #[arg(long)]
    print_example: bool,
    /// Minimum working image width.
    #[arg(long)]
    img_min_width: Option<usize>,
    /// Maximum working image width.
    #[arg(long)]
    img_max_width: Option<usize>,
    /// Minimum subimage area.
    #[arg(long)]
    sub_min_area: Option<usize>,
    /// Maximum number of subimage divisions.
    #[arg(long)]
    sub_max_div: Option<usize>,
    /// Number of top matches to keep.
    #[arg(short)]
    k: Option<usize>,
    /// Score on 3x3 box-smoothed pixels.
    #[arg(long)]
    convolution: bool,
    /// Scan rows in parallel.
    #[arg(long)]
    parallel: bool,
    /// Print centers instead of sizes in text output.
    #[arg(long)]
    center: bool,
    /// Write per-placement confidence maps as JSON to this file.
    #[arg(long, value_name = "FILE")]
    score_map: Option<PathBuf>,
    /// Verbose diagnostics on stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MetricConfig {
    #[default]
    Raw,
    Convolution,
}

impl From<MetricConfig> for Metric {
    fn from(value: MetricConfig) -> Self {
        match value {
            MetricConfig::Raw => Metric::Raw,
            MetricConfig::Convolution => Metric::Convolution,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OptionsJson {
    top_k: usize,
    min_haystack_width: usize,
    max_haystack_width: usize,
    min_needle_area: usize,
    max_divisions: usize,
    metric: MetricConfig,
    parallel: bool,
}

impl Default for OptionsJson {
    fn default() -> Self {
        let opts = Options::default();
        Self {
            top_k: opts.top_k,
            min_haystack_width: opts.min_haystack_width,
            max_haystack_width: opts.max_haystack_width,
            min_needle_area: opts.min_needle_area,
            max_divisions: opts.max_divisions,
            metric: MetricConfig::Raw,
            parallel: opts.parallel,
        }
    }
}

impl OptionsJson {
    fn into_options(self, cli: &Cli) -> Options {
        Options {
            top_k: cli.k.unwrap_or(self.top_k),
            min_haystack_width: cli.img_min_width.unwrap_or(self.min_haystack_width),
            max_haystack_width: cli.img_max_width.unwrap_or(self.max_haystack_width),
            min_needle_area: cli.sub_min_area.unwrap_or(self.min_needle_area),
            max_divisions: cli.sub_max_div.unwrap_or(self.max_divisions),
            metric: if cli.convolution {
                Metric::Convolution
            } else {
                self.metric.into()
            },
            visualize: cli.score_map.is_some(),
            verbose: cli.verbose,
            parallel: cli.parallel || self.parallel,
        }
    }
}

#[derive(Debug, Serialize)]
struct RectRecord {
    min_x: usize,
    min_y: usize,
    width: usize,
    height: usize,
}

impl From<Rectangle> for RectRecord {
    fn from(value: Rectangle) -> Self {
        Self {
            min_x: value.min_x,
            min_y: value.min_y,
            width: value.width,
            height: value.height,
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    bounds: RectRecord,
    center_x: usize,
    center_y: usize,
    confidence: f64,
}

impl From<Match> for MatchRecord {
    fn from(value: Match) -> Self {
        Self {
            center_x: value.center_x(),
            center_y: value.center_y(),
            bounds: value.bounds.into(),
            confidence: value.confidence,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    matches: Vec<MatchRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ground_truth: Option<RectRecord>,
}

#[derive(Debug, Serialize)]
struct ScoreMapRecord<'a> {
    width: usize,
    height: usize,
    needle_width: usize,
    needle_height: usize,
    values: &'a [f32],
}

impl<'a> From<&'a ScoreMap> for ScoreMapRecord<'a> {
    fn from(value: &'a ScoreMap) -> Self {
        Self {
            width: value.width,
            height: value.height,
            needle_width: value.needle_width,
            needle_height: value.needle_height,
            values: &value.values,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("findimg=debug".parse()?))
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let options_json = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => OptionsJson::default(),
    };
    let opts = options_json.into_options(&cli);

    let image_path = cli.image.as_ref().ok_or("IMAGE is required")?;
    let haystack = load_rgba_image(image_path)?;

    let (needle, ground_truth): (OwnedImage, Option<Rectangle>) = if cli.random {
        let mut rng = match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let sample = random_subimage(&haystack, &mut rng)?;
        if let Some(path) = &cli.save_sample {
            save_rgba_image(&sample.needle, path)?;
        }
        (sample.needle, Some(sample.bounds))
    } else {
        let path = cli.subimage.as_ref().ok_or("SUBIMAGE is required")?;
        (load_rgba_image(path)?, None)
    };

    let out = findimg::search(haystack.view(), needle.view(), &opts)?;

    if let Some(path) = &cli.score_map {
        let maps: Vec<ScoreMapRecord<'_>> = out.score_maps.iter().map(Into::into).collect();
        fs::write(path, serde_json::to_string(&maps)?)?;
    }

    match cli.output {
        OutputFormat::Json => {
            let output = Output {
                matches: out.matches.into_iter().map(MatchRecord::from).collect(),
                ground_truth: ground_truth.map(RectRecord::from),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            if let Some(truth) = ground_truth {
                eprintln!(
                    "sample: {:4} {:4} {:4} {:4}",
                    truth.min_x, truth.min_y, truth.width, truth.height
                );
            }
            for m in &out.matches {
                let (a, b) = if cli.center {
                    (m.center_x(), m.center_y())
                } else {
                    (m.bounds.width, m.bounds.height)
                };
                println!(
                    "{:.6} {:4} {:4} {:4} {:4}",
                    m.confidence, m.bounds.min_x, m.bounds.min_y, a, b
                );
            }
        }
    }

    Ok(())
}
