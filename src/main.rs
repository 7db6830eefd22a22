use clap::{Args, Parser, Subcommand};
use mri_dataset::{
    list_image_paths, ClassLabelMap, DatasetLoader, LoaderConfig, DEFAULT_DATA_ROOT,
    DEFAULT_TARGET_SIZE,
};
use std::path::{Path, PathBuf};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "mri-dataset")]
#[command(about = "Inspect and load labeled grayscale MRI image folders")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every (class, image path) pair under the data root.
    List {
        /// Directory holding one subdirectory per class.
        #[arg(long, default_value = DEFAULT_DATA_ROOT)]
        root: PathBuf,
    },

    /// Preprocess the whole dataset in memory and print its shapes.
    Load(LoadArgs),
}

#[derive(Debug, Clone, Args)]
struct LoadArgs {
    /// Directory holding one subdirectory per class.
    #[arg(long, default_value = DEFAULT_DATA_ROOT)]
    root: PathBuf,

    /// Skip histogram stretching.
    #[arg(long)]
    no_autocontrast: bool,

    /// Keep raw 0-255 intensities instead of scaling to [0, 1].
    #[arg(long)]
    no_normalize: bool,

    /// Take at most this many images from each class.
    #[arg(long)]
    limit_per_class: Option<usize>,

    /// Resize width in pixels.
    #[arg(long, default_value_t = DEFAULT_TARGET_SIZE.0)]
    width: u32,

    /// Resize height in pixels.
    #[arg(long, default_value_t = DEFAULT_TARGET_SIZE.1)]
    height: u32,
}

impl LoadArgs {
    fn to_config(&self) -> LoaderConfig {
        LoaderConfig::default()
            .with_autocontrast(!self.no_autocontrast)
            .with_normalize(!self.no_normalize)
            .with_limit_per_class(self.limit_per_class)
            .with_target_size(Some((self.width, self.height)))
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { root } => run_list(&root),
        Commands::Load(args) => run_load(&args),
    }
}

fn run_list(root: &Path) -> CliResult<()> {
    let samples = list_image_paths(root)?;
    for (path, class_name) in &samples {
        println!("{}\t{}", class_name, path.display());
    }
    tracing::info!("{} images under {}", samples.len(), root.display());
    Ok(())
}

fn run_load(args: &LoadArgs) -> CliResult<()> {
    tracing::info!("Loading dataset from {}", args.root.display());

    let loader = DatasetLoader::new(ClassLabelMap::binary(), args.to_config());
    let dataset = loader.load(&args.root)?;

    println!("X shape: {:?}", dataset.x.shape());
    println!("y shape: {:?}", dataset.y.shape());
    println!("Samples per class:");
    for (class_name, count) in dataset.class_counts() {
        println!("  {class_name}: {count}");
    }
    println!("Samples per label:");
    for (label, count) in dataset.label_counts() {
        println!("  {label}: {count}");
    }
    Ok(())
}
