use clap::{Args as ClapArgs, Parser, Subcommand};
use serde_json::json;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use dataset_viewer::config;
use dataset_viewer::render::{self, RenderOptions};
use dataset_viewer::{
    CategoryFilter, Dataset, Direction, FileVariant, Query, RecordIndex, find_filtered_index, read_record_by_index,
    read_records,
};

/// Dataset Viewer - browse JSONL training datasets and their action overlays
#[derive(Parser, Debug)]
#[command(
    name = "dataset-viewer",
    about = "Read-only browser for JSONL training datasets with action overlays",
    after_help = "ENVIRONMENT VARIABLES:\n\
        DATASET_VIEWER_DATA_DIR       Root directory holding datasets\n\
        DATASET_VIEWER_PAGE_SIZE      Default page size for list\n\
        DATASET_VIEWER_DEFAULT_FILE   Default file variant (data, train, val)\n\
        DATASET_VIEWER_CATALOG_FILE   Category catalog file name\n\
        DATASET_VIEWER_OUTPUT_DIR     Directory for rendered overlays\n\
        RUST_LOG                      Log filter (default: warn)"
)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Which dataset file to read
#[derive(ClapArgs, Debug)]
struct Source {
    /// Dataset name under the data directory, or an absolute path
    #[arg(short, long)]
    dataset: String,

    /// File variant: data, train or val (default: DATASET_VIEWER_DEFAULT_FILE, else data)
    #[arg(short, long)]
    file: Option<FileVariant>,

    /// Root directory holding datasets (default: DATASET_VIEWER_DATA_DIR, else /datasets)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

impl Source {
    fn dataset(&self) -> Dataset {
        match &self.data_dir {
            Some(root) => Dataset::resolve(root, &self.dataset),
            None => Dataset::from_config(&self.dataset),
        }
    }

    fn file(&self) -> FileVariant {
        self.file.unwrap_or_else(config::default_file)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a page of records as JSON
    List {
        #[command(flatten)]
        source: Source,

        /// Number of matching records to skip
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Page size (default: DATASET_VIEWER_PAGE_SIZE, else 20)
        #[arg(long)]
        limit: Option<usize>,

        /// Comma-separated task types to keep
        #[arg(short, long)]
        task_types: Option<String>,

        /// Case-insensitive substring matched against the whole record
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Print the record at a position, with its parsed action
    Show {
        #[command(flatten)]
        source: Source,

        /// 0-based position among valid records
        index: usize,
    },

    /// Find the next or previous record matching the task types
    Find {
        #[command(flatten)]
        source: Source,

        /// Position to search from
        index: usize,

        /// next or prev
        direction: Direction,

        /// Comma-separated task types to match (empty matches any)
        #[arg(short, long, default_value = "")]
        task_types: String,

        /// Build a position index first instead of a streaming scan
        #[arg(long)]
        indexed: bool,
    },

    /// List the dataset's task types
    Categories {
        #[command(flatten)]
        source: Source,
    },

    /// Draw a record's action overlay onto its screenshot
    Render {
        #[command(flatten)]
        source: Source,

        /// 0-based position among valid records
        index: usize,

        /// Image to draw on instead of the record's own
        #[arg(long)]
        image: Option<PathBuf>,

        /// Output PNG path (default: timestamped file in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Display scale applied to the image
        #[arg(long, default_value = "1.0")]
        scale: f64,

        /// Print a data URL instead of writing a file
        #[arg(long)]
        data_url: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::List {
            source,
            offset,
            limit,
            task_types,
            search,
        } => {
            let limit = limit.unwrap_or_else(config::page_size);
            let mut query = Query::new(source.dataset(), limit).offset(offset).file(source.file());
            if let Some(task_types) = task_types {
                query = query.task_types(&task_types);
            }
            if let Some(search) = search {
                query = query.search(search);
            }
            let page = read_records(&query)?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }

        Commands::Show { source, index } => {
            let record = read_record_by_index(&source.dataset(), index, source.file())?;
            let output = match record {
                Some(record) => json!({
                    "index": index,
                    "action": record.action(),
                    "record": record,
                }),
                None => serde_json::Value::Null,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Find {
            source,
            index,
            direction,
            task_types,
            indexed,
        } => {
            let dataset = source.dataset();
            let filter = CategoryFilter::parse(&task_types);
            let found = if indexed {
                RecordIndex::build(&dataset, source.file())?.find(index, direction, &filter)
            } else {
                find_filtered_index(&dataset, index, direction, &filter, source.file())?
            };
            println!("{}", serde_json::to_string(&found)?);
        }

        Commands::Categories { source } => {
            let categories = source.dataset().categories(source.file())?;
            println!("{}", serde_json::to_string_pretty(&categories)?);
        }

        Commands::Render {
            source,
            index,
            image,
            output,
            scale,
            data_url,
        } => {
            let dataset = source.dataset();
            let file = source.file();
            let record = read_record_by_index(&dataset, index, file)?
                .ok_or_else(|| format!("no record at index {} in {}", index, dataset.file_path(file).display()))?;

            let mut options = RenderOptions::default().scale(scale);
            if let Some(image) = image {
                options = options.image(image);
            }
            let overlay = render::render_record(&dataset, &record, &options)?;

            if data_url {
                println!("{}", render::to_data_url(&overlay.png));
            } else {
                let path = match output {
                    Some(path) => {
                        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                            fs::create_dir_all(parent)?;
                        }
                        fs::write(&path, &overlay.png)?;
                        path
                    }
                    None => render::write_overlay(&config::output_dir(), &record.id, &overlay.png)?,
                };
                let summary = json!({
                    "path": path,
                    "overlay": overlay,
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
        }
    }

    Ok(())
}
