use crate::body_generator::DefaultPolicy;
use crate::scanner::ScanMode;
use anyhow::Result;
use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;

/// Postman Collection Generator - Build Postman collections from Spring controller sources
#[derive(Parser, Debug)]
#[command(name = "postman-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Root directory holding one subdirectory per API
    #[arg(value_name = "JAVA_DIRECTORY", env = "JAVA_DIRECTORY")]
    pub java_directory: PathBuf,

    /// Directory receiving the timestamped collection file
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        env = "POSTMAN_COLLECTIONS_OUTPUT_PATH",
        default_value = "."
    )]
    pub output_dir: PathBuf,

    /// Explicit output file path (overrides --output-dir)
    #[arg(long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// How candidate source files are selected
    #[arg(short = 'm', long = "mode", value_enum, env = "SCAN_MODE", default_value = "interfaces")]
    pub mode: ScanMode,

    /// Default values used when rendering request bodies
    #[arg(long = "body-defaults", value_enum, default_value = "typed")]
    pub body_defaults: DefaultPolicy,

    /// Collection name
    #[arg(
        short = 'n',
        long = "name",
        env = "POSTMAN_COLLECTION_NAME",
        default_value = crate::collection_builder::DEFAULT_COLLECTION_NAME
    )]
    pub collection_name: String,

    /// Prefix method paths with the type-level @RequestMapping path
    #[arg(long = "class-prefix")]
    pub class_prefix: bool,

    /// Postman API key used for publishing
    #[arg(long = "api-key", env = "POSTMAN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// UID of the Postman collection to replace
    #[arg(long = "collection-uid", env = "POSTMAN_COLLECTION_UID")]
    pub collection_uid: Option<String>,

    /// Never publish, even when credentials are configured
    #[arg(long = "no-publish")]
    pub no_publish: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    /// API key and collection UID, when publishing is enabled and fully configured
    pub fn publish_target(&self) -> Option<(&str, &str)> {
        if self.no_publish {
            return None;
        }
        match (self.api_key.as_deref(), self.collection_uid.as_deref()) {
            (Some(key), Some(uid)) => Some((key, uid)),
            (None, None) => None,
            _ => {
                warn!("Publishing skipped: both an API key and a collection UID are required");
                None
            }
        }
    }
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args.java_directory);

    if !args.java_directory.exists() {
        anyhow::bail!(
            "Java directory does not exist: {}",
            args.java_directory.display()
        );
    }

    if !args.java_directory.is_dir() {
        anyhow::bail!(
            "Java directory is not a directory: {}",
            args.java_directory.display()
        );
    }

    info!("Java directory: {}", args.java_directory.display());
    info!("Scan mode: {:?}", args.mode);
    info!("Body defaults: {:?}", args.body_defaults);
    match args.output_path {
        Some(ref output) => info!("Output file: {}", output.display()),
        None => info!("Output directory: {}", args.output_dir.display()),
    }

    Ok(args)
}

/// Run the main workflow and return the path of the written collection
pub fn run(args: CliArgs) -> Result<PathBuf> {
    use crate::body_generator::BodyGenerator;
    use crate::collection_builder::{CollectionBuilder, DEFAULT_COLLECTION_DESCRIPTION};
    use crate::detector::DeclarationDetector;
    use crate::extractor::spring::SpringExtractor;
    use crate::extractor::{ApiGroup, EndpointExtractor};
    use crate::parser::{JavaParser, ParsedFile};
    use crate::publisher::PostmanPublisher;
    use crate::scanner::FileScanner;
    use crate::serializer::{serialize_json, timestamped_output_path, write_to_file};
    use crate::type_resolver::TypeResolver;
    use chrono::Local;

    let started = Local::now();
    info!("Start time: {}", started.format("%Y-%m-%d %H:%M:%S"));

    // Step 1: Scan directory for candidate files
    info!("Scanning {}...", args.java_directory.display());
    let scanner = FileScanner::new(args.java_directory.clone(), args.mode);
    let scan_result = scanner.scan()?;

    info!(
        "Found {} candidate files in {} API directories",
        scan_result.file_count(),
        scan_result.groups.len()
    );
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }

    // Step 2: Index every class for body resolution
    info!("Initializing type resolver...");
    let type_resolver = TypeResolver::from_directory(&args.java_directory)?;

    // Step 3: Parse, classify and extract endpoints per API
    let extractor = SpringExtractor::new().with_class_prefix(args.class_prefix);
    let mut groups: Vec<ApiGroup> = Vec::new();
    let mut parse_failures = 0;

    for source_group in &scan_result.groups {
        info!("Processing API: {}", source_group.name);

        let parsed_files: Vec<ParsedFile> = JavaParser::parse_files(&source_group.files)
            .into_iter()
            .filter_map(|r| match r {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    debug!("Skipping file due to parse error: {}", e);
                    parse_failures += 1;
                    None
                }
            })
            .collect();

        let endpoints = parsed_files
            .iter()
            .filter(|parsed| args.mode.accepts(&DeclarationDetector::detect(parsed)))
            .flat_map(|parsed| extractor.extract_endpoints(parsed))
            .collect::<Vec<_>>();

        debug!("Extracted {} endpoints for {}", endpoints.len(), source_group.name);
        groups.push(ApiGroup::new(source_group.name.clone(), endpoints));
    }

    let endpoint_count: usize = groups.iter().map(|g| g.endpoints.len()).sum();
    if endpoint_count == 0 {
        warn!("No endpoints found under {}", args.java_directory.display());
    }

    // Step 4: Build the collection
    info!("Building Postman collection...");
    let body_gen = BodyGenerator::new(type_resolver, args.body_defaults);
    let mut builder = CollectionBuilder::new()
        .with_info(args.collection_name.clone(), DEFAULT_COLLECTION_DESCRIPTION.to_string());
    for group in &groups {
        builder.add_group(group, &body_gen)?;
    }
    let collection = builder.build();

    // Step 5: Write the collection file
    let content = serialize_json(&collection)?;
    let output_path = match &args.output_path {
        Some(path) => path.clone(),
        None => timestamped_output_path(&args.output_dir, &started),
    };
    write_to_file(&content, &output_path)?;
    info!("Postman collection saved to {}", output_path.display());

    // Step 6: Publish when configured
    let publish_outcome = match args.publish_target() {
        Some((api_key, collection_uid)) => {
            let publisher = PostmanPublisher::new(api_key.to_string());
            Some(publisher.publish_file(&output_path, collection_uid)?)
        }
        None => None,
    };

    // Step 7: Display summary
    let finished = Local::now();
    info!("Generation complete!");
    info!("Summary:");
    info!("  - APIs: {}", groups.len());
    info!("  - Files scanned: {}", scan_result.file_count());
    info!("  - Files skipped (parse errors): {}", parse_failures);
    info!("  - Endpoints found: {}", endpoint_count);
    match &publish_outcome {
        Some(outcome) => info!("  - Publish: {}", outcome),
        None => info!("  - Publish: skipped"),
    }
    info!("End time: {}", finished.format("%Y-%m-%d %H:%M:%S"));
    info!(
        "Elapsed time: {:.3}s",
        (finished - started).num_milliseconds() as f64 / 1000.0
    );

    Ok(output_path)
}
