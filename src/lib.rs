//! Postman Collection Generator - Postman collections from Spring API sources.
//!
//! This library builds a Postman Collection v2.1.0 by statically analyzing Java sources. It
//! finds methods carrying Spring mapping annotations, reads their parameters and renders an
//! example JSON body for `@RequestBody` types by resolving their fields across the scanned
//! tree.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Walks the root directory and groups candidate files by API
//! 2. [`parser`] - Parses Java files into tree-sitter syntax trees
//! 3. [`detector`] - Classifies files (interface declarations, controller annotations)
//! 4. [`extractor`] - Extracts endpoints from mapping annotations
//! 5. [`type_resolver`] - Resolves class names into field skeletons
//! 6. [`body_generator`] - Renders example request bodies from skeletons
//! 7. [`collection_builder`] - Assembles the Postman collection
//! 8. [`serializer`] - Writes the collection as JSON
//! 9. [`publisher`] - Replaces a remote collection through the Postman API
//!
//! # Example Usage
//!
//! ```no_run
//! use postman_from_source::{
//!     body_generator::{BodyGenerator, DefaultPolicy},
//!     collection_builder::CollectionBuilder,
//!     detector::DeclarationDetector,
//!     extractor::{spring::SpringExtractor, ApiGroup, EndpointExtractor},
//!     parser::JavaParser,
//!     scanner::{FileScanner, ScanMode},
//!     serializer::serialize_json,
//!     type_resolver::TypeResolver,
//! };
//! use std::path::{Path, PathBuf};
//!
//! let mode = ScanMode::Controllers;
//! let scan_result = FileScanner::new(PathBuf::from("./apis"), mode).scan().unwrap();
//!
//! let extractor = SpringExtractor::new();
//! let type_resolver = TypeResolver::from_directory(Path::new("./apis")).unwrap();
//! let body_gen = BodyGenerator::new(type_resolver, DefaultPolicy::Typed);
//!
//! let mut builder = CollectionBuilder::new();
//! for group in &scan_result.groups {
//!     let endpoints = JavaParser::parse_files(&group.files)
//!         .into_iter()
//!         .filter_map(Result::ok)
//!         .filter(|parsed| mode.accepts(&DeclarationDetector::detect(parsed)))
//!         .flat_map(|parsed| extractor.extract_endpoints(&parsed))
//!         .collect();
//!     builder.add_group(&ApiGroup::new(group.name.clone(), endpoints), &body_gen).unwrap();
//! }
//!
//! println!("{}", serialize_json(&builder.build()).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod body_generator;
pub mod cli;
pub mod collection_builder;
pub mod detector;
pub mod error;
pub mod extractor;
pub mod parser;
pub mod publisher;
pub mod scanner;
pub mod serializer;
pub mod type_resolver;
