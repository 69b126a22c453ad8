//! Endpoint extraction from Java controller sources.
//!
//! This module holds the framework-neutral endpoint model and the [`EndpointExtractor`]
//! trait. The Spring implementation lives in [`spring`], and the typed view over
//! annotation syntax it relies on lives in [`annotation`].
//!
//! # Example
//!
//! ```no_run
//! use postman_from_source::extractor::{EndpointExtractor, spring::SpringExtractor};
//! use postman_from_source::parser::JavaParser;
//! use std::path::Path;
//!
//! let parsed = JavaParser::parse_file(Path::new("UserApi.java")).unwrap();
//! let endpoints = SpringExtractor::default().extract_endpoints(&parsed);
//! println!("Found {} endpoints", endpoints.len());
//! ```

pub mod annotation;
pub mod spring;

use crate::parser::{named_children, ParsedFile};
use std::collections::BTreeSet;
use tree_sitter::Node;

/// Trait for extracting endpoints from a parsed Java file.
pub trait EndpointExtractor {
    /// Extracts every endpoint declared in the file, in declaration order.
    fn extract_endpoints(&self, parsed_file: &ParsedFile) -> Vec<Endpoint>;
}

/// A single HTTP endpoint discovered on a controller method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// The HTTP method for this endpoint
    pub method: HttpMethod,
    /// The route path as written in the mapping annotation (e.g. "/users/{id}")
    pub path: String,
    /// Human readable summary, if the method documents one
    pub description: Option<String>,
    /// The name of the handler method
    pub handler_name: String,
    /// Method parameters in declaration order
    pub parameters: Vec<Parameter>,
}

impl Endpoint {
    /// Create a new Endpoint with no description or parameters
    pub fn new(method: HttpMethod, path: String, handler_name: String) -> Self {
        Self {
            method,
            path,
            description: None,
            handler_name,
            parameters: Vec::new(),
        }
    }
}

/// HTTP methods an endpoint can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Parses an upper- or lower-case verb such as "POST"
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A handler method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// The parameter name as declared in Java
    pub name: String,
    /// The declared type's simple name, without generic arguments (e.g. "List" for `List<User>`)
    pub declared_type: String,
    /// Recognized Spring binding annotations on the parameter
    pub annotations: BTreeSet<ParamAnnotation>,
}

impl Parameter {
    /// Create a new Parameter with no binding annotations
    pub fn new(name: String, declared_type: String) -> Self {
        Self {
            name,
            declared_type,
            annotations: BTreeSet::new(),
        }
    }

    pub fn has(&self, annotation: ParamAnnotation) -> bool {
        self.annotations.contains(&annotation)
    }
}

/// Spring annotations that bind a parameter to part of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamAnnotation {
    /// `@PathVariable` - a URL path segment
    PathVariable,
    /// `@RequestParam` - a query string parameter
    RequestParam,
    /// `@RequestHeader` - an HTTP header
    RequestHeader,
    /// `@RequestBody` - the JSON payload
    RequestBody,
}

impl ParamAnnotation {
    /// Maps a simple annotation name to a binding kind
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "PathVariable" => Some(ParamAnnotation::PathVariable),
            "RequestParam" => Some(ParamAnnotation::RequestParam),
            "RequestHeader" => Some(ParamAnnotation::RequestHeader),
            "RequestBody" => Some(ParamAnnotation::RequestBody),
            _ => None,
        }
    }
}

/// Endpoints belonging to one API folder, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiGroup {
    /// Folder name (the API's directory name)
    pub name: String,
    pub endpoints: Vec<Endpoint>,
}

impl ApiGroup {
    pub fn new(name: String, endpoints: Vec<Endpoint>) -> Self {
        Self { name, endpoints }
    }
}

/// A Java type reference as written in a declaration.
///
/// Only the information needed for body generation is kept: the simple name of the
/// outer type, its generic arguments, and whether it is an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Simple type name (e.g. "List", "String", "int")
    pub name: String,
    /// Generic type arguments, in order
    pub arguments: Vec<TypeRef>,
    /// Whether the declaration is an array of `name`
    pub is_array: bool,
}

impl TypeRef {
    /// Create a TypeRef for a plain, non-generic type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            is_array: false,
        }
    }

    /// Builds a TypeRef from a type node of the Java grammar
    pub fn from_node(node: Node<'_>, file: &ParsedFile) -> Self {
        match node.kind() {
            "generic_type" => {
                let children = named_children(node);
                let name = children
                    .iter()
                    .find(|c| c.kind() != "type_arguments")
                    .map(|c| Self::from_node(*c, file).name)
                    .unwrap_or_else(|| file.text(node).to_string());
                let arguments = children
                    .iter()
                    .filter(|c| c.kind() == "type_arguments")
                    .flat_map(|args| named_children(*args))
                    .map(|arg| Self::from_node(arg, file))
                    .collect();
                Self {
                    name,
                    arguments,
                    is_array: false,
                }
            }
            "scoped_type_identifier" => {
                let name = named_children(node)
                    .last()
                    .map(|last| file.text(*last).to_string())
                    .unwrap_or_else(|| file.text(node).to_string());
                Self::new(name)
            }
            "array_type" => {
                let element = node
                    .child_by_field_name("element")
                    .map(|element| Self::from_node(element, file))
                    .unwrap_or_else(|| Self::new("Object"));
                Self {
                    is_array: true,
                    ..element
                }
            }
            "annotated_type" => named_children(node)
                .last()
                .map(|inner| Self::from_node(*inner, file))
                .unwrap_or_else(|| Self::new("Object")),
            "wildcard" => named_children(node)
                .into_iter()
                .filter(|c| !matches!(c.kind(), "annotation" | "marker_annotation"))
                .last()
                .map(|bound| Self::from_node(bound, file))
                .unwrap_or_else(|| Self::new("Object")),
            _ => Self::new(file.text(node).trim()),
        }
    }

    /// Name with simple generic arguments, e.g. `Map<String,Object>`
    pub fn display_name(&self) -> String {
        if self.arguments.is_empty() {
            self.name.clone()
        } else {
            let args: Vec<&str> = self.arguments.iter().map(|a| a.name.as_str()).collect();
            format!("{}<{}>", self.name, args.join(","))
        }
    }
}
