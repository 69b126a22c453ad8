//! Typed view over Java annotation syntax.
//!
//! Annotation arguments come in a handful of shapes (`@GetMapping("/x")`,
//! `@RequestMapping(value = {"/a", "/b"}, method = RequestMethod.POST)`, ...). They are
//! normalized here into a closed set of [`ElementValue`] variants so extractors can
//! pattern-match instead of poking at raw syntax nodes.

use crate::parser::{child_of_kind, named_children, ParsedFile};
use tree_sitter::Node;

/// The implicit element name used by `@Annotation(value)` shorthand
pub const VALUE_ELEMENT: &str = "value";

/// A single annotation with its elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// The simple annotation name (`GetMapping` for `@org.springframework...GetMapping`)
    pub name: String,
    /// Element name/value pairs in source order
    pub elements: Vec<(String, ElementValue)>,
}

/// The value of an annotation element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementValue {
    /// A literal; string literals are stored without their quotes
    Literal(String),
    /// A symbolic reference; only the member name is kept (`RequestMethod.POST` -> `POST`)
    Reference(String),
    /// An array initializer (`{"/a", "/b"}`)
    Array(Vec<ElementValue>),
    /// Anything else (concatenations, nested annotations, ...), as raw source text
    Other(String),
}

impl ElementValue {
    /// Builds an element value from an element value node
    pub fn from_node(node: Node<'_>, file: &ParsedFile) -> Self {
        let text = file.text(node);
        match node.kind() {
            "string_literal" => ElementValue::Literal(text.trim_matches('"').to_string()),
            "character_literal" => ElementValue::Literal(text.trim_matches('\'').to_string()),
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal"
            | "decimal_floating_point_literal"
            | "hex_floating_point_literal"
            | "true"
            | "false"
            | "null_literal" => ElementValue::Literal(text.to_string()),
            "identifier" => ElementValue::Reference(text.to_string()),
            "field_access" => {
                let member = node
                    .child_by_field_name("field")
                    .map(|field| file.text(field))
                    .unwrap_or(text);
                ElementValue::Reference(member.to_string())
            }
            "element_value_array_initializer" => ElementValue::Array(
                named_children(node)
                    .into_iter()
                    .map(|child| Self::from_node(child, file))
                    .collect(),
            ),
            "parenthesized_expression" => named_children(node)
                .first()
                .map(|inner| Self::from_node(*inner, file))
                .unwrap_or_else(|| ElementValue::Other(text.to_string())),
            _ => ElementValue::Other(text.to_string()),
        }
    }

    /// Returns the scalar text of the value.
    ///
    /// Literals and references yield their text; arrays yield their first scalar
    /// element; anything else yields `None`.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ElementValue::Literal(value) | ElementValue::Reference(value) => Some(value),
            ElementValue::Array(values) => values.iter().find_map(ElementValue::as_scalar),
            ElementValue::Other(_) => None,
        }
    }
}

impl Annotation {
    /// Builds an annotation from an `annotation` or `marker_annotation` node
    pub fn from_node(node: Node<'_>, file: &ParsedFile) -> Option<Self> {
        if !matches!(node.kind(), "annotation" | "marker_annotation") {
            return None;
        }

        let qualified = file.text(node.child_by_field_name("name")?);
        let name = qualified.rsplit('.').next().unwrap_or(qualified).trim().to_string();

        let mut elements = Vec::new();
        if let Some(arguments) = node.child_by_field_name("arguments") {
            for argument in named_children(arguments) {
                if argument.kind() == "element_value_pair" {
                    let key = argument.child_by_field_name("key").map(|k| file.text(k).to_string());
                    let value = argument.child_by_field_name("value");
                    if let (Some(key), Some(value)) = (key, value) {
                        elements.push((key, ElementValue::from_node(value, file)));
                    }
                } else {
                    let value = ElementValue::from_node(argument, file);
                    elements.push((VALUE_ELEMENT.to_string(), value));
                }
            }
        }

        Some(Self { name, elements })
    }

    /// Looks up an element by name
    pub fn element(&self, key: &str) -> Option<&ElementValue> {
        self.elements
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Scalar text of the first of `keys` that is present and scalar
    pub fn scalar(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.element(key))
            .find_map(ElementValue::as_scalar)
    }
}

/// Annotations attached to a declaration through its `modifiers` node
pub fn annotations_of(declaration: Node<'_>, file: &ParsedFile) -> Vec<Annotation> {
    child_of_kind(declaration, "modifiers")
        .map(|modifiers| {
            named_children(modifiers)
                .into_iter()
                .filter_map(|node| Annotation::from_node(node, file))
                .collect()
        })
        .unwrap_or_default()
}
