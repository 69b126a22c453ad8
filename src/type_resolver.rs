use crate::extractor::TypeRef;
use crate::parser::{child_of_kind, named_children, visit_nodes, JavaParser, ParsedFile};
use crate::scanner::{FileScanner, ScanMode};
use anyhow::Result;
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Types that are never expanded into fields
const BASIC_TYPES: [&str; 23] = [
    "String",
    "Integer",
    "Long",
    "Boolean",
    "BigDecimal",
    "Double",
    "Float",
    "LocalDate",
    "Date",
    "Short",
    "Byte",
    "Character",
    "LocalDateTime",
    "UUID",
    "Object",
    "int",
    "long",
    "short",
    "byte",
    "char",
    "boolean",
    "double",
    "float",
];

/// Container types rendered as a one-element sequence of their element type
const SEQUENCE_TYPES: [&str; 3] = ["List", "Set", "Collection"];

/// Container types rendered without looking at their value types
const MAP_TYPES: [&str; 2] = ["Map", "HashMap"];

/// Type resolver - resolves Java class declarations into field skeletons.
///
/// The resolver indexes every class and record declaration (nested ones included) once,
/// keyed by simple name. Record components come first, followed by instance fields
/// declared in the record body. When two classes share a name the first one indexed wins.
pub struct TypeResolver {
    classes: HashMap<String, ClassDef>,
}

/// A class declaration reduced to its instance fields
#[derive(Debug, Clone)]
struct ClassDef {
    fields: Vec<FieldDef>,
}

#[derive(Debug, Clone)]
struct FieldDef {
    name: String,
    type_ref: TypeRef,
}

/// Ordered mapping from field name to its shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSkeleton {
    pub fields: Vec<(String, FieldShape)>,
}

impl FieldSkeleton {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field's shape by name
    pub fn get(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, shape)| shape)
    }
}

/// Shape of a single field in a skeleton.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldShape {
    /// A leaf rendered from its declared type name (e.g. "String", "Map<String,Object>")
    Type(String),
    /// A nested object
    Object(FieldSkeleton),
    /// A list, set or array holding one example element
    Sequence(Box<FieldShape>),
}

impl TypeResolver {
    /// Create a new TypeResolver indexing the classes of the given files
    pub fn new(parsed_files: &[ParsedFile]) -> Self {
        let mut classes = HashMap::new();

        for parsed_file in parsed_files {
            visit_nodes(parsed_file.root(), &mut |node| {
                if !matches!(node.kind(), "class_declaration" | "record_declaration") {
                    return;
                }
                let Some(name) = node.child_by_field_name("name") else {
                    return;
                };
                let name = parsed_file.text(name).to_string();
                if classes.contains_key(&name) {
                    debug!("Ignoring duplicate class {} in {}", name, parsed_file.path.display());
                    return;
                }
                let mut fields = Self::parse_record_components(node, parsed_file);
                fields.extend(Self::parse_fields(node, parsed_file));
                classes.insert(name, ClassDef { fields });
            });
        }

        debug!("Initialized TypeResolver with {} classes", classes.len());
        Self { classes }
    }

    /// Create a TypeResolver from every `.java` file under a directory.
    ///
    /// Files that fail to parse are logged and skipped.
    pub fn from_directory(root: &Path) -> Result<Self> {
        let files = FileScanner::new(root.to_path_buf(), ScanMode::default()).java_files()?;
        info!("Indexing types from {} Java files", files.len());

        let parsed_files: Vec<ParsedFile> = JavaParser::parse_files(&files)
            .into_iter()
            .filter_map(|r| r.ok())
            .collect();

        Ok(Self::new(&parsed_files))
    }

    /// Whether a class with this simple name was indexed
    pub fn contains(&self, class_name: &str) -> bool {
        self.classes.contains_key(class_name)
    }

    /// Resolves a type name into a skeleton of its fields.
    ///
    /// Basic types and unknown types resolve to an empty skeleton.
    pub fn resolve(&self, type_name: &str) -> FieldSkeleton {
        let mut resolving = HashSet::new();
        self.resolve_with(type_name, &mut resolving)
    }

    /// Resolve with the set of types on the current resolution chain
    fn resolve_with(&self, type_name: &str, resolving: &mut HashSet<String>) -> FieldSkeleton {
        if resolving.contains(type_name) {
            debug!("Circular reference detected for type: {}", type_name);
            return FieldSkeleton::default();
        }
        if Self::is_basic_type(type_name) {
            return FieldSkeleton::default();
        }
        let Some(class) = self.classes.get(type_name) else {
            debug!("Could not resolve type: {}", type_name);
            return FieldSkeleton::default();
        };

        debug!("Searching for fields in class: {}", type_name);
        resolving.insert(type_name.to_string());

        let fields = class
            .fields
            .iter()
            .map(|field| (field.name.clone(), self.resolve_field(&field.type_ref, resolving)))
            .collect();

        resolving.remove(type_name);
        FieldSkeleton { fields }
    }

    fn resolve_field(&self, type_ref: &TypeRef, resolving: &mut HashSet<String>) -> FieldShape {
        if type_ref.is_array {
            let element = TypeRef {
                is_array: false,
                ..type_ref.clone()
            };
            return FieldShape::Sequence(Box::new(self.resolve_field(&element, resolving)));
        }

        let name = type_ref.name.as_str();
        if SEQUENCE_TYPES.contains(&name) {
            if let Some(element) = type_ref.arguments.first() {
                return FieldShape::Sequence(Box::new(self.resolve_field(element, resolving)));
            }
        } else if MAP_TYPES.contains(&name) {
            return FieldShape::Type(type_ref.display_name());
        }

        let nested = self.resolve_with(name, resolving);
        if nested.is_empty() {
            FieldShape::Type(type_ref.display_name())
        } else {
            FieldShape::Object(nested)
        }
    }

    /// Instance fields declared directly in a class body
    fn parse_fields(class: tree_sitter::Node<'_>, file: &ParsedFile) -> Vec<FieldDef> {
        let Some(body) = class.child_by_field_name("body") else {
            return Vec::new();
        };

        let mut fields = Vec::new();
        for member in named_children(body) {
            if member.kind() != "field_declaration" || Self::is_static(member, file) {
                continue;
            }
            let Some(ty) = member.child_by_field_name("type") else {
                continue;
            };
            let type_ref = TypeRef::from_node(ty, file);

            let mut cursor = member.walk();
            for declarator in member.children_by_field_name("declarator", &mut cursor) {
                let Some(name) = declarator.child_by_field_name("name") else {
                    continue;
                };
                // `String[] names` and `String names[]` are both arrays
                let is_array =
                    type_ref.is_array || declarator.child_by_field_name("dimensions").is_some();
                fields.push(FieldDef {
                    name: file.text(name).to_string(),
                    type_ref: TypeRef {
                        is_array,
                        ..type_ref.clone()
                    },
                });
            }
        }
        fields
    }

    /// Components of a record header, in declaration order
    fn parse_record_components(record: tree_sitter::Node<'_>, file: &ParsedFile) -> Vec<FieldDef> {
        let Some(parameters) = record.child_by_field_name("parameters") else {
            return Vec::new();
        };

        named_children(parameters)
            .into_iter()
            .filter(|component| component.kind() == "formal_parameter")
            .filter_map(|component| {
                let name = component.child_by_field_name("name")?;
                let ty = component.child_by_field_name("type")?;
                let type_ref = TypeRef::from_node(ty, file);
                let is_array =
                    type_ref.is_array || component.child_by_field_name("dimensions").is_some();
                Some(FieldDef {
                    name: file.text(name).to_string(),
                    type_ref: TypeRef { is_array, ..type_ref },
                })
            })
            .collect()
    }

    fn is_static(field: tree_sitter::Node<'_>, file: &ParsedFile) -> bool {
        child_of_kind(field, "modifiers")
            .map(|modifiers| {
                let mut cursor = modifiers.walk();
                let is_static = modifiers
                    .children(&mut cursor)
                    .any(|m| file.text(m) == "static");
                is_static
            })
            .unwrap_or(false)
    }

    pub fn is_basic_type(type_name: &str) -> bool {
        BASIC_TYPES.contains(&type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn resolver(sources: &[&str]) -> TypeResolver {
        let parsed: Vec<ParsedFile> = sources
            .iter()
            .enumerate()
            .map(|(i, source)| {
                let path = format!("Type{}.java", i);
                JavaParser::parse_source(Path::new(&path), source.to_string()).unwrap()
            })
            .collect();
        TypeResolver::new(&parsed)
    }

    fn leaf(name: &str) -> FieldShape {
        FieldShape::Type(name.to_string())
    }

    #[test]
    fn test_resolve_flat_class() {
        let resolver = resolver(&[r#"
            public class UserRequest {
                private static final long serialVersionUID = 1L;
                private String name;
                private Integer age;
                private boolean active;
            }
        "#]);

        let skeleton = resolver.resolve("UserRequest");
        assert_eq!(
            skeleton.fields,
            vec![
                ("name".to_string(), leaf("String")),
                ("age".to_string(), leaf("Integer")),
                ("active".to_string(), leaf("boolean")),
            ]
        );
    }

    #[test]
    fn test_resolve_nested_and_sequence_fields() {
        let resolver = resolver(&[
            r#"
            public class Order {
                private Customer customer;
                private List<Item> items;
                private Set<String> tags;
                private Map<String, Object> metadata;
            }
            "#,
            r#"
            public class Customer { private String email; }
            class Item { private Long sku; private BigDecimal price; }
            "#,
        ]);

        let skeleton = resolver.resolve("Order");

        assert_eq!(
            skeleton.get("customer"),
            Some(&FieldShape::Object(FieldSkeleton {
                fields: vec![("email".to_string(), leaf("String"))],
            }))
        );
        assert_eq!(
            skeleton.get("items"),
            Some(&FieldShape::Sequence(Box::new(FieldShape::Object(FieldSkeleton {
                fields: vec![
                    ("sku".to_string(), leaf("Long")),
                    ("price".to_string(), leaf("BigDecimal")),
                ],
            }))))
        );
        assert_eq!(
            skeleton.get("tags"),
            Some(&FieldShape::Sequence(Box::new(leaf("String"))))
        );
        assert_eq!(skeleton.get("metadata"), Some(&leaf("Map<String,Object>")));
    }

    #[test]
    fn test_self_referential_type_terminates() {
        let resolver = resolver(&[r#"
            public class Category {
                private String name;
                private Category parent;
                private List<Category> children;
            }
        "#]);

        let skeleton = resolver.resolve("Category");

        assert_eq!(skeleton.get("parent"), Some(&leaf("Category")));
        assert_eq!(
            skeleton.get("children"),
            Some(&FieldShape::Sequence(Box::new(leaf("Category"))))
        );
    }

    #[test]
    fn test_mutually_referential_types_terminate() {
        let resolver = resolver(&[r#"
            class Author { private String name; private Book latest; }
            class Book { private String title; private Author author; }
        "#]);

        let skeleton = resolver.resolve("Author");
        let Some(FieldShape::Object(book)) = skeleton.get("latest") else {
            panic!("expected nested book");
        };
        assert_eq!(book.get("author"), Some(&leaf("Author")));
    }

    #[test]
    fn test_sibling_fields_of_same_type_both_expand() {
        let resolver = resolver(&[r#"
            class Shipment { private Address from; private Address to; }
            class Address { private String city; }
        "#]);

        let skeleton = resolver.resolve("Shipment");
        assert!(matches!(skeleton.get("from"), Some(FieldShape::Object(_))));
        assert!(matches!(skeleton.get("to"), Some(FieldShape::Object(_))));
    }

    #[test]
    fn test_basic_and_unknown_types_resolve_empty() {
        let resolver = resolver(&["class String { private char[] value; }"]);

        assert!(resolver.resolve("String").is_empty());
        assert!(resolver.resolve("LocalDate").is_empty());
        assert!(resolver.resolve("DoesNotExist").is_empty());
    }

    #[test]
    fn test_first_class_declaration_wins() {
        let resolver = resolver(&[
            "class Dto { private String first; }",
            "class Dto { private String second; }",
        ]);

        let skeleton = resolver.resolve("Dto");
        assert_eq!(skeleton.fields, vec![("first".to_string(), leaf("String"))]);
    }

    #[test]
    fn test_arrays_and_multiple_declarators() {
        let resolver = resolver(&[r#"
            class Matrix {
                private int rows, columns;
                private Cell[] cells;
                private String labels[];
            }
            class Cell { private double value; }
        "#]);

        let skeleton = resolver.resolve("Matrix");
        assert_eq!(skeleton.get("rows"), Some(&leaf("int")));
        assert_eq!(skeleton.get("columns"), Some(&leaf("int")));
        assert_eq!(
            skeleton.get("cells"),
            Some(&FieldShape::Sequence(Box::new(FieldShape::Object(FieldSkeleton {
                fields: vec![("value".to_string(), leaf("double"))],
            }))))
        );
        assert_eq!(
            skeleton.get("labels"),
            Some(&FieldShape::Sequence(Box::new(leaf("String"))))
        );
    }

    #[test]
    fn test_record_components_are_fields() {
        let resolver = resolver(&[
            r#"
            public record CreateUser(String name, int age, List<Address> addresses) {
                private static final int MAX_AGE = 150;
            }
            "#,
            r#"
            public class Address { private String city; }
            "#,
        ]);

        let skeleton = resolver.resolve("CreateUser");
        assert_eq!(
            skeleton.fields,
            vec![
                ("name".to_string(), leaf("String")),
                ("age".to_string(), leaf("int")),
                (
                    "addresses".to_string(),
                    FieldShape::Sequence(Box::new(FieldShape::Object(FieldSkeleton {
                        fields: vec![("city".to_string(), leaf("String"))],
                    }))),
                ),
            ]
        );
    }

    #[test]
    fn test_nested_class_is_indexed() {
        let resolver = resolver(&[r#"
            public class Outer {
                public static class Inner { private String value; }
            }
        "#]);

        assert!(resolver.contains("Outer"));
        assert!(resolver.contains("Inner"));
        assert_eq!(resolver.resolve("Inner").fields.len(), 1);
    }

    #[test]
    fn test_from_directory_skips_broken_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("api/dto")).unwrap();
        fs::write(root.join("api/dto/Good.java"), "class Good { private String v; }").unwrap();
        fs::write(root.join("api/dto/Broken.java"), "class Broken { private String").unwrap();

        let resolver = TypeResolver::from_directory(root).unwrap();

        assert!(resolver.contains("Good"));
        assert!(!resolver.contains("Broken"));
    }
}
