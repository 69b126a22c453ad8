use crate::error::{Error, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser, Tree};

/// Syntax tree parser for Java source files.
///
/// The `JavaParser` uses `tree-sitter` with the Java grammar to parse source code into a
/// concrete syntax tree, which is then analyzed to extract mapping annotations, interface
/// and controller declarations, and class fields.
///
/// tree-sitter always produces a tree, even for broken input. A tree that contains error
/// or missing nodes is reported as a parse error so callers can skip the file.
///
/// # Example
///
/// ```no_run
/// use postman_from_source::parser::JavaParser;
/// use std::path::Path;
///
/// let parsed = JavaParser::parse_file(Path::new("src/main/java/FooController.java")).unwrap();
/// println!("Root node: {}", parsed.root().kind());
/// ```
pub struct JavaParser;

/// A successfully parsed Java file with its syntax tree.
///
/// Keeps the source text alongside the tree because tree-sitter nodes only carry byte
/// ranges into the original text.
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The original source text
    pub source: String,
    /// The parsed syntax tree
    pub tree: Tree,
}

impl ParsedFile {
    /// Returns the root (`program`) node of the syntax tree
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Returns the source text covered by a node
    pub fn text(&self, node: Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or("")
    }
}

impl JavaParser {
    /// Parses a single Java source file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid Java syntax
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)?;
        let parsed = Self::parse_source(path, content)?;

        debug!("Successfully parsed file: {}", path.display());
        Ok(parsed)
    }

    /// Parses Java source text that was already loaded into memory.
    pub fn parse_source(path: &Path, source: String) -> Result<ParsedFile> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_java::LANGUAGE.into())?;

        let tree = parser.parse(&source, None).ok_or_else(|| Error::ParseError {
            file: path.to_path_buf(),
            message: "parser returned no syntax tree".to_string(),
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let message = first_error_position(root)
                .map(|(row, column)| {
                    format!("syntax error at line {}, column {}", row + 1, column + 1)
                })
                .unwrap_or_else(|| "syntax error".to_string());
            return Err(Error::ParseError {
                file: path.to_path_buf(),
                message,
            });
        }

        Ok(ParsedFile {
            path: path.to_path_buf(),
            source,
            tree,
        })
    }

    /// Parses multiple Java source files, continuing even if some fail.
    ///
    /// Files that fail to parse are logged as warnings; the result keeps one entry per
    /// input path so callers can decide what to do with failures.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedFile>> = paths
            .iter()
            .map(|path| match Self::parse_file(path) {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Error parsing file {}: {}", path.display(), e);
                    Err(e)
                }
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}

/// Named children of a node, skipping comments and other extras
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

/// Finds the first child of the given kind
pub fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Calls `visit` for every node in the subtree, parents before children
pub fn visit_nodes<'t>(node: Node<'t>, visit: &mut impl FnMut(Node<'t>)) {
    visit(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit_nodes(child, visit);
    }
}

fn first_error_position(node: Node<'_>) -> Option<(usize, usize)> {
    if node.is_error() || node.is_missing() {
        let position = node.start_position();
        return Some((position.row, position.column));
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error_position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    /// Helper function to create a temporary file with content
    fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file_path
    }

    #[test]
    fn test_parse_valid_java_file() {
        let temp_dir = TempDir::new().unwrap();
        let valid_code = r#"
            package com.acme.user;

            import java.util.List;

            public class User {
                private Long id;
                private String name;

                public String getName() {
                    return name;
                }
            }
        "#;

        let file_path = create_temp_file(&temp_dir, "User.java", valid_code);
        let parsed = JavaParser::parse_file(&file_path).unwrap();

        assert_eq!(parsed.path, file_path);
        assert_eq!(parsed.root().kind(), "program");
        assert!(named_children(parsed.root())
            .iter()
            .any(|node| node.kind() == "class_declaration"));
    }

    #[test]
    fn test_parse_invalid_java_file() {
        let temp_dir = TempDir::new().unwrap();
        let invalid_code = r#"
            public class Broken {
                public void run( {
                    int x = ;
                }
        "#;

        let file_path = create_temp_file(&temp_dir, "Broken.java", invalid_code);
        let result = JavaParser::parse_file(&file_path);

        match result {
            Err(Error::ParseError { file, message }) => {
                assert_eq!(file, file_path);
                assert!(message.contains("syntax error"));
            }
            _ => panic!("expected a parse error"),
        }
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let result = JavaParser::parse_file(Path::new("/nonexistent/Missing.java"));

        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[test]
    fn test_parse_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_temp_file(&temp_dir, "Empty.java", "");
        let parsed = JavaParser::parse_file(&file_path).unwrap();

        assert!(named_children(parsed.root()).is_empty());
    }

    #[test]
    fn test_parse_files_batch() {
        let temp_dir = TempDir::new().unwrap();

        let file1 = create_temp_file(&temp_dir, "A.java", "public class A {}");
        let file2 = create_temp_file(&temp_dir, "B.java", "public interface B {}");
        let file3 = create_temp_file(&temp_dir, "C.java", "public class C {");

        let results = JavaParser::parse_files(&[file1.clone(), file2.clone(), file3]);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(results[2].is_err());
        assert_eq!(results[0].as_ref().unwrap().path, file1);
        assert_eq!(results[1].as_ref().unwrap().path, file2);
    }

    #[test]
    fn test_parse_files_empty_list() {
        let results = JavaParser::parse_files(&[]);
        assert!(results.is_empty());
    }

    #[test]
    fn test_text_and_named_children_skip_comments() {
        let source = r#"
            // leading comment
            public class Commented {
                /* field comment */
                private int count;
            }
        "#;
        let parsed =
            JavaParser::parse_source(Path::new("Commented.java"), source.to_string()).unwrap();

        let top_level = named_children(parsed.root());
        assert_eq!(top_level.len(), 1);

        let class = top_level[0];
        let name = class.child_by_field_name("name").unwrap();
        assert_eq!(parsed.text(name), "Commented");

        let body = class.child_by_field_name("body").unwrap();
        let members = named_children(body);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].kind(), "field_declaration");
    }

    #[test]
    fn test_visit_nodes_reaches_nested_declarations() {
        let source = r#"
            public class Outer {
                public static class Inner {
                    private String value;
                }
            }
        "#;
        let parsed = JavaParser::parse_source(Path::new("Outer.java"), source.to_string()).unwrap();

        let mut class_names = Vec::new();
        visit_nodes(parsed.root(), &mut |node| {
            if node.kind() == "class_declaration" {
                if let Some(name) = node.child_by_field_name("name") {
                    class_names.push(parsed.text(name).to_string());
                }
            }
        });

        assert_eq!(class_names, vec!["Outer", "Inner"]);
    }
}
