use crate::extractor::annotation::Annotation;
use crate::parser::{visit_nodes, ParsedFile};
use log::debug;

/// Annotations that mark a type as a Spring MVC controller
const CONTROLLER_ANNOTATIONS: [&str; 2] = ["RestController", "Controller"];

/// Declaration detector for classifying parsed Java files.
///
/// The scanner's selection rules need to know what a file declares before deciding
/// whether to extract endpoints from it: the interface-discovery mode keeps files that
/// declare an interface, the controller-discovery mode keeps files annotated with
/// `@RestController` or `@Controller`.
pub struct DeclarationDetector;

/// What a single file declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Detection {
    /// The file declares at least one interface (nested ones included)
    pub declares_interface: bool,
    /// The file carries a `@RestController` or `@Controller` annotation
    pub is_controller: bool,
}

impl DeclarationDetector {
    /// Detects the relevant declarations in a parsed file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use postman_from_source::detector::DeclarationDetector;
    /// use postman_from_source::parser::JavaParser;
    /// use std::path::Path;
    ///
    /// let parsed = JavaParser::parse_file(Path::new("UserController.java")).unwrap();
    /// let detection = DeclarationDetector::detect(&parsed);
    /// println!("controller: {}", detection.is_controller);
    /// ```
    pub fn detect(parsed_file: &ParsedFile) -> Detection {
        let mut detection = Detection::default();

        visit_nodes(parsed_file.root(), &mut |node| match node.kind() {
            "interface_declaration" => detection.declares_interface = true,
            "annotation" | "marker_annotation" => {
                if let Some(annotation) = Annotation::from_node(node, parsed_file) {
                    if CONTROLLER_ANNOTATIONS.contains(&annotation.name.as_str()) {
                        detection.is_controller = true;
                    }
                }
            }
            _ => {}
        });

        debug!("Detection for {}: {:?}", parsed_file.path.display(), detection);
        detection
    }
}
