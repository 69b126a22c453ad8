use crate::extractor::annotation::{annotations_of, Annotation};
use crate::extractor::{
    Endpoint, EndpointExtractor, HttpMethod, ParamAnnotation, Parameter, TypeRef,
};
use crate::parser::{child_of_kind, named_children, ParsedFile};
use log::{debug, info};
use tree_sitter::Node;

/// Mapping annotations that mark a handler method
const MAPPING_ANNOTATIONS: [&str; 5] = [
    "GetMapping",
    "PostMapping",
    "PutMapping",
    "DeleteMapping",
    "RequestMapping",
];

/// Elements holding the route path, in lookup order (`path` is Spring's alias of `value`)
const PATH_ELEMENTS: [&str; 2] = ["value", "path"];

/// Spring MVC endpoint extractor.
///
/// Walks every class and interface declaration in a file (nested ones included) and
/// turns methods carrying a mapping annotation into [`Endpoint`]s.
#[derive(Debug, Clone, Default)]
pub struct SpringExtractor {
    /// Join a type-level `@RequestMapping` path in front of each method path
    include_class_prefix: bool,
}

impl EndpointExtractor for SpringExtractor {
    fn extract_endpoints(&self, parsed_file: &ParsedFile) -> Vec<Endpoint> {
        debug!("Extracting endpoints from file: {}", parsed_file.path.display());

        let mut endpoints = Vec::new();
        self.visit(parsed_file.root(), "", parsed_file, &mut endpoints);

        for endpoint in &endpoints {
            info!("Endpoint found: {} {}", endpoint.method, endpoint.path);
        }
        endpoints
    }
}

impl SpringExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable joining type-level `@RequestMapping` paths
    pub fn with_class_prefix(mut self, include_class_prefix: bool) -> Self {
        self.include_class_prefix = include_class_prefix;
        self
    }

    fn visit(
        &self,
        node: Node<'_>,
        prefix: &str,
        file: &ParsedFile,
        endpoints: &mut Vec<Endpoint>,
    ) {
        for child in named_children(node) {
            match child.kind() {
                "class_declaration"
                | "interface_declaration"
                | "enum_declaration"
                | "record_declaration" => {
                    let type_prefix = if self.include_class_prefix {
                        let own = annotations_of(child, file)
                            .iter()
                            .filter(|a| a.name == "RequestMapping")
                            .find_map(|a| a.scalar(&PATH_ELEMENTS).map(str::to_string))
                            .unwrap_or_default();
                        combine_paths(prefix, &own)
                    } else {
                        String::new()
                    };
                    if let Some(body) = child.child_by_field_name("body") {
                        self.visit(body, &type_prefix, file, endpoints);
                    }
                }
                "method_declaration" => {
                    if let Some(endpoint) = self.parse_method(child, prefix, file) {
                        endpoints.push(endpoint);
                    }
                }
                _ => self.visit(child, prefix, file, endpoints),
            }
        }
    }

    /// Builds an endpoint from a method declaration, if it is a mapped handler
    fn parse_method(&self, method: Node<'_>, prefix: &str, file: &ParsedFile) -> Option<Endpoint> {
        let handler_name = method
            .child_by_field_name("name")
            .map(|name| file.text(name).to_string())
            .unwrap_or_default();
        let annotations = annotations_of(method, file);

        let mut implied_verb = String::new();
        let mut explicit_verb: Option<String> = None;
        let mut path = String::new();
        let mut mapped = false;

        let mappings = annotations
            .iter()
            .filter(|a| MAPPING_ANNOTATIONS.contains(&a.name.as_str()));
        for annotation in mappings {
            mapped = true;
            implied_verb = match annotation.name.trim_end_matches("Mapping") {
                "Request" => "GET".to_string(),
                verb => verb.to_uppercase(),
            };
            if let Some(verb) = annotation.scalar(&["method"]) {
                explicit_verb = Some(verb.to_uppercase());
            }
            if let Some(value) = annotation.scalar(&PATH_ELEMENTS) {
                path = value.to_string();
            }
        }

        if !mapped {
            return None;
        }

        let verb = explicit_verb.unwrap_or(implied_verb);
        let path = if self.include_class_prefix {
            combine_paths(prefix, &path)
        } else {
            path
        };

        let Some(method_kind) = HttpMethod::from_verb(&verb) else {
            debug!("Skipping {}: unsupported HTTP method '{}'", handler_name, verb);
            return None;
        };
        if path.is_empty() {
            debug!("Skipping {}: no route path", handler_name);
            return None;
        }

        let mut endpoint = Endpoint::new(method_kind, path, handler_name);
        endpoint.description = Self::description(&annotations);
        endpoint.parameters = Self::parse_parameters(method, file);
        Some(endpoint)
    }

    /// Summary from OpenAPI `@Operation(summary)` or Swagger `@ApiOperation(value)`
    fn description(annotations: &[Annotation]) -> Option<String> {
        annotations.iter().find_map(|a| {
            let summary = match a.name.as_str() {
                "Operation" => a.scalar(&["summary"]),
                "ApiOperation" => a.scalar(&["value"]),
                _ => None,
            }?;
            let summary = summary.trim();
            (!summary.is_empty()).then(|| summary.to_string())
        })
    }

    fn parse_parameters(method: Node<'_>, file: &ParsedFile) -> Vec<Parameter> {
        let Some(formal_parameters) = method.child_by_field_name("parameters") else {
            return Vec::new();
        };

        named_children(formal_parameters)
            .into_iter()
            .filter_map(|param| match param.kind() {
                "formal_parameter" => {
                    let name = param.child_by_field_name("name")?;
                    let ty = param.child_by_field_name("type")?;
                    Some(Self::build_parameter(param, file.text(name), ty, file))
                }
                "spread_parameter" => {
                    let declarator = child_of_kind(param, "variable_declarator")?;
                    let name = declarator.child_by_field_name("name")?;
                    let ty = named_children(param)
                        .into_iter()
                        .find(|c| !matches!(c.kind(), "modifiers" | "variable_declarator"))?;
                    Some(Self::build_parameter(param, file.text(name), ty, file))
                }
                _ => None,
            })
            .collect()
    }

    fn build_parameter(param: Node<'_>, name: &str, ty: Node<'_>, file: &ParsedFile) -> Parameter {
        let type_ref = TypeRef::from_node(ty, file);
        let mut parameter = Parameter::new(name.to_string(), type_ref.name);
        parameter.annotations = annotations_of(param, file)
            .iter()
            .filter_map(|a| ParamAnnotation::from_name(&a.name))
            .collect();
        parameter
    }
}

/// Combine a type-level prefix and a method path, handling slashes correctly
fn combine_paths(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        return path.to_string();
    }
    if path.is_empty() {
        return prefix.to_string();
    }

    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", prefix, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::JavaParser;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn extract(source: &str) -> Vec<Endpoint> {
        let parsed = JavaParser::parse_source(Path::new("Api.java"), source.to_string()).unwrap();
        SpringExtractor::new().extract_endpoints(&parsed)
    }

    #[test]
    fn test_no_mapping_annotations_yield_no_endpoints() {
        let endpoints = extract(
            r#"
            public class UserService {
                @Transactional
                public User find(Long id) { return null; }

                public void delete(Long id) {}
            }
            "#,
        );

        assert!(endpoints.is_empty());
    }

    #[test]
    fn test_post_mapping_with_value_element() {
        let endpoints = extract(
            r#"
            public interface Api {
                @PostMapping(value = "/x")
                void create();
            }
            "#,
        );

        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].method, HttpMethod::Post);
        assert_eq!(endpoints[0].path, "/x");
        assert_eq!(endpoints[0].handler_name, "create");
    }

    #[test]
    fn test_request_mapping_defaults_to_get() {
        let endpoints = extract(
            r#"
            public interface Api {
                @RequestMapping("/health")
                String health();
            }
            "#,
        );

        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].method, HttpMethod::Get);
        assert_eq!(endpoints[0].path, "/health");
    }

    #[test]
    fn test_request_mapping_explicit_method_wins() {
        let endpoints = extract(
            r#"
            public interface Api {
                @RequestMapping(value = "/orders", method = RequestMethod.POST)
                void create();

                @RequestMapping(value = "/orders/{id}", method = "delete")
                void delete();

                @RequestMapping(path = "/orders/{id}", method = {RequestMethod.PATCH, RequestMethod.PUT})
                void update();
            }
            "#,
        );

        let methods: Vec<HttpMethod> = endpoints.iter().map(|e| e.method).collect();
        assert_eq!(methods, vec![HttpMethod::Post, HttpMethod::Delete, HttpMethod::Patch]);
        assert_eq!(endpoints[2].path, "/orders/{id}");
    }

    #[test]
    fn test_array_path_uses_first_element() {
        let endpoints = extract(
            r#"
            public interface Api {
                @GetMapping({"/v1/items", "/v2/items"})
                List<Item> list();
            }
            "#,
        );

        assert_eq!(endpoints[0].path, "/v1/items");
    }

    #[test]
    fn test_symbolic_path_uses_member_name() {
        let endpoints = extract(
            r#"
            public interface Api {
                @PutMapping(value = Routes.ITEMS)
                void replace();
            }
            "#,
        );

        assert_eq!(endpoints[0].method, HttpMethod::Put);
        assert_eq!(endpoints[0].path, "ITEMS");
    }

    #[test]
    fn test_methods_without_path_or_with_unsupported_verb_are_dropped() {
        let endpoints = extract(
            r#"
            public interface Api {
                @GetMapping
                List<Item> list();

                @RequestMapping(value = "/items", method = RequestMethod.HEAD)
                void head();

                @DeleteMapping("/items/{id}")
                void delete(@PathVariable Long id);
            }
            "#,
        );

        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].method, HttpMethod::Delete);
    }

    #[test]
    fn test_parameters_and_annotation_kinds() {
        let endpoints = extract(
            r#"
            public interface Api {
                @PutMapping("/users/{id}")
                User update(
                    @PathVariable("id") Long id,
                    @RequestParam(required = false) String reason,
                    @RequestHeader("X-Tenant") String tenant,
                    @Valid @RequestBody UserRequest body,
                    Principal principal);
            }
            "#,
        );

        let params = &endpoints[0].parameters;
        assert_eq!(params.len(), 5);

        assert_eq!(params[0].name, "id");
        assert_eq!(params[0].declared_type, "Long");
        assert!(params[0].has(ParamAnnotation::PathVariable));

        assert!(params[1].has(ParamAnnotation::RequestParam));
        assert!(params[2].has(ParamAnnotation::RequestHeader));

        assert_eq!(params[3].declared_type, "UserRequest");
        assert_eq!(params[3].annotations.len(), 1);
        assert!(params[3].has(ParamAnnotation::RequestBody));

        assert_eq!(params[4].name, "principal");
        assert!(params[4].annotations.is_empty());
    }

    #[test]
    fn test_generic_parameter_type_keeps_outer_name() {
        let endpoints = extract(
            r#"
            public interface Api {
                @PostMapping("/batch")
                void batch(@RequestBody List<UserRequest> users);
            }
            "#,
        );

        assert_eq!(endpoints[0].parameters[0].declared_type, "List");
    }

    #[test]
    fn test_description_from_operation_annotations() {
        let endpoints = extract(
            r#"
            public interface Api {
                @Operation(summary = "Find a user")
                @GetMapping("/users/{id}")
                User find(@PathVariable Long id);

                @ApiOperation("List users")
                @GetMapping("/users")
                List<User> list();

                @GetMapping("/users/count")
                long count();
            }
            "#,
        );

        assert_eq!(endpoints[0].description.as_deref(), Some("Find a user"));
        assert_eq!(endpoints[1].description.as_deref(), Some("List users"));
        assert_eq!(endpoints[2].description, None);
    }

    #[test]
    fn test_nested_types_are_visited_in_order() {
        let endpoints = extract(
            r#"
            public class Outer {
                @GetMapping("/outer")
                public String outer() { return ""; }

                public interface InnerApi {
                    @PostMapping("/inner")
                    void inner();
                }
            }
            "#,
        );

        let paths: Vec<&str> = endpoints.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/outer", "/inner"]);
    }

    #[test]
    fn test_class_prefix_is_opt_in() {
        let source = r#"
            @RestController
            @RequestMapping("/api/users/")
            public class UserController {
                @GetMapping("/{id}")
                public User get(@PathVariable Long id) { return null; }

                @PostMapping
                public User create(@RequestBody UserRequest request) { return null; }
            }
        "#;
        let parsed =
            JavaParser::parse_source(Path::new("UserController.java"), source.to_string())
                .unwrap();

        let plain = SpringExtractor::new().extract_endpoints(&parsed);
        let paths: Vec<&str> = plain.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/{id}"]);

        let prefixed = SpringExtractor::new()
            .with_class_prefix(true)
            .extract_endpoints(&parsed);
        let paths: Vec<&str> = prefixed.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/api/users/{id}", "/api/users/"]);
    }

    #[test]
    fn test_combine_paths() {
        assert_eq!(combine_paths("", "/users"), "/users");
        assert_eq!(combine_paths("/api", ""), "/api");
        assert_eq!(combine_paths("/api/", "/users"), "/api/users");
        assert_eq!(combine_paths("/api", "users"), "/api/users");
    }
}
