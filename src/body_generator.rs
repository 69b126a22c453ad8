use crate::error::Result;
use crate::type_resolver::{FieldShape, FieldSkeleton, TypeResolver};
use clap::ValueEnum;
use log::debug;
use serde_json::{json, Map, Value};

/// Default value used for `LocalDate` and `Date` fields
const EPOCH_DATE: &str = "1970-01-01";

/// Default value used for `LocalDateTime` fields
const EPOCH_DATE_TIME: &str = "1970-01-01T00:00:00";

/// How leaf fields of a request body are filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DefaultPolicy {
    /// Type-appropriate defaults: "" for text, 0.0 for decimals, 0 for integers, false for
    /// booleans, the epoch for dates, {} for anything else
    #[default]
    Typed,
    /// Flat placeholders: 0 for integers, false for booleans, "" for anything else
    Placeholder,
}

impl DefaultPolicy {
    /// Default JSON value for a leaf of the given declared type
    pub fn default_value(&self, type_name: &str) -> Value {
        match self {
            DefaultPolicy::Typed => match type_name {
                "String" | "char" | "Character" | "UUID" => json!(""),
                "BigDecimal" | "Double" | "Float" | "double" | "float" => json!(0.0),
                "Integer" | "Long" | "Short" | "Byte" | "int" | "long" | "short" | "byte" => {
                    json!(0)
                }
                "Boolean" | "boolean" => json!(false),
                "LocalDate" | "Date" => json!(EPOCH_DATE),
                "LocalDateTime" => json!(EPOCH_DATE_TIME),
                _ => Value::Object(Map::new()),
            },
            DefaultPolicy::Placeholder => match type_name {
                "Integer" | "Long" | "Short" | "Byte" | "int" | "long" | "short" | "byte" => {
                    json!(0)
                }
                "Boolean" | "boolean" => json!(false),
                _ => json!(""),
            },
        }
    }
}

/// Body generator - renders request body examples from Java types
pub struct BodyGenerator {
    /// Type resolver for looking up class declarations
    type_resolver: TypeResolver,
    policy: DefaultPolicy,
}

impl BodyGenerator {
    /// Create a new BodyGenerator with a TypeResolver and default-value policy
    pub fn new(type_resolver: TypeResolver, policy: DefaultPolicy) -> Self {
        debug!("Initializing BodyGenerator with {:?} defaults", policy);
        Self {
            type_resolver,
            policy,
        }
    }

    /// Example body value for a type name
    pub fn generate_body(&self, type_name: &str) -> Value {
        debug!("Generating body for type: {}", type_name);
        let skeleton = self.type_resolver.resolve(type_name);
        self.skeleton_to_value(&skeleton)
    }

    /// Example body for a type name as indented JSON text
    pub fn render_body(&self, type_name: &str) -> Result<String> {
        let body = self.generate_body(type_name);
        Ok(serde_json::to_string_pretty(&body)?)
    }

    /// Converts a skeleton to a JSON object, keeping field order
    pub fn skeleton_to_value(&self, skeleton: &FieldSkeleton) -> Value {
        let object: Map<String, Value> = skeleton
            .fields
            .iter()
            .map(|(name, shape)| (name.clone(), self.shape_to_value(shape)))
            .collect();
        Value::Object(object)
    }

    fn shape_to_value(&self, shape: &FieldShape) -> Value {
        match shape {
            FieldShape::Type(type_name) => self.policy.default_value(type_name),
            FieldShape::Object(skeleton) => self.skeleton_to_value(skeleton),
            FieldShape::Sequence(element) => Value::Array(vec![self.shape_to_value(element)]),
        }
    }
}
