//! Tool Schema Generation
//!
//! Both backends describe tools from the same `ToolSpec` list through
//! [`input_schema`], so they always expose an identical tool surface. Only
//! the outer envelope differs.

use serde_json::{Map, Value, json};

use crate::tool::ToolSpec;

/// JSON Schema object describing a tool's parameters
pub fn input_schema(spec: &ToolSpec) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in &spec.parameters {
        properties.insert(param.name.clone(), json!({ "type": param.param_type.as_str() }));
        if param.required {
            required.push(Value::String(param.name.clone()));
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Tool list in Anthropic Messages format
pub fn anthropic_tools(specs: &[ToolSpec]) -> Vec<Value> {
    specs
        .iter()
        .map(|spec| {
            json!({
                "name": spec.name,
                "description": spec.description,
                "input_schema": input_schema(spec),
            })
        })
        .collect()
}

/// Tool list in OpenAI function-calling format
pub fn openai_tools(specs: &[ToolSpec]) -> Vec<Value> {
    specs
        .iter()
        .map(|spec| {
            json!({
                "type": "function",
                "function": {
                    "name": spec.name,
                    "description": spec.description,
                    "parameters": input_schema(spec),
                },
            })
        })
        .collect()
}
