//! Name-keyed tool registry

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{Result, WayfarerError};
use crate::tools::definition::{Tool, ToolDefinition};
use crate::tools::travel::{CityFactsTool, PlanCityVisitTool, TimeTool, WeatherTool};

/// Registry of executable tools, keyed by the name models use to call them
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All four travel tools registered under their model-facing names
    pub fn travel_tools() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(WeatherTool));
        registry.register(Box::new(TimeTool));
        registry.register(Box::new(CityFactsTool));
        registry.register(Box::new(PlanCityVisitTool));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.definition().name, tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(Box::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Execute a tool by name
    pub fn execute(&self, name: &str, input: &Value) -> Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| WayfarerError::ToolNotFound(name.to_string()))?;
        tool.execute(input)
    }

    /// Registered names, sorted for stable listings
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.names()
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.definition())
            .collect()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry").field("tools", &self.names()).finish()
    }
}

/// Turn the raw argument text of a detected tool call into a tool input
/// record: `"city=Paris, days=3"` becomes `{"city": "Paris", "days": "3"}`.
/// A bare value with no `=` lands under the `input` key.
pub fn parse_parameters(args: &str) -> Value {
    let mut object = Map::new();
    for part in args.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.split_once('=') {
            Some((key, value)) => {
                object.insert(key.trim().to_string(), Value::String(value.trim().to_string()));
            }
            None => {
                object.insert("input".to_string(), Value::String(part.to_string()));
            }
        }
    }
    Value::Object(object)
}
