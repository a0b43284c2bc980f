//! Travel tools and their registry
//!
//! Tools are simple offline lookups exposed behind one trait so the agent
//! can dispatch detected tool calls by name.

pub mod definition;
pub mod registry;
pub mod travel;

pub use definition::{Tool, ToolDefinition, required_city};
pub use registry::{ToolRegistry, parse_parameters};
pub use travel::{CityFactsTool, PlanCityVisitTool, TimeTool, WeatherTool};
