//! Travel tools: weather, local time, city facts, and a composite planner
//!
//! All lookups are mock/offline data for the demo; real data sources would
//! slot in behind the same `Tool` trait.

use chrono::{FixedOffset, Utc};
use serde_json::Value;

use crate::error::{Result, WayfarerError};
use crate::tools::definition::{required_city, Tool, ToolDefinition};

/// Current weather for a city (mock data)
#[derive(Debug, Default)]
pub struct WeatherTool;

impl WeatherTool {
    fn conditions(city: &str) -> &'static str {
        match city.to_lowercase().as_str() {
            "paris" => "Sunny, 22°C",
            "london" => "Cloudy, 15°C",
            "tokyo" => "Clear, 26°C",
            "new york" => "Partly cloudy, 18°C",
            "sydney" => "Windy, 20°C",
            "berlin" => "Overcast, 16°C",
            "rome" => "Sunny, 25°C",
            _ => "Sunny, 22°C",
        }
    }
}

impl Tool for WeatherTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "WeatherTool",
            "Get current weather conditions for a city",
            ToolDefinition::city_schema(),
        )
    }

    fn execute(&self, input: &Value) -> Result<String> {
        let city = required_city(input)?;
        Ok(format!(
            "Weather for {}: {} (mock data for demo purposes)",
            city,
            Self::conditions(&city)
        ))
    }
}

/// Current local time for a city, from a fixed UTC-offset table
#[derive(Debug, Default)]
pub struct TimeTool;

impl TimeTool {
    /// Whole-hour UTC offsets; no DST handling in the demo
    fn utc_offset_hours(city: &str) -> Option<i32> {
        match city.to_lowercase().as_str() {
            "london" => Some(0),
            "paris" | "berlin" | "rome" | "madrid" | "amsterdam" | "barcelona" => Some(1),
            "tokyo" => Some(9),
            "new york" => Some(-5),
            "sydney" => Some(10),
            _ => None,
        }
    }
}

impl Tool for TimeTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "TimeTool",
            "Get the current local time in a city",
            ToolDefinition::city_schema(),
        )
    }

    fn execute(&self, input: &Value) -> Result<String> {
        let city = required_city(input)?;
        match Self::utc_offset_hours(&city) {
            Some(hours) => {
                let offset = FixedOffset::east_opt(hours * 3600)
                    .ok_or_else(|| WayfarerError::Tool(format!("invalid UTC offset for {city}")))?;
                let local = Utc::now().with_timezone(&offset);
                Ok(format!(
                    "Current time in {}: {} (UTC{:+})",
                    city,
                    local.format("%H:%M"),
                    hours
                ))
            }
            None => Ok(format!(
                "Current time in {}: {} UTC (timezone unknown, showing UTC)",
                city,
                Utc::now().format("%H:%M")
            )),
        }
    }
}

/// Short facts about well-known destinations (mock data)
#[derive(Debug, Default)]
pub struct CityFactsTool;

impl CityFactsTool {
    fn facts(city: &str) -> Option<&'static str> {
        match city.to_lowercase().as_str() {
            "paris" => Some("Paris is the capital of France, famous for the Eiffel Tower, the Louvre, and its cafe culture."),
            "london" => Some("London is the capital of the UK, home to the British Museum, Big Ben, and the Thames."),
            "tokyo" => Some("Tokyo is Japan's bustling capital, mixing ultra-modern districts with historic temples."),
            "new york" => Some("New York City is known for Times Square, Central Park, and the Statue of Liberty."),
            "sydney" => Some("Sydney is famous for its Opera House, Harbour Bridge, and beautiful beaches."),
            _ => None,
        }
    }
}

impl Tool for CityFactsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "CityFactsTool",
            "Get interesting facts about a city",
            ToolDefinition::city_schema(),
        )
    }

    fn execute(&self, input: &Value) -> Result<String> {
        let city = required_city(input)?;
        match Self::facts(&city) {
            Some(facts) => Ok(facts.to_string()),
            None => Ok(format!(
                "{city} is a wonderful destination with rich history and culture."
            )),
        }
    }
}

/// Composite planner: weather + time + facts in one answer
#[derive(Debug, Default)]
pub struct PlanCityVisitTool;

impl Tool for PlanCityVisitTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "PlanCityVisitTool",
            "Plan a city visit: combines weather, local time, and city facts",
            ToolDefinition::city_schema(),
        )
    }

    fn execute(&self, input: &Value) -> Result<String> {
        required_city(input)?;
        let weather = WeatherTool.execute(input)?;
        let time = TimeTool.execute(input)?;
        let facts = CityFactsTool.execute(input)?;
        Ok(format!("{weather}\n{time}\n{facts}"))
    }
}
