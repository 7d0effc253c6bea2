//! MCP surface: the two WeatherKit tools exposed to callers.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ProtocolVersion, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::Deserialize;
use weatherkit_core::WeatherTools;

/// Arguments shared by both tools.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CityRequest {
    /// Nom de la ville (ex: "Paris", "Lyon").
    pub city_name: String,

    /// Code pays à 2 lettres (par défaut "FR").
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "FR".to_string()
}

#[derive(Clone)]
pub struct WeatherServer {
    tools: Arc<WeatherTools>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WeatherServer {
    pub fn new(tools: WeatherTools) -> Self {
        Self { tools: Arc::new(tools), tool_router: Self::tool_router() }
    }

    /// Prévisions météo quotidiennes pour une ville via Apple WeatherKit.
    #[tool(
        description = "Obtient les prévisions météo quotidiennes pour une ville via Apple WeatherKit"
    )]
    async fn get_weather_forecast(
        &self,
        Parameters(request): Parameters<CityRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.tools.forecast_report(&request.city_name, &request.country).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Résumé météo simplifié (aujourd'hui et demain) pour une ville.
    #[tool(description = "Obtient un résumé météo simplifié pour une ville")]
    async fn get_weather_summary(
        &self,
        Parameters(request): Parameters<CityRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.tools.summary(&request.city_name, &request.country).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Prévisions météo quotidiennes via Apple WeatherKit. \
                 Les réponses sont localisées en français."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
