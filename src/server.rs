use garde::Validate;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Json},
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

use crate::engine::config::{AnalysisConfig, ConfigOverrides};
use crate::engine::core::PositionInput;
use crate::engine::error::ValidationError;
use crate::engine::types::{RawLeg, RawScalar};
use crate::tools;
use crate::tools::response_types::{
    AnalyzeResponse, ClassifyResponse, PayoffAtResponse, StrategiesResponse,
};

#[derive(Clone)]
pub struct PayoffServer {
    pub config: Arc<AnalysisConfig>,
    tool_router: ToolRouter<Self>,
}

impl PayoffServer {
    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self {
            config,
            tool_router: Self::tool_router(),
        }
    }

    /// Server config with any per-request overrides applied.
    fn effective_config(&self, overrides: Option<&ConfigOverrides>) -> AnalysisConfig {
        overrides.map_or_else(|| (*self.config).clone(), |o| o.apply(&self.config))
    }
}

/// Engine validation failures keep the tool-level "Validation error" prefix.
fn tool_error(e: &anyhow::Error) -> String {
    if e.downcast_ref::<ValidationError>().is_some() {
        format!("Validation error: {e}")
    } else {
        format!("Error: {e}")
    }
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct AnalyzePositionParams {
    /// Leg records: strike, option_type ("C"/"P"), premium, underlying, expiry
    #[garde(length(min = 1, max = 64))]
    pub legs: Vec<RawLeg>,
    /// Signed quantity per leg, aligned by index (positive = long, negative = short)
    #[garde(length(min = 1, max = 64))]
    pub quantities: Vec<RawScalar>,
    /// Current underlying price; centers the sampled range and adds the payoff there
    #[garde(inner(range(min = 0.0)))]
    pub underlying_price: Option<f64>,
    /// Per-request overrides of the sampling and tolerance settings
    #[garde(dive)]
    pub overrides: Option<ConfigOverrides>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct ClassifyPositionParams {
    /// Leg records: strike, option_type ("C"/"P"), premium, underlying, expiry
    #[garde(length(min = 1, max = 64))]
    pub legs: Vec<RawLeg>,
    /// Signed quantity per leg, aligned by index
    #[garde(length(min = 1, max = 64))]
    pub quantities: Vec<RawScalar>,
    /// Per-request overrides (only strike_epsilon affects classification)
    #[garde(dive)]
    pub overrides: Option<ConfigOverrides>,
}

#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct PayoffAtPriceParams {
    /// Leg records: strike, option_type ("C"/"P"), premium, underlying, expiry
    #[garde(length(min = 1, max = 64))]
    pub legs: Vec<RawLeg>,
    /// Signed quantity per leg, aligned by index
    #[garde(length(min = 1, max = 64))]
    pub quantities: Vec<RawScalar>,
    /// Underlying price at expiry
    #[garde(range(min = 0.0))]
    pub price: f64,
}

use rmcp::handler::server::wrapper::Parameters;

#[tool_router]
impl PayoffServer {
    /// Classify a position and compute its expiry payoff curve, break-evens and max profit/loss.
    ///
    /// **When to use**: Main entry point once you hold the legs of a position
    /// **Input**: `legs` (raw records from the chain lookup) and `quantities` (signed, same order);
    ///   optionally `underlying_price` and `overrides`
    /// **Output**:
    ///   - Strategy label (canonical name, "Custom Strategy", or mixed-context marker)
    ///   - Sampled price range and full payoff curve with per-leg payoffs
    ///   - Sorted break-even prices
    ///   - Net premium, max profit, max loss (None = unlimited), reward/risk
    ///   - Payoff at `underlying_price` when given
    /// **Next tools**: payoff_at_price() for specific targets
    #[tool(name = "analyze_position")]
    async fn analyze_position(
        &self,
        Parameters(params): Parameters<AnalyzePositionParams>,
    ) -> Result<Json<AnalyzeResponse>, String> {
        params
            .validate()
            .map_err(|e| format!("Validation error: {e}"))?;
        let config = self.effective_config(params.overrides.as_ref());
        let input = PositionInput {
            legs: params.legs,
            quantities: params.quantities,
            underlying_price: params.underlying_price,
        };
        tools::analyze::execute(&input, &config)
            .map(Json)
            .map_err(|e| tool_error(&e))
    }

    /// Name the strategy a set of legs forms, without computing the payoff curve.
    ///
    /// **When to use**: Quick labeling of a position
    /// **Output**: Strategy label, catalog pattern id, category and description
    /// **Next tools**: analyze_position() for the full payoff analysis
    #[tool(name = "classify_position")]
    async fn classify_position(
        &self,
        Parameters(params): Parameters<ClassifyPositionParams>,
    ) -> Result<Json<ClassifyResponse>, String> {
        params
            .validate()
            .map_err(|e| format!("Validation error: {e}"))?;
        let config = self.effective_config(params.overrides.as_ref());
        let input = PositionInput {
            legs: params.legs,
            quantities: params.quantities,
            underlying_price: None,
        };
        tools::classify::execute(&input, &config)
            .map(Json)
            .map_err(|e| tool_error(&e))
    }

    /// Expiry payoff of a position at one underlying price, in total and per leg.
    ///
    /// **When to use**: Checking a specific price target or scenario
    /// **Next tools**: analyze_position() for the whole curve
    #[tool(name = "payoff_at_price")]
    async fn payoff_at_price(
        &self,
        Parameters(params): Parameters<PayoffAtPriceParams>,
    ) -> Result<Json<PayoffAtResponse>, String> {
        params
            .validate()
            .map_err(|e| format!("Validation error: {e}"))?;
        let input = PositionInput {
            legs: params.legs,
            quantities: params.quantities,
            underlying_price: None,
        };
        tools::payoff_at::execute(&input, params.price)
            .map(Json)
            .map_err(|e| tool_error(&e))
    }

    /// Browse the strategy shapes the classifier recognizes, grouped by category.
    ///
    /// **Categories**: Singles, Straddles, Strangles, Verticals, Butterflies
    /// **Note**: Anything else (ratio spreads, 4+ legs) is labeled "Custom Strategy"
    #[tool(name = "list_strategies")]
    async fn list_strategies(&self) -> Json<StrategiesResponse> {
        Json(tools::strategies::execute())
    }
}

#[tool_handler]
impl ServerHandler for PayoffServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: rmcp::model::ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "optopsy-payoff".into(),
                title: None,
                version: env!("CARGO_PKG_VERSION").into(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Options position payoff analyzer. Works on legs you already hold; \
                no market data is fetched.\
                \n\nEach leg record carries strike, option_type (\"C\"/\"Call\" or \"P\"/\"Put\"), \
                premium (or last_price), underlying and expiry (YYYY-MM-DD). Quantities are \
                passed as a separate list aligned by index: positive = long, negative = short.\
                \n\nTools:\
                \n1. list_strategies() — the recognized shapes (singles, straddles, strangles, \
                verticals, butterflies).\
                \n2. classify_position({ legs, quantities }) — strategy label only.\
                \n3. analyze_position({ legs, quantities, underlying_price?, overrides? }) — label, \
                payoff curve at expiry, break-evens, net premium and max profit/loss.\
                \n4. payoff_at_price({ legs, quantities, price }) — payoff at one price, per leg.\
                \n\nLegs with different underlyings or expiries are still evaluated, but the \
                label becomes \"Unclassifiable: mixed underlying/expiry\" and a warning is returned."
                    .into(),
            ),
        }
    }
}
