use anyhow::Result;

use crate::engine::config::AnalysisConfig;
use crate::engine::core::PositionInput;

use super::ai_format;
use super::response_types::AnalyzeResponse;

pub fn execute(input: &PositionInput, config: &AnalysisConfig) -> Result<AnalyzeResponse> {
    let analysis = crate::engine::core::analyze_position(input, config)?;
    Ok(ai_format::format_analysis(analysis))
}
