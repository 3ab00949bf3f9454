use anyhow::Result;

use crate::engine::config::AnalysisConfig;
use crate::engine::core::PositionInput;

use super::ai_format;
use super::response_types::ClassifyResponse;

pub fn execute(input: &PositionInput, config: &AnalysisConfig) -> Result<ClassifyResponse> {
    let (legs, label) = crate::engine::core::classify_position(input, config)?;
    Ok(ai_format::format_classification(&legs, label))
}
