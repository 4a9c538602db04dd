use vaultkeeper_core::format::OutputFormat;
use vaultkeeper_core::note::ReflectionType;

/// Parse output format from string
pub fn parse_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

/// Parse reflection type from string
pub fn parse_reflection_type(s: &str) -> std::result::Result<ReflectionType, String> {
    s.parse::<ReflectionType>().map_err(|e| e.to_string())
}
