//! Value parsers for command-line arguments.

use rubricate_core::CriterionSpec;

/// Parse `key=value` where value is a number.
pub fn parse_key_value(s: &str) -> Result<(String, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{s}'"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;
    Ok((key.to_string(), value))
}

/// Parse `name:weight[:description]`. The description may itself contain
/// colons.
pub fn parse_criterion(s: &str) -> Result<CriterionSpec, String> {
    let mut parts = s.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim();
    let weight = parts
        .next()
        .ok_or_else(|| format!("expected name:weight[:description], got '{s}'"))?
        .trim();
    let description = parts.next().unwrap_or_default().trim();

    if name.is_empty() {
        return Err(format!("missing criterion name in '{s}'"));
    }
    let weight: f64 = weight
        .parse()
        .map_err(|_| format!("criterion weight '{weight}' is not a number"))?;
    Ok(CriterionSpec::new(name, description, weight))
}
