use crate::error::{internal::InternalError, AppError};

/// Parses a u64 value from String
///
/// # Arguments
/// - `value` - The String to attempt to parse into `u64`
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed String to `u64`
/// - `Err(AppError::InternalErr(ParseStringId))` - Failed to parse
///   the string as a u64
pub fn parse_u64_from_string(value: String) -> Result<u64, AppError> {
    let result = value
        .parse::<u64>()
        .map_err(|e| InternalError::ParseStringId { value, source: e })?;

    Ok(result)
}

/// Parses a stored Discord snowflake into a typed ID.
///
/// Serenity ID constructors panic on zero, so zero is rejected here as
/// malformed data instead.
///
/// # Arguments
/// - `value` - Stored ID string
///
/// # Returns
/// - `Ok(T)` - Typed Discord ID
/// - `Err(AppError::InternalErr)` - Not a number, or zero
pub fn parse_snowflake<T: From<u64>>(value: &str) -> Result<T, AppError> {
    let id = parse_u64_from_string(value.to_string())?;
    if id == 0 {
        return Err(InternalError::ZeroId(value.to_string()).into());
    }

    Ok(T::from(id))
}

/// Parses a JSON array of stored snowflakes.
pub fn parse_snowflake_list<T: From<u64>>(value: &str) -> Result<Vec<T>, AppError> {
    let raw: Vec<String> = serde_json::from_str(value)?;
    raw.iter().map(|id| parse_snowflake(id)).collect()
}

/// Encodes IDs as a JSON array of strings for a text column.
pub fn encode_snowflake_list<T: ToString>(ids: &[T]) -> Result<String, AppError> {
    let raw: Vec<String> = ids.iter().map(ToString::to_string).collect();
    Ok(serde_json::to_string(&raw)?)
}
