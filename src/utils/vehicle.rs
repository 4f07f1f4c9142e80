use crate::error::{AppError, AppResult};
use regex::Regex;

/// Uppercase and drop separators so "01 a 123 bc" and "01A123BC" match
pub fn normalize_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Plates are 4 to 12 letters/digits after normalization
pub fn validate_plate(plate: &str) -> AppResult<()> {
    let plate_regex = Regex::new(r"^[\p{Lu}0-9]{4,12}$")
        .map_err(|e| AppError::InternalError(format!("Invalid plate pattern: {e}")))?;

    if !plate_regex.is_match(plate) {
        return Err(AppError::ValidationError(
            "Plate number must contain 4-12 letters or digits".to_string(),
        ));
    }

    Ok(())
}
