use crate::error::{AppError, AppResult};

const MAX_PLACE_LEN: usize = 100;

/// Trim and collapse inner whitespace
pub fn normalize_place(place: &str) -> String {
    place.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized `(origin, destination)`; both non-empty and different
pub fn validate_route(origin: &str, destination: &str) -> AppResult<(String, String)> {
    let origin = normalize_place(origin);
    let destination = normalize_place(destination);

    if origin.is_empty() || destination.is_empty() {
        return Err(AppError::ValidationError(
            "Origin and destination are required".to_string(),
        ));
    }
    if origin.chars().count() > MAX_PLACE_LEN || destination.chars().count() > MAX_PLACE_LEN {
        return Err(AppError::ValidationError(format!(
            "Place names are limited to {MAX_PLACE_LEN} characters"
        )));
    }
    if origin.to_lowercase() == destination.to_lowercase() {
        return Err(AppError::ValidationError(
            "Origin and destination must differ".to_string(),
        ));
    }

    Ok((origin, destination))
}

/// Case-insensitive substring match used by search filters
pub fn place_matches(place: &str, needle: &str) -> bool {
    let needle = normalize_place(needle).to_lowercase();
    needle.is_empty() || place.to_lowercase().contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_route() {
        assert_eq!(
            validate_route("  Bishkek ", "Osh").unwrap(),
            ("Bishkek".to_string(), "Osh".to_string())
        );
        assert!(validate_route("", "Osh").is_err());
        assert!(validate_route("Osh", "  osh ").is_err());
    }

    #[test]
    fn test_place_matches_ignores_case() {
        assert!(place_matches("Бишкек", "бишк"));
        assert!(place_matches("Bishkek", "BISH"));
        assert!(place_matches("Bishkek", "  "));
        assert!(!place_matches("Osh", "Naryn"));
    }
}
