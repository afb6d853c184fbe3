use crate::error::AppError;

/// Radius applied when the query does not specify one
pub const DEFAULT_RADIUS_METERS: u32 = 5000;

/// Validate that a string's length falls within the given range (inclusive).
pub fn validate_string_length(
    value: &str,
    min: usize,
    max: usize,
    field_name: &str,
) -> Result<(), AppError> {
    if value.len() < min || value.len() > max {
        return Err(AppError::BadRequest(format!(
            "{field_name} must be {min}-{max} characters"
        )));
    }
    Ok(())
}

/// Parse a coordinate pair from raw query values (present, numeric, finite).
///
/// Parsing happens here rather than in the extractor so malformed input
/// gets the same error envelope as every other validation failure.
pub fn validate_coordinates(
    lat: Option<&str>,
    lng: Option<&str>,
) -> Result<(f64, f64), AppError> {
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(AppError::BadRequest("lat and lng are required.".into()));
    };
    let (Ok(lat), Ok(lng)) = (lat.trim().parse::<f64>(), lng.trim().parse::<f64>()) else {
        return Err(AppError::BadRequest(
            "lat and lng must be valid numbers.".into(),
        ));
    };
    if !lat.is_finite() || !lng.is_finite() {
        return Err(AppError::BadRequest(
            "lat and lng must be valid numbers.".into(),
        ));
    }
    Ok((lat, lng))
}

/// Resolve the search radius from a raw query value: defaults to 5000m,
/// must parse as a positive integer if given
pub fn radius_or_default(radius: Option<&str>) -> Result<u32, AppError> {
    let Some(radius) = radius else {
        return Ok(DEFAULT_RADIUS_METERS);
    };
    match radius.trim().parse::<i64>() {
        Ok(r) if r > 0 && r <= u32::MAX as i64 => Ok(r as u32),
        _ => Err(AppError::BadRequest(
            "radius must be a positive integer.".into(),
        )),
    }
}
