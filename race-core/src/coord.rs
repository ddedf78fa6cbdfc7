/// Convert an NMEA `DDDMM.MMMM` angle plus hemisphere letter to signed decimal
/// degrees (north/east positive).
///
/// The same rule covers latitude (two degree digits) and longitude (three):
/// whole degrees are `value / 100` truncated, the remainder is minutes.
/// An empty or malformed field yields `0.0`.
///
/// `"2333.038"`, `'S'` → `-23.5506...`
pub fn to_decimal_degrees(raw: &str, hemisphere: char) -> f64 {
    let value = parse_or_zero(raw);
    let degrees = libm::trunc(value / 100.0);
    let minutes = value - degrees * 100.0;
    let decimal = degrees + minutes / 60.0;

    match hemisphere {
        'S' | 'W' => -decimal,
        _ => decimal,
    }
}

/// Numeric NMEA field, or `0.0` when it is empty, garbled or not finite.
pub(crate) fn parse_or_zero(field: &str) -> f64 {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
