//! String encodings the chart engine expects for offsets and coordinates.
//!
//! - UTC offsets: `"+HH:MM"` / `"-HH:MM"`.
//! - Coordinates: `"<deg><hemisphere><mm>"`, e.g. `"48n18"` or `"14e17"`.

/// Which coordinate a degree value belongs to; selects the hemisphere letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    const fn hemisphere(self, positive: bool) -> char {
        match (self, positive) {
            (Axis::Latitude, true) => 'n',
            (Axis::Latitude, false) => 's',
            (Axis::Longitude, true) => 'e',
            (Axis::Longitude, false) => 'w',
        }
    }
}

/// Format a signed fractional-hour offset as `"<sign><HH>:<MM>"`.
///
/// Zero and positive offsets get `+`. Minutes are rounded to the nearest
/// integer, ties to even; a minute value that rounds to 60 carries into the hour.
pub fn format_utc_offset(offset_hours: f64) -> String {
    let sign = if offset_hours >= 0.0 { '+' } else { '-' };
    let total_minutes = (offset_hours.abs() * 60.0).round_ties_even() as u32;
    format!("{sign}{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Convert decimal degrees to `"<deg><hemisphere><mm>"`.
///
/// `deg` is the integer part of the absolute value and `mm` the fractional
/// minutes rounded half to even. Rounding up to 60 minutes increments the degree.
/// Zero is treated as the positive hemisphere.
pub fn decimal_to_degree_minute(value: f64, axis: Axis) -> String {
    let abs = value.abs();
    let mut degrees = abs.trunc() as u32;
    let mut minutes = ((abs - abs.trunc()) * 60.0).round_ties_even() as u32;
    if minutes == 60 {
        degrees += 1;
        minutes = 0;
    }
    let hemisphere = axis.hemisphere(value >= 0.0);
    format!("{degrees}{hemisphere}{minutes:02}")
}

/// Parse a `"<deg><hemisphere><mm>"` string back into signed decimal degrees.
///
/// Returns `None` when the string is not in that shape or the minutes are
/// out of range.
pub fn parse_degree_minute(encoded: &str) -> Option<(f64, Axis)> {
    let encoded = encoded.trim();
    let split = encoded.find(|c: char| c.is_ascii_alphabetic())?;
    let (deg_part, rest) = encoded.split_at(split);
    let mut chars = rest.chars();
    let hemisphere = chars.next()?.to_ascii_lowercase();
    let min_part = chars.as_str();

    if deg_part.is_empty() || !deg_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if min_part.len() != 2 || !min_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let degrees: f64 = deg_part.parse().ok()?;
    let minutes: f64 = min_part.parse().ok()?;
    if minutes >= 60.0 {
        return None;
    }

    let (axis, sign) = match hemisphere {
        'n' => (Axis::Latitude, 1.0),
        's' => (Axis::Latitude, -1.0),
        'e' => (Axis::Longitude, 1.0),
        'w' => (Axis::Longitude, -1.0),
        _ => return None,
    };

    Some((sign * (degrees + minutes / 60.0), axis))
}
