//! Mapping of requested departure times to the booking site's time slots.
//!
//! The site only lets you search from even-hour buckets (two-hour windows
//! labeled "00", "02", ... "22", plus "24" for the end-of-day slot), while
//! users pick an arbitrary `HH:mm`. The normalizer bridges the two.

/// Map a requested `HH:mm` time to the site's even-hour slot label.
///
/// Rules, matching the site's select options:
/// - exactly `12:00` maps to the `"24"` end-of-day slot
/// - otherwise the hour is clamped to `0..=24` and floored to the nearest
///   even hour (`19:30` → `"18"`)
/// - a malformed hour is treated as `0`
pub fn even_hour_bucket(time: &str) -> String {
    let mut parts = time.splitn(2, ':');
    let hh = parts.next().unwrap_or("");
    let mm = parts.next().unwrap_or("00");

    if hh == "12" && (mm.is_empty() || mm == "00") {
        return "24".to_string();
    }

    let raw = hh.parse::<u32>().unwrap_or(0).min(24);
    if raw == 24 {
        return "24".to_string();
    }
    let even = raw - (raw % 2);
    format!("{:02}", even)
}
