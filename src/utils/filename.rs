use chrono::{DateTime, TimeZone};
use uuid::Uuid;

/// Returns the text after the last `.` of `name`.
///
/// Empty when the name is absent, has no dot, or the remainder is not plain
/// ASCII alphanumerics (so it can never smuggle a path separator).
pub fn file_extension(name: Option<&str>) -> &str {
    let Some((_, ext)) = name.and_then(|it| it.rsplit_once('.')) else {
        return "";
    };
    if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        ext
    } else {
        ""
    }
}

/// Builds `<yyyyMMdd_HHmmss>_<uuid>[.<ext>]` for a stored upload.
pub fn generate_file_name<Tz>(original_name: Option<&str>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stamp = now.format("%Y%m%d_%H%M%S");
    let token = Uuid::new_v4();
    match file_extension(original_name) {
        "" => format!("{}_{}", stamp, token),
        ext => format!("{}_{}.{}", stamp, token, ext),
    }
}
