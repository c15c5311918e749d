//! Timestamped download file names

use chrono::NaiveDateTime;

/// Prefix used when the route has no path segment
const FALLBACK_PREFIX: &str = "download";

/// First non-empty segment of a route path (`/students/list` -> `students`)
pub fn first_path_segment(path: &str) -> Option<&str> {
    path.split('/').find(|segment| !segment.is_empty())
}

/// `{firstPathSegment}_{dd-mm-yyyy_HH-MM}.{extension}`
pub fn download_file_name(route_path: &str, at: NaiveDateTime, extension: &str) -> String {
    let prefix = first_path_segment(route_path).unwrap_or(FALLBACK_PREFIX);
    format!("{}_{}.{}", prefix, at.format("%d-%m-%Y_%H-%M"), extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_download_file_name() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 42)
            .unwrap();
        assert_eq!(
            download_file_name("/students/list", at, "xlsx"),
            "students_07-03-2025_09-05.xlsx"
        );
        assert_eq!(download_file_name("/", at, "xlsx"), "download_07-03-2025_09-05.xlsx");
    }
}
