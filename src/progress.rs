//! Progress extraction from extractor output lines

use regex::Regex;
use std::sync::LazyLock;

static PERCENT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)%").ok());

/// Extract a completion percentage from one line of extractor output
///
/// Looks for the first decimal number immediately followed by `%` anywhere in
/// the line (`[download]  12.3% of 10.50MiB at 1.2MiB/s`). Lines without one,
/// such as warnings and log chatter, yield `None`; that is "no update", not a
/// failure.
///
/// ```
/// use media_dl::progress::parse_progress;
///
/// assert_eq!(parse_progress("12.3% of 10.5MiB"), Some(12.3));
/// assert_eq!(parse_progress("ERROR: no such format"), None);
/// ```
pub fn parse_progress(line: &str) -> Option<f32> {
    let re = PERCENT.as_ref()?;
    let caps = re.captures(line)?;
    caps.get(1)?.as_str().parse::<f32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fractional_percentage() {
        assert_eq!(parse_progress("12.3% of 10.5MiB"), Some(12.3));
    }

    #[test]
    fn extracts_complete_percentage() {
        assert_eq!(parse_progress("100.0%"), Some(100.0));
    }

    #[test]
    fn ignores_error_lines() {
        assert_eq!(parse_progress("ERROR: no such format"), None);
    }

    #[test]
    fn finds_percentage_inside_download_line() {
        assert_eq!(
            parse_progress("[download]  45.7% of ~  3.20MiB at  1.10MiB/s ETA 00:02"),
            Some(45.7)
        );
    }

    #[test]
    fn accepts_integer_percentage() {
        assert_eq!(parse_progress("[download] 7% done"), Some(7.0));
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(parse_progress("10.0% then 20.0%"), Some(10.0));
    }

    #[test]
    fn tolerates_noise() {
        for line in [
            "",
            "WARNING: unable to extract uploader id",
            "[info] Downloading 1 format(s): 137+140",
            "% alone",
            "percent sign after space 12 %",
        ] {
            assert_eq!(parse_progress(line), None, "line: {line:?}");
        }
    }
}
