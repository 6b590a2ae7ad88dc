//! 成绩文本与表头格式处理

use once_cell::sync::Lazy;
use regex::Regex;

static GRADE_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s*\[([^\[\]]*)\]$").expect("Invalid grade header regex"));

static COMMENT_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\*/\s*(.+?)\s+Comments\s*\*/$").expect("Invalid comment header regex")
});

/// 去掉末尾的 ".0"
pub fn strip_trailing_zero(value: &str) -> &str {
    value.strip_suffix(".0").unwrap_or(value)
}

pub fn format_points(points: f64) -> String {
    strip_trailing_zero(&points.to_string()).to_string()
}

/// 成绩列表头，例如 `Quiz 1 [10]`
pub fn grade_header(name: &str, points: f64) -> String {
    format!("{} [{}]", name, format_points(points))
}

/// 评语列表头，例如 `*/ Quiz 1 Comments */`
pub fn comment_header(name: &str) -> String {
    format!("*/ {name} Comments */")
}

/// 解析成绩列表头，返回 (名称, 分值文本)
pub fn parse_grade_header(header: &str) -> Option<(&str, &str)> {
    let caps = GRADE_HEADER_RE.captures(header.trim())?;
    let name = caps.get(1)?.as_str().trim();
    let points = caps.get(2)?.as_str().trim();
    Some((name, points))
}

/// 解析评语列表头，返回成绩项名称
pub fn parse_comment_header(header: &str) -> Option<&str> {
    let caps = COMMENT_HEADER_RE.captures(header.trim())?;
    caps.get(1).map(|m| m.as_str().trim())
}

/// 解析为有限的数值
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// 分值比较（表头中的分值与成绩项分值）
pub fn points_match(text: &str, points: f64) -> bool {
    parse_number(text).is_some_and(|p| (p - points).abs() < 1e-9)
}

/// 成绩比较：两边都是数值时按数值比较，否则按去除首尾空白后的文本比较
pub fn grades_equivalent(a: &str, b: &str) -> bool {
    match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a.trim() == b.trim(),
    }
}

/// 空白文本视为无值
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(10.0), "10");
        assert_eq!(format_points(12.5), "12.5");
        assert_eq!(format_points(0.0), "0");
    }

    #[test]
    fn test_headers() {
        assert_eq!(grade_header("Quiz 1", 10.0), "Quiz 1 [10]");
        assert_eq!(comment_header("Quiz 1"), "*/ Quiz 1 Comments */");
    }

    #[test]
    fn test_parse_grade_header() {
        assert_eq!(parse_grade_header("Quiz 1 [10]"), Some(("Quiz 1", "10")));
        assert_eq!(parse_grade_header(" Lab [12.5] "), Some(("Lab", "12.5")));
        assert_eq!(parse_grade_header("Array [a] [3]"), Some(("Array [a]", "3")));
        assert_eq!(parse_grade_header("Quiz 1"), None);
    }

    #[test]
    fn test_parse_comment_header() {
        assert_eq!(parse_comment_header("*/ Quiz 1 Comments */"), Some("Quiz 1"));
        assert_eq!(parse_comment_header("*/Midterm Comments*/"), Some("Midterm"));
        assert_eq!(parse_comment_header("Quiz 1 Comments"), None);
        assert_eq!(parse_grade_header("*/ Quiz 1 Comments */"), None);
    }

    #[test]
    fn test_grades_equivalent() {
        assert!(grades_equivalent("85", "85.0"));
        assert!(grades_equivalent(" 85.50", "85.5"));
        assert!(!grades_equivalent("85", "86"));
        assert!(grades_equivalent("A-", "A-"));
        assert!(!grades_equivalent("A-", "A"));
        assert!(!grades_equivalent("NaN", "nan"));
    }

    #[test]
    fn test_points_match() {
        assert!(points_match("10", 10.0));
        assert!(points_match("10.0", 10.0));
        assert!(!points_match("12", 12.5));
        assert!(!points_match("ten", 10.0));
    }

    #[test]
    fn test_strip_trailing_zero() {
        assert_eq!(strip_trailing_zero("8.0"), "8");
        assert_eq!(strip_trailing_zero("8.05"), "8.05");
        assert_eq!(strip_trailing_zero("10.00"), "10.00");
    }
}
