use crate::error::{AppError, AppResult};
use regex::Regex;

/// 验证邮箱格式
pub fn validate_email(email: &str) -> AppResult<()> {
    let email_regex = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .map_err(|e| AppError::InternalError(format!("Email regex failed to compile: {}", e)))?;

    if !email_regex.is_match(email) {
        return Err(AppError::ValidationError(
            "Invalid email address format".to_string(),
        ));
    }

    Ok(())
}

/// 规范化邮箱，去除首尾空白并转换为小写
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("student@example.com").is_ok());
        assert!(validate_email("first.last+tag@school.edu.cn").is_ok());
        assert!(validate_email("no-at-sign.example.com").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Student@Example.COM "), "student@example.com");
        assert_eq!(normalize_email("plain@example.com"), "plain@example.com");
    }
}
