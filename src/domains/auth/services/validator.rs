use crate::domains::auth::models::{LoginRequest, RegisterRequest};
use crate::shared::errors::{ValidationCode, ValidationError, ValidationErrors};

/// 로그인 입력 검증 (아이디, 비밀번호 필수)
pub fn validate_credentials(username: &str, password: &str) -> Result<LoginRequest, ValidationError> {
    let mut errors = ValidationErrors::new();
    check_credentials(&mut errors, username, password);

    errors.finish(|| LoginRequest {
        username: username.trim().to_string(),
        password: password.to_string(),
    })
}

/// 회원가입 입력 검증
/// Credentials plus an email of the form `local@domain`
pub fn validate_registration(
    username: &str,
    password: &str,
    email: &str,
) -> Result<RegisterRequest, ValidationError> {
    let mut errors = ValidationErrors::new();
    check_credentials(&mut errors, username, password);

    let email = email.trim();
    if email.is_empty() {
        errors.push("email", ValidationCode::Required, "Email is required");
    } else if !is_email_shape(email) {
        errors.push("email", ValidationCode::InvalidEmail, "Please enter a valid email address");
    }

    errors.finish(|| RegisterRequest {
        username: username.trim().to_string(),
        password: password.to_string(),
        email: email.to_string(),
    })
}

fn check_credentials(errors: &mut ValidationErrors, username: &str, password: &str) {
    if username.trim().is_empty() {
        errors.push("username", ValidationCode::Required, "Username is required");
    }
    // 비밀번호는 공백도 유효한 문자로 취급, 빈 문자열만 거절
    if password.is_empty() {
        errors.push("password", ValidationCode::Required, "Password is required");
    }
}

fn is_email_shape(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
