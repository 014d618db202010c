use super::*;
use rstest::rstest;

#[rstest]
#[case(AppError::Unauthorized("test".into()), 401, "UNAUTHORIZED")]
#[case(AppError::Forbidden("test".into()), 403, "FORBIDDEN")]
#[case(AppError::NotFound("test".into()), 404, "NOT_FOUND")]
#[case(AppError::Validation("test".into()), 400, "VALIDATION_ERROR")]
#[case(AppError::BusinessRule("test".into()), 422, "BUSINESS_RULE_VIOLATION")]
#[case(AppError::Conflict("test".into()), 409, "CONFLICT")]
#[case(AppError::Dependency("test".into()), 500, "DEPENDENCY_ERROR")]
#[case(AppError::Internal("test".into()), 500, "INTERNAL_ERROR")]
fn test_app_error_mapping(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
    assert_eq!(err.status_code(), status);
    assert_eq!(err.error_code(), code);
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        format!("{}", AppError::Unauthorized("msg".into())),
        "Unauthorized: msg"
    );
    assert_eq!(
        format!("{}", AppError::NotFound("msg".into())),
        "Not found: msg"
    );
    assert_eq!(
        format!("{}", AppError::Dependency("msg".into())),
        "Dependency error: msg"
    );
}

#[test]
fn test_public_message_hides_dependency_detail() {
    let err = AppError::Dependency("connection refused to 10.0.0.3:5432".into());
    assert_eq!(err.public_message(), "An unexpected error occurred");

    let err = AppError::Validation("amount must be positive".into());
    assert_eq!(err.public_message(), "amount must be positive");
}

#[test]
fn test_server_error_classification() {
    assert!(AppError::Dependency("smtp".into()).is_server_error());
    assert!(AppError::Internal("bug".into()).is_server_error());
    assert!(!AppError::Conflict("email taken".into()).is_server_error());
}
