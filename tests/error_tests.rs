use http::StatusCode;

use bashpay::error::ApiError;

fn status_of(err: ApiError) -> StatusCode {
    let (status, _): (StatusCode, String) = err.into();
    status
}

// Clients branch on these codes, so they are part of the API contract.
#[test]
fn error_status_codes_are_stable() {
    assert_eq!(
        status_of(ApiError::InvalidInput("x".into())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(status_of(ApiError::InsufficientBalance), StatusCode::BAD_REQUEST);
    assert_eq!(status_of(ApiError::Auth("x".into())), StatusCode::UNAUTHORIZED);
    assert_eq!(status_of(ApiError::Forbidden("x".into())), StatusCode::FORBIDDEN);
    assert_eq!(status_of(ApiError::NotFound("x".into())), StatusCode::NOT_FOUND);
    assert_eq!(
        status_of(ApiError::DomainInvariant("x".into())),
        StatusCode::CONFLICT
    );
    assert_eq!(
        status_of(ApiError::InvalidStateTransition("x".into())),
        StatusCode::CONFLICT
    );
    assert_eq!(status_of(ApiError::Duplicate("x".into())), StatusCode::CONFLICT);
    assert_eq!(
        status_of(ApiError::TransferFailed("x".into())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        status_of(ApiError::Compensation("x".into())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        status_of(ApiError::DatabaseConnection("x".into())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        status_of(ApiError::Internal("x".into())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn missing_row_maps_to_not_found() {
    assert_eq!(
        status_of(ApiError::Database(diesel::result::Error::NotFound)),
        StatusCode::NOT_FOUND
    );
}

#[test]
fn unique_violation_converts_to_duplicate() {
    let err = diesel::result::Error::DatabaseError(
        diesel::result::DatabaseErrorKind::UniqueViolation,
        Box::new("duplicate key value violates unique constraint".to_string()),
    );
    assert!(matches!(ApiError::from(err), ApiError::Duplicate(_)));

    let err = diesel::result::Error::DatabaseError(
        diesel::result::DatabaseErrorKind::ForeignKeyViolation,
        Box::new("violates foreign key constraint".to_string()),
    );
    assert!(matches!(ApiError::from(err), ApiError::Database(_)));
}

#[test]
fn messages_do_not_leak_internals() {
    let (_, body) = <(StatusCode, String)>::from(ApiError::Database(
        diesel::result::Error::NotFound,
    ));
    assert_eq!(body, "Record not found");

    let (_, body) = <(StatusCode, String)>::from(ApiError::InsufficientBalance);
    assert_eq!(body, "Insufficient balance");
}
