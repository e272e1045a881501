//! Maps AWS SDK errors to `RepositoryError`.
//!
//! Requests that never reached DynamoDB become `ConnectionFailed`. Everything
//! the service rejects becomes `QueryFailed`, except a failed put condition,
//! which means the key is already taken.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use concierge_core::session::RepositoryError;

/// Service-side rejections shared by every session table call.
enum Rejection {
    MissingTable,
    Throttled,
    Internal,
}

impl Rejection {
    fn into_error(self) -> RepositoryError {
        let message = match self {
            Rejection::MissingTable => "sessions table does not exist",
            Rejection::Throttled => "DynamoDB is throttling requests, retry shortly",
            Rejection::Internal => "DynamoDB internal error",
        };
        RepositoryError::QueryFailed(message.to_string())
    }
}

pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> RepositoryError {
    if let Some(failed) = unreachable_table(&err) {
        return failed;
    }
    let rejection = match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => Rejection::MissingTable,
        GetItemError::ProvisionedThroughputExceededException(_)
        | GetItemError::RequestLimitExceeded(_) => Rejection::Throttled,
        GetItemError::InternalServerError(_) => Rejection::Internal,
        other => return RepositoryError::QueryFailed(format!("get session: {other:?}")),
    };
    rejection.into_error()
}

pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> RepositoryError {
    if let Some(failed) = unreachable_table(&err) {
        return failed;
    }
    let rejection = match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => Rejection::MissingTable,
        QueryError::ProvisionedThroughputExceededException(_)
        | QueryError::RequestLimitExceeded(_) => Rejection::Throttled,
        QueryError::InternalServerError(_) => Rejection::Internal,
        other => return RepositoryError::QueryFailed(format!("list messages: {other:?}")),
    };
    rejection.into_error()
}

pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    if let Some(failed) = unreachable_table(&err) {
        return failed;
    }
    let rejection = match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => {
            return RepositoryError::AlreadyExists {
                entity_type,
                id: id.into(),
            }
        }
        PutItemError::ResourceNotFoundException(_) => Rejection::MissingTable,
        PutItemError::ProvisionedThroughputExceededException(_)
        | PutItemError::RequestLimitExceeded(_)
        | PutItemError::ItemCollectionSizeLimitExceededException(_) => Rejection::Throttled,
        PutItemError::InternalServerError(_) => Rejection::Internal,
        other => {
            return RepositoryError::QueryFailed(format!("write {entity_type}: {other:?}"))
        }
    };
    rejection.into_error()
}

fn unreachable_table<E, R>(err: &SdkError<E, R>) -> Option<RepositoryError> {
    match err {
        SdkError::DispatchFailure(failure) => {
            Some(RepositoryError::ConnectionFailed(format!("{failure:?}")))
        }
        SdkError::TimeoutError(_) => Some(RepositoryError::ConnectionFailed(
            "DynamoDB request timed out".to_string(),
        )),
        _ => None,
    }
}
