use thiserror::Error;

/// Errors returned by cloud provider calls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CloudError {
    #[error("Access denied calling {service}: {message}")]
    AccessDenied { service: String, message: String },
    #[error("Request to {service} was throttled")]
    Throttling { service: String },
    #[error("{service} is temporarily unavailable")]
    ServiceUnavailable { service: String },
    #[error("{service} returned an internal error")]
    Internal { service: String },
    #[error("Invalid parameter for {service}: {message}")]
    InvalidParameter { service: String, message: String },
    #[error("{resource_type} not found: {id}")]
    NotFound { resource_type: String, id: String },
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),
    #[error("Connection to {service} failed: {message}")]
    Connection { service: String, message: String },
    #[error("{service} error {code}: {message}")]
    Service {
        service: String,
        code: String,
        message: String,
    },
    #[error("{0} is not configured")]
    NotConfigured(String),
}

impl CloudError {
    /// Builds an error from an AWS error code and message.
    ///
    /// Codes differ between services for the same condition, so several
    /// spellings collapse into one variant. Unknown codes are kept verbatim.
    pub fn from_code(service: &str, code: &str, message: &str) -> Self {
        let service = service.to_string();
        let message = message.to_string();
        match code {
            "AccessDenied" | "AccessDeniedException" | "UnauthorizedOperation"
            | "UnauthorizedException" => CloudError::AccessDenied { service, message },
            "Throttling" | "ThrottlingException" | "RequestLimitExceeded"
            | "TooManyRequestsException" | "LimitExceededException" => {
                CloudError::Throttling { service }
            }
            "ServiceUnavailable" | "ServiceUnavailableException" => {
                CloudError::ServiceUnavailable { service }
            }
            "InternalError" | "InternalFailure" | "InternalServerException"
            | "InternalServerError" => CloudError::Internal { service },
            "InvalidParameterValue"
            | "InvalidParameterException"
            | "InvalidParameterCombination"
            | "ValidationException"
            | "ValidationError" => CloudError::InvalidParameter { service, message },
            "ResourceNotFoundException" | "NoSuchBucket" | "DBInstanceNotFound"
            | "DBInstanceNotFoundFault" => CloudError::NotFound {
                resource_type: service,
                id: message,
            },
            "DataUnavailableException" => CloudError::DataUnavailable(message),
            _ => CloudError::Service {
                service,
                code: code.to_string(),
                message,
            },
        }
    }

    /// The AWS-style error code for this error.
    pub fn code(&self) -> &str {
        match self {
            CloudError::AccessDenied { .. } => "AccessDenied",
            CloudError::Throttling { .. } => "Throttling",
            CloudError::ServiceUnavailable { .. } => "ServiceUnavailable",
            CloudError::Internal { .. } => "InternalError",
            CloudError::InvalidParameter { .. } => "InvalidParameterValue",
            CloudError::NotFound { .. } => "ResourceNotFound",
            CloudError::DataUnavailable(_) => "DataUnavailable",
            CloudError::Connection { .. } => "ConnectionError",
            CloudError::Service { code, .. } => code,
            CloudError::NotConfigured(_) => "NotConfigured",
        }
    }

    /// The service the failing call was made against, when known.
    pub fn service(&self) -> Option<&str> {
        match self {
            CloudError::AccessDenied { service, .. }
            | CloudError::Throttling { service }
            | CloudError::ServiceUnavailable { service }
            | CloudError::Internal { service }
            | CloudError::InvalidParameter { service, .. }
            | CloudError::Connection { service, .. }
            | CloudError::Service { service, .. } => Some(service),
            CloudError::NotFound { .. }
            | CloudError::DataUnavailable(_)
            | CloudError::NotConfigured(_) => None,
        }
    }
}

/// Result type for provider calls.
pub type Result<T> = std::result::Result<T, CloudError>;
