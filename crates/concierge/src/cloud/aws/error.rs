//! Maps SDK errors to `CloudError` and records every AWS call in the audit trail.

use std::error::Error;
use std::fmt::Debug;

use aws_sdk_sts::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use concierge_core::audit::AuditEvent;
use concierge_core::cloud::CloudError;

use crate::audit;

/// Identifies one AWS API call for errors and audit records.
#[derive(Debug, Clone, Copy)]
pub(super) struct ApiCall<'a> {
    pub service: &'a str,
    pub operation: &'a str,
    pub region: Option<&'a str>,
}

impl<'a> ApiCall<'a> {
    pub fn new(service: &'a str, operation: &'a str, region: Option<&'a str>) -> Self {
        Self {
            service,
            operation,
            region,
        }
    }

    /// Audits the outcome and converts the SDK error.
    pub fn finish<T, E, R>(self, result: Result<T, SdkError<E, R>>) -> Result<T, CloudError>
    where
        E: ProvideErrorMetadata + Error + Send + Sync + 'static,
        R: Debug + Send + Sync + 'static,
    {
        match result {
            Ok(output) => {
                audit::record(
                    None,
                    AuditEvent::aws_api_call(self.service, self.operation, self.region, None),
                );
                Ok(output)
            }
            Err(err) => {
                let mapped = map_sdk_error(self.service, &err);
                tracing::warn!(
                    service = self.service,
                    operation = self.operation,
                    region = self.region.unwrap_or("-"),
                    code = mapped.code(),
                    error = %DisplayErrorContext(&err),
                    "AWS call failed"
                );
                audit::record(
                    None,
                    AuditEvent::aws_api_call(
                        self.service,
                        self.operation,
                        self.region,
                        Some(mapped.code()),
                    ),
                );
                Err(mapped)
            }
        }
    }
}

/// Requests that never got a response are connection errors; everything else
/// is classified by its AWS error code.
pub(super) fn map_sdk_error<E, R>(service: &str, err: &SdkError<E, R>) -> CloudError
where
    E: ProvideErrorMetadata + Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => CloudError::Connection {
            service: service.to_string(),
            message: DisplayErrorContext(err).to_string(),
        },
        _ => {
            let code = err.code().unwrap_or("Unknown");
            let message = err
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| DisplayErrorContext(err).to_string());
            CloudError::from_code(service, code, &message)
        }
    }
}
