use async_trait::async_trait;

use concierge_core::cloud::{AttachedPolicy, CallerIdentity, IamUser, IdentitySource, Result};

use super::error::ApiCall;
use super::AwsCloud;

#[async_trait]
impl IdentitySource for AwsCloud {
    async fn users(&self) -> Result<Vec<IamUser>> {
        let mut names = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let output = ApiCall::new("iam", "ListUsers", None)
                .finish(self.iam.list_users().set_marker(marker.take()).send().await)?;
            names.extend(output.users().iter().map(|u| u.user_name().to_string()));

            match output.marker() {
                Some(next) if output.is_truncated() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        let mut users = Vec::with_capacity(names.len());
        for user_name in names {
            let output = ApiCall::new("iam", "ListAttachedUserPolicies", None).finish(
                self.iam
                    .list_attached_user_policies()
                    .user_name(&user_name)
                    .send()
                    .await,
            )?;
            let attached_policies = output
                .attached_policies()
                .iter()
                .map(|p| AttachedPolicy {
                    name: p.policy_name().unwrap_or_default().to_string(),
                    arn: p.policy_arn().unwrap_or_default().to_string(),
                })
                .collect();

            users.push(IamUser {
                user_name,
                attached_policies,
            });
        }

        Ok(users)
    }

    async fn caller_identity(&self) -> Result<CallerIdentity> {
        let output = ApiCall::new("sts", "GetCallerIdentity", self.home_region())
            .finish(self.sts.get_caller_identity().send().await)?;

        Ok(CallerIdentity {
            account: output.account().unwrap_or_default().to_string(),
            arn: output.arn().unwrap_or_default().to_string(),
        })
    }
}
