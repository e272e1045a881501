use async_trait::async_trait;
use aws_sdk_cloudwatch::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudwatch::types::{Datapoint, Dimension, Statistic};
use aws_sdk_ec2::types::Filter;
use chrono::{DateTime, Utc};

use concierge_core::cloud::{
    ComputeSource, CpuDatapoint, IngressRule, Instance, InstanceMetrics, MetricWindow, Result,
    SecurityGroup, Volume,
};

use super::error::ApiCall;
use super::AwsCloud;

#[async_trait]
impl ComputeSource for AwsCloud {
    async fn instances(&self, region: &str, state: Option<&str>) -> Result<Vec<Instance>> {
        let client = self.ec2(region);
        let filters = state.map(|s| {
            vec![Filter::builder()
                .name("instance-state-name")
                .values(s)
                .build()]
        });

        let mut instances = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = ApiCall::new("ec2", "DescribeInstances", Some(region)).finish(
                client
                    .describe_instances()
                    .set_filters(filters.clone())
                    .set_next_token(next_token.take())
                    .send()
                    .await,
            )?;

            for reservation in output.reservations() {
                for instance in reservation.instances() {
                    instances.push(Instance {
                        instance_id: instance.instance_id().unwrap_or_default().to_string(),
                        instance_type: instance
                            .instance_type()
                            .map(|t| t.as_str().to_string())
                            .unwrap_or_default(),
                        state: instance
                            .state()
                            .and_then(|s| s.name())
                            .map(|n| n.as_str().to_string())
                            .unwrap_or_else(|| "unknown".to_string()),
                        launch_time: instance.launch_time().and_then(to_chrono),
                        availability_zone: instance
                            .placement()
                            .and_then(|p| p.availability_zone())
                            .map(str::to_string),
                        vpc_id: instance.vpc_id().map(str::to_string),
                        subnet_id: instance.subnet_id().map(str::to_string),
                        public_ip: instance.public_ip_address().map(str::to_string),
                        private_ip: instance.private_ip_address().map(str::to_string),
                        security_groups: instance
                            .security_groups()
                            .iter()
                            .filter_map(|g| g.group_id().map(str::to_string))
                            .collect(),
                        tags: instance
                            .tags()
                            .iter()
                            .filter_map(|t| Some((t.key()?.to_string(), t.value()?.to_string())))
                            .collect(),
                    });
                }
            }

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(instances)
    }

    async fn security_groups(&self, region: &str) -> Result<Vec<SecurityGroup>> {
        let output = ApiCall::new("ec2", "DescribeSecurityGroups", Some(region))
            .finish(self.ec2(region).describe_security_groups().send().await)?;

        Ok(output
            .security_groups()
            .iter()
            .map(|group| SecurityGroup {
                group_id: group.group_id().unwrap_or_default().to_string(),
                group_name: group.group_name().unwrap_or_default().to_string(),
                vpc_id: group.vpc_id().map(str::to_string),
                ingress: group
                    .ip_permissions()
                    .iter()
                    .map(|permission| IngressRule {
                        protocol: permission.ip_protocol().unwrap_or("-1").to_string(),
                        from_port: permission.from_port(),
                        to_port: permission.to_port(),
                        cidr_ranges: permission
                            .ip_ranges()
                            .iter()
                            .filter_map(|r| r.cidr_ip().map(str::to_string))
                            .collect(),
                    })
                    .collect(),
            })
            .collect())
    }

    async fn volumes(&self, region: &str) -> Result<Vec<Volume>> {
        let output = ApiCall::new("ec2", "DescribeVolumes", Some(region))
            .finish(self.ec2(region).describe_volumes().send().await)?;

        Ok(output
            .volumes()
            .iter()
            .map(|volume| Volume {
                volume_id: volume.volume_id().unwrap_or_default().to_string(),
                encrypted: volume.encrypted().unwrap_or(false),
                kms_key_id: volume.kms_key_id().map(str::to_string),
                size_gib: volume.size(),
                state: volume.state().map(|s| s.as_str().to_string()),
            })
            .collect())
    }

    async fn instance_metrics(
        &self,
        region: &str,
        instance_id: &str,
        window: MetricWindow,
    ) -> Result<InstanceMetrics> {
        let cpu = self
            .metric_statistics(region, instance_id, "CPUUtilization", window, true)
            .await?
            .iter()
            .map(|point| CpuDatapoint {
                average: point.average().unwrap_or(0.0),
                maximum: point.maximum().unwrap_or(0.0),
            })
            .collect();
        let network_in = self
            .metric_statistics(region, instance_id, "NetworkIn", window, false)
            .await?
            .iter()
            .filter_map(Datapoint::average)
            .collect();
        let network_out = self
            .metric_statistics(region, instance_id, "NetworkOut", window, false)
            .await?
            .iter()
            .filter_map(Datapoint::average)
            .collect();

        Ok(InstanceMetrics {
            cpu,
            network_in,
            network_out,
        })
    }
}

impl AwsCloud {
    async fn metric_statistics(
        &self,
        region: &str,
        instance_id: &str,
        metric_name: &str,
        window: MetricWindow,
        with_maximum: bool,
    ) -> Result<Vec<Datapoint>> {
        let mut request = self
            .cloudwatch(region)
            .get_metric_statistics()
            .namespace("AWS/EC2")
            .metric_name(metric_name)
            .dimensions(
                Dimension::builder()
                    .name("InstanceId")
                    .value(instance_id)
                    .build(),
            )
            .start_time(AwsDateTime::from_secs(window.start.timestamp()))
            .end_time(AwsDateTime::from_secs(window.end.timestamp()))
            .period(window.period_seconds)
            .statistics(Statistic::Average);
        if with_maximum {
            request = request.statistics(Statistic::Maximum);
        }

        let mut datapoints = ApiCall::new("cloudwatch", "GetMetricStatistics", Some(region))
            .finish(request.send().await)?
            .datapoints()
            .to_vec();
        datapoints.sort_by_key(|p| p.timestamp().map(|t| t.secs()));
        Ok(datapoints)
    }
}

fn to_chrono(time: &aws_sdk_ec2::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time.secs(), time.subsec_nanos())
}
