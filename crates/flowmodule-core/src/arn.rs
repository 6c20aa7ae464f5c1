//! Amazon Resource Name grammar
//!
//! `arn:<partition>:<service>:<region>:<account-id>:<resource>`
//!
//! The resource segment may itself contain `:` (e.g. Lambda aliases), so only
//! the first five separators are significant.

use std::fmt;
use std::str::FromStr;

use crate::error::ArnError;

const ARN_PREFIX: &str = "arn";
const ARN_DELIMITER: char = ':';
const ARN_SECTIONS: usize = 6;

/// Cheap shape check used to pick rewrite candidates out of a document.
///
/// A string that passes this check but fails [`Arn::parse`] is treated as a
/// malformed ARN rather than ordinary text.
pub fn looks_like_arn(value: &str) -> bool {
    value.starts_with("arn:") && value.matches(ARN_DELIMITER).count() >= ARN_SECTIONS - 1
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account_id: String,
    pub resource: String,
}

impl Arn {
    pub fn parse(value: &str) -> Result<Self, ArnError> {
        let sections: Vec<&str> = value.splitn(ARN_SECTIONS, ARN_DELIMITER).collect();
        if sections.len() != ARN_SECTIONS {
            return Err(ArnError::InvalidSections);
        }
        if sections[0] != ARN_PREFIX {
            return Err(ArnError::InvalidPrefix);
        }
        if sections[1].is_empty() {
            return Err(ArnError::InvalidPartition);
        }
        if sections[2].is_empty() {
            return Err(ArnError::InvalidService);
        }
        if sections[5].is_empty() {
            return Err(ArnError::InvalidResource);
        }

        Ok(Self {
            partition: sections[1].to_string(),
            service: sections[2].to_string(),
            region: sections[3].to_string(),
            account_id: sections[4].to_string(),
            resource: sections[5].to_string(),
        })
    }

    /// Same partition, service and resource, placed in another region/account
    pub fn relocated(&self, region: &str, account_id: &str) -> Self {
        Self {
            region: region.to_string(),
            account_id: account_id.to_string(),
            ..self.clone()
        }
    }
}

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Arn::parse(s)
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}:{}",
            ARN_PREFIX, self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}

/// An Amazon Connect instance, identified from its ARN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectInstance {
    pub partition: String,
    pub region: String,
    pub account_id: String,
    pub instance_id: String,
}

impl ConnectInstance {
    /// Extract the instance id from `arn:<partition>:connect:<region>:<account>:instance/<id>`.
    ///
    /// Returns `None` when the ARN does not name a Connect instance.
    pub fn from_arn(arn: &Arn) -> Option<Self> {
        if arn.service != "connect" {
            return None;
        }
        let (kind, instance_id) = arn.resource.split_once('/')?;
        if kind != "instance" || instance_id.is_empty() || instance_id.contains('/') {
            return None;
        }

        Some(Self {
            partition: arn.partition.clone(),
            region: arn.region.clone(),
            account_id: arn.account_id.clone(),
            instance_id: instance_id.to_string(),
        })
    }

    /// ARN of a prompt registered on this instance, placed in `region`/`account_id`
    pub fn prompt_arn(&self, region: &str, account_id: &str, prompt_id: &str) -> String {
        Arn {
            partition: self.partition.clone(),
            service: "connect".to_string(),
            region: region.to_string(),
            account_id: account_id.to_string(),
            resource: format!("instance/{}/prompt/{}", self.instance_id, prompt_id),
        }
        .to_string()
    }
}
