//! # Dashboard Roles and Process Kinds
//!
//! A dashboard instance runs under exactly one [`Role`], configured at
//! startup. The role never changes during a session.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The role a dashboard session acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Data provider side of negotiations and transfers.
    Provider,
    /// Data consumer side of negotiations and transfers.
    Consumer,
    /// Business (catalog and policy management) dashboard.
    Business,
    /// Customer dashboard of the business gateway.
    Customer,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 4] = [Role::Provider, Role::Consumer, Role::Business, Role::Customer];

    /// The lower-case configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Consumer => "consumer",
            Self::Business => "business",
            Self::Customer => "customer",
        }
    }

    /// Whether this role takes part in dataspace protocol processes.
    ///
    /// Only providers and consumers drive negotiation and transfer state
    /// machines; the other roles see read-only views.
    pub fn is_protocol_party(&self) -> bool {
        matches!(self, Self::Provider | Self::Consumer)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "provider" => Ok(Self::Provider),
            "consumer" => Ok(Self::Consumer),
            "business" => Ok(Self::Business),
            "customer" => Ok(Self::Customer),
            _ => Err(CoreError::UnknownRole(s.to_string())),
        }
    }
}

/// The kind of process a view renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessKind {
    /// Contract negotiation process.
    ContractNegotiation,
    /// Data transfer process.
    TransferProcess,
    /// Contract agreement produced by a finished negotiation.
    Agreement,
}

impl ProcessKind {
    /// All process kinds.
    pub const ALL: [ProcessKind; 3] = [
        ProcessKind::ContractNegotiation,
        ProcessKind::TransferProcess,
        ProcessKind::Agreement,
    ];

    /// The canonical name, matching the notification category spelling.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContractNegotiation => "ContractNegotiation",
            Self::TransferProcess => "TransferProcess",
            Self::Agreement => "Agreement",
        }
    }
}

impl std::fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProcessKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contractnegotiation" | "contract-negotiation" | "negotiation" | "cn" => {
                Ok(Self::ContractNegotiation)
            }
            "transferprocess" | "transfer-process" | "transfer" | "tp" => {
                Ok(Self::TransferProcess)
            }
            "agreement" => Ok(Self::Agreement),
            _ => Err(CoreError::UnknownProcessKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Provider".parse::<Role>().unwrap(), Role::Provider);
        assert_eq!(" consumer ".parse::<Role>().unwrap(), Role::Consumer);
        assert_eq!("BUSINESS".parse::<Role>().unwrap(), Role::Business);
        assert_eq!("customer".parse::<Role>().unwrap(), Role::Customer);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "admin".parse::<Role>().unwrap_err();
        assert_eq!(err, CoreError::UnknownRole("admin".into()));
    }

    #[test]
    fn role_display_roundtrips() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn only_provider_and_consumer_are_protocol_parties() {
        assert!(Role::Provider.is_protocol_party());
        assert!(Role::Consumer.is_protocol_party());
        assert!(!Role::Business.is_protocol_party());
        assert!(!Role::Customer.is_protocol_party());
    }

    #[test]
    fn process_kind_accepts_short_aliases() {
        assert_eq!(
            "negotiation".parse::<ProcessKind>().unwrap(),
            ProcessKind::ContractNegotiation
        );
        assert_eq!(
            "transfer-process".parse::<ProcessKind>().unwrap(),
            ProcessKind::TransferProcess
        );
        assert_eq!("Agreement".parse::<ProcessKind>().unwrap(), ProcessKind::Agreement);
        assert!("catalog".parse::<ProcessKind>().is_err());
    }
}
