//! Domain value types

pub mod types;

pub use types::{
	parse_field, AccountStatus, CloudProvider, ComplianceStatus, NotificationKind, PolicySeverity,
	SyncFrequency,
};
