//! Demo fixtures

use crate::domain::{CloudProvider, ComplianceStatus, NotificationKind, PolicySeverity};
use crate::operations::accounts::NewCloudAccount;
use crate::operations::notifications::NewNotification;
use crate::operations::policies::NewPolicy;
use chrono::{Duration, NaiveDate};

pub(super) struct DemoPolicy {
	pub provider: CloudProvider,
	pub control_id: &'static str,
	pub name: &'static str,
	pub category: &'static str,
	pub severity: PolicySeverity,
	pub description: &'static str,
	pub policy_type: &'static str,
	pub scope_level: &'static str,
	pub scope_name: &'static str,
	pub scope_id: &'static str,
	pub compliance_status: ComplianceStatus,
	pub affected_resources: i32,
	pub reviewed_days_ago: i64,
	pub document: &'static str,
	pub tags: &'static str,
}

impl DemoPolicy {
	pub fn to_input(&self, today: NaiveDate) -> NewPolicy {
		let mut input = NewPolicy::new(self.provider, self.control_id, self.name, self.category)
			.with_severity(self.severity);
		input.description = Some(self.description.to_string());
		input.policy_type = Some(self.policy_type.to_string());
		input.scope_level = Some(self.scope_level.to_string());
		input.scope_name = Some(self.scope_name.to_string());
		input.scope_id = Some(self.scope_id.to_string());
		input.compliance_status = self.compliance_status;
		input.affected_resources = self.affected_resources;
		input.last_reviewed = Some(today - Duration::days(self.reviewed_days_ago));
		input.policy_content = Some(self.document.to_string());
		input.tags = Some(self.tags.to_string());
		input
	}
}

pub(super) struct DemoAccount {
	pub provider: CloudProvider,
	pub external_id: &'static str,
	pub display_name: &'static str,
	pub access_method: &'static str,
}

impl DemoAccount {
	pub fn to_input(&self, owner_id: i32) -> NewCloudAccount {
		let mut input = NewCloudAccount::new(self.provider, self.external_id, self.display_name)
			.owned_by(owner_id);
		input.status = crate::domain::AccountStatus::Connected;
		input.access_method = Some(self.access_method.to_string());
		input
	}
}

/// (control id, account external id, status, resource, findings)
pub(super) type DemoEvaluation = (
	&'static str,
	&'static str,
	ComplianceStatus,
	&'static str,
	Option<&'static str>,
);

pub(super) const ACCOUNTS: [DemoAccount; 3] = [
	DemoAccount {
		provider: CloudProvider::Aws,
		external_id: "123456789012",
		display_name: "Production AWS",
		access_method: "IAM Role",
	},
	DemoAccount {
		provider: CloudProvider::Azure,
		external_id: "a1b2c3d4-e5f6-7890-abcd-ef1234567890",
		display_name: "Production Azure",
		access_method: "Service Principal",
	},
	DemoAccount {
		provider: CloudProvider::Gcp,
		external_id: "cloudguard-prod-12345",
		display_name: "Production GCP",
		access_method: "Service Account",
	},
];

pub(super) const POLICIES: [DemoPolicy; 7] = [
	DemoPolicy {
		provider: CloudProvider::Aws,
		control_id: "CIS-AWS-2.1.5",
		name: "Prevent Public S3 Buckets",
		category: "Storage Security",
		severity: PolicySeverity::High,
		description: "Prevents S3 buckets from being made publicly accessible. This SCP denies the ability to change bucket public access settings.",
		policy_type: "SCP (Service Control Policy)",
		scope_level: "Organizational Unit",
		scope_name: "Production OU",
		scope_id: "ou-prod-12345678",
		compliance_status: ComplianceStatus::NonCompliant,
		affected_resources: 12,
		reviewed_days_ago: 5,
		document: include_str!("documents/aws_s3_public_access.json"),
		tags: "s3,security,public-access,storage",
	},
	DemoPolicy {
		provider: CloudProvider::Aws,
		control_id: "CIS-AWS-1.2",
		name: "Require MFA for Console Access",
		category: "Identity & Access",
		severity: PolicySeverity::Critical,
		description: "Enforces Multi-Factor Authentication (MFA) for all AWS console access. Denies all actions except MFA setup if MFA is not present.",
		policy_type: "SCP (Service Control Policy)",
		scope_level: "Root",
		scope_name: "Organization Root",
		scope_id: "r-root",
		compliance_status: ComplianceStatus::Compliant,
		affected_resources: 0,
		reviewed_days_ago: 2,
		document: include_str!("documents/aws_require_mfa.json"),
		tags: "mfa,iam,security,authentication",
	},
	DemoPolicy {
		provider: CloudProvider::Aws,
		control_id: "CIS-AWS-2.1.1",
		name: "Enforce S3 Encryption at Rest",
		category: "Data Protection",
		severity: PolicySeverity::High,
		description: "Requires all S3 objects to be encrypted at rest using AES256 or AWS KMS. Denies unencrypted uploads.",
		policy_type: "SCP (Service Control Policy)",
		scope_level: "Account",
		scope_name: "Production Account",
		scope_id: "123456789012",
		compliance_status: ComplianceStatus::NonCompliant,
		affected_resources: 8,
		reviewed_days_ago: 7,
		document: include_str!("documents/aws_s3_encryption.json"),
		tags: "encryption,s3,data-protection,compliance",
	},
	DemoPolicy {
		provider: CloudProvider::Azure,
		control_id: "CIS-AZURE-6.1",
		name: "Block Public Network Access",
		category: "Network Security",
		severity: PolicySeverity::Critical,
		description: "Prevents creation of NSG rules that allow inbound traffic from any source (*). Enforces network segmentation.",
		policy_type: "Policy Definition",
		scope_level: "Management Group",
		scope_name: "Production MG",
		scope_id: "mg-prod-azure",
		compliance_status: ComplianceStatus::NonCompliant,
		affected_resources: 5,
		reviewed_days_ago: 3,
		document: include_str!("documents/azure_nsg_inbound.json"),
		tags: "network,nsg,security,firewall",
	},
	DemoPolicy {
		provider: CloudProvider::Azure,
		control_id: "CIS-AZURE-3.1",
		name: "Require HTTPS for Storage Accounts",
		category: "Data Protection",
		severity: PolicySeverity::High,
		description: "Enforces HTTPS-only traffic for Azure Storage Accounts. Denies creation of storage accounts without secure transfer enabled.",
		policy_type: "Policy Definition",
		scope_level: "Subscription",
		scope_name: "Production Subscription",
		scope_id: "sub-12345",
		compliance_status: ComplianceStatus::Compliant,
		affected_resources: 0,
		reviewed_days_ago: 1,
		document: include_str!("documents/azure_storage_https.json"),
		tags: "storage,https,encryption,transport",
	},
	DemoPolicy {
		provider: CloudProvider::Gcp,
		control_id: "CIS-GCP-4.3",
		name: "Require OS Login for VM Access",
		category: "Compute Security",
		severity: PolicySeverity::High,
		description: "Enforces OS Login for all GCE instances. Ensures SSH access is managed through IAM instead of SSH keys.",
		policy_type: "Organization Control",
		scope_level: "Organization",
		scope_name: "CloudGuard Org",
		scope_id: "123456789",
		compliance_status: ComplianceStatus::Compliant,
		affected_resources: 0,
		reviewed_days_ago: 4,
		document: include_str!("documents/gcp_os_login.json"),
		tags: "compute,ssh,iam,access-control",
	},
	DemoPolicy {
		provider: CloudProvider::Gcp,
		control_id: "CIS-GCP-5.1",
		name: "Prevent Public Storage Buckets",
		category: "Storage Security",
		severity: PolicySeverity::Critical,
		description: "Prevents GCS buckets from being made publicly accessible. Enforces public access prevention at the organization level.",
		policy_type: "Organization Control",
		scope_level: "Folder",
		scope_name: "Production Folder",
		scope_id: "folders/123456",
		compliance_status: ComplianceStatus::NonCompliant,
		affected_resources: 3,
		reviewed_days_ago: 6,
		document: include_str!("documents/gcp_gcs_public_access.json"),
		tags: "storage,gcs,public-access,security",
	},
];

pub(super) const EVALUATIONS: [DemoEvaluation; 7] = [
	(
		"CIS-AWS-2.1.5",
		"123456789012",
		ComplianceStatus::NonCompliant,
		"arn:aws:s3:::prod-app-assets",
		Some("Bucket has public read access enabled"),
	),
	(
		"CIS-AWS-1.2",
		"123456789012",
		ComplianceStatus::Compliant,
		"arn:aws:iam::123456789012:root",
		None,
	),
	(
		"CIS-AWS-2.1.1",
		"123456789012",
		ComplianceStatus::NonCompliant,
		"arn:aws:s3:::prod-logs",
		Some("Default encryption not enabled"),
	),
	(
		"CIS-AZURE-6.1",
		"a1b2c3d4-e5f6-7890-abcd-ef1234567890",
		ComplianceStatus::NonCompliant,
		"/subscriptions/sub-12345/resourceGroups/prod-rg/providers/Microsoft.Network/networkSecurityGroups/web-nsg",
		Some("Inbound rule allows traffic from 0.0.0.0/0 on port 22"),
	),
	(
		"CIS-AZURE-3.1",
		"a1b2c3d4-e5f6-7890-abcd-ef1234567890",
		ComplianceStatus::Compliant,
		"/subscriptions/sub-12345/resourceGroups/prod-rg/providers/Microsoft.Storage/storageAccounts/prodstore",
		None,
	),
	(
		"CIS-GCP-4.3",
		"cloudguard-prod-12345",
		ComplianceStatus::Warning,
		"projects/cloudguard-prod-12345/zones/us-central1-a/instances/bastion",
		Some("Instance metadata still allows project-wide SSH keys"),
	),
	(
		"CIS-GCP-5.1",
		"cloudguard-prod-12345",
		ComplianceStatus::NonCompliant,
		"gs://cloudguard-public-data",
		Some("Bucket allows public access via allUsers"),
	),
];

pub(super) fn broadcasts() -> [NewNotification; 2] {
	[
		NewNotification::broadcast(
			"Policy Scan Completed",
			"Successfully scanned 47 resources across 3 cloud accounts",
		)
		.with_kind(NotificationKind::BuildComplete),
		NewNotification::broadcast(
			"Weekly Security Report Ready",
			"Your weekly cloud security summary is now available",
		),
	]
}
