//! Event bus for decoupled communication
//!
//! Events are emitted after the command that produced them has committed, so
//! subscribers never observe rolled-back state.

use crate::domain::{CloudProvider, ComplianceStatus, NotificationKind};
use tokio::sync::broadcast;

/// Domain events
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
	/// Core finished opening its database
	CoreStarted,

	AccountCreated {
		id: i32,
		provider: CloudProvider,
		display_name: String,
	},
	AccountUpdated {
		id: i32,
	},
	AccountDeleted {
		id: i32,
		evaluations_removed: u64,
	},
	AccountSyncRequested {
		id: i32,
	},

	PolicyCreated {
		id: i32,
		control_id: String,
	},
	PolicyUpdated {
		id: i32,
	},
	PolicyDeleted {
		id: i32,
		evaluations_removed: u64,
	},

	/// An evaluation was created or its verdict refreshed
	EvaluationRecorded {
		id: i32,
		policy_id: i32,
		account_id: i32,
		status: ComplianceStatus,
	},
	EvaluationDeleted {
		id: i32,
	},

	NotificationCreated {
		id: i32,
		kind: NotificationKind,
	},
	NotificationsRead {
		count: u64,
	},

	UserRegistered {
		id: i32,
	},
	UserDeleted {
		id: i32,
		accounts_removed: u64,
	},

	DemoDataSeeded,
}

/// Event bus for broadcasting events
pub struct EventBus {
	sender: broadcast::Sender<Event>,
}

impl EventBus {
	/// Create a new event bus with specified capacity
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Emit an event
	pub fn emit(&self, event: Event) {
		// Ignore send errors (no receivers)
		let _ = self.sender.send(event);
	}

	/// Subscribe to events
	pub fn subscribe(&self) -> broadcast::Receiver<Event> {
		self.sender.subscribe()
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new(1024)
	}
}
