use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
	Open,
	Pending,
	InProgress,
	Resolved,
	Closed,
}
impl TicketStatus {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"open" => Some(Self::Open),
			"pending" => Some(Self::Pending),
			"in_progress" => Some(Self::InProgress),
			"resolved" => Some(Self::Resolved),
			"closed" => Some(Self::Closed),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Open => "open",
			Self::Pending => "pending",
			Self::InProgress => "in_progress",
			Self::Resolved => "resolved",
			Self::Closed => "closed",
		}
	}

	/// Resolved and closed tickets are the ones eligible for feedback
	/// requests and knowledge-base generation.
	pub fn is_settled(&self) -> bool {
		matches!(self, Self::Resolved | Self::Closed)
	}

	/// A closed ticket only ever reopens to `open`; everything else moves
	/// freely.
	pub fn can_transition(self, next: Self) -> bool {
		match self {
			Self::Closed => matches!(next, Self::Open),
			_ => true,
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
	Low,
	Normal,
	High,
	Urgent,
}
impl TicketPriority {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"low" => Some(Self::Low),
			"normal" => Some(Self::Normal),
			"high" => Some(Self::High),
			"urgent" => Some(Self::Urgent),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Low => "low",
			Self::Normal => "normal",
			Self::High => "high",
			Self::Urgent => "urgent",
		}
	}
}
