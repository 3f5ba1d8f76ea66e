use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
	pub text: String,
	pub author: String,
	pub is_self: bool,
	pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeProgress {
	Typing,
	/// Last character revealed, message appended to the session
	Sent,
}

#[derive(Debug, Clone)]
struct Draft {
	message: ChatMessage,
	revealed: usize,
	total: usize,
}

/// Chat session: append-only until the next `open`, which starts afresh.
#[derive(Debug, Clone, Default)]
pub struct ChatChannel {
	title: Option<String>,
	messages: Vec<ChatMessage>,
	draft: Option<Draft>,
}

impl ChatChannel {
	pub fn is_open(&self) -> bool {
		self.title.is_some()
	}

	pub fn title(&self) -> Option<&str> {
		self.title.as_deref()
	}

	pub fn messages(&self) -> &[ChatMessage] {
		&self.messages
	}

	pub const fn is_typing(&self) -> bool {
		self.draft.is_some()
	}

	/// Characters revealed so far of the message being typed
	pub fn draft_preview(&self) -> Option<String> {
		self.draft.as_ref().map(|d| d.message.text.chars().take(d.revealed).collect())
	}

	pub fn view(&self) -> ChatView {
		ChatView {
			title: self.title.clone(),
			messages: self.messages.clone(),
			typing: self.is_typing(),
			draft: self.draft_preview(),
		}
	}

	pub(crate) fn open(&mut self, title: impl Into<String>) {
		self.title = Some(title.into());
		self.messages.clear();
		self.draft = None;
	}

	pub(crate) fn close(&mut self) {
		self.title = None;
		self.messages.clear();
		self.draft = None;
	}

	pub(crate) fn append(&mut self, message: ChatMessage) {
		self.messages.push(message);
	}

	/// Start revealing `message`; an empty text is sent immediately
	pub(crate) fn begin_typing(&mut self, message: ChatMessage) -> TypeProgress {
		let total = message.text.chars().count();
		if total == 0 {
			self.append(message);
			return TypeProgress::Sent;
		}
		self.draft = Some(Draft { message, revealed: 0, total });
		TypeProgress::Typing
	}

	/// Reveal one more character
	pub(crate) fn type_next(&mut self) -> TypeProgress {
		let Some(draft) = self.draft.as_mut() else {
			return TypeProgress::Sent;
		};

		draft.revealed += 1;
		if draft.revealed < draft.total {
			return TypeProgress::Typing;
		}

		if let Some(draft) = self.draft.take() {
			self.messages.push(draft.message);
		}
		TypeProgress::Sent
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatView {
	pub title: Option<String>,
	pub messages: Vec<ChatMessage>,
	pub typing: bool,
	pub draft: Option<String>,
}
