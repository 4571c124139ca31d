//! Cache Payload Types
//!
//! Each named cache domain stores one concrete payload shape, so a domain
//! cache is compile-time-checked against the data it holds instead of
//! carrying untyped blobs.

use serde::{Deserialize, Serialize};

/// A workspace channel as cached by the channels domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Channel id, e.g. "C0123456789"
    pub id: String,
    /// Channel name without the leading '#'
    pub name: String,
    pub is_private: bool,
    /// Member count when the listing included it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_members: Option<u64>,
}

/// The channels-domain payload: one listing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelList {
    pub channels: Vec<ChannelInfo>,
    /// Pages walked to assemble the listing
    pub pages_fetched: usize,
}

/// A workspace member as cached by the users domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User id, e.g. "U0123456789"
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    pub is_bot: bool,
}

/// An uploaded file's metadata as cached by the files domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub id: String,
    pub name: String,
    pub filetype: String,
    /// Size in bytes
    pub size: u64,
}

/// The files-domain payload: one listing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileList {
    pub files: Vec<FileInfo>,
    pub pages_fetched: usize,
}

/// A single message, used in thread and search payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageInfo {
    /// Message timestamp id, e.g. "1700000000.000100"
    pub ts: String,
    pub user: String,
    pub text: String,
    /// Channel the message lives in
    pub channel: String,
    /// Parent timestamp when the message is a threaded reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}

/// The threads-domain payload: replies under one parent message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadReplies {
    /// The thread's parent timestamp
    pub parent_ts: String,
    pub messages: Vec<MessageInfo>,
}

/// The search result payload stored in the search cache's result tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// The normalized query this payload answers
    pub query: String,
    /// Total matches reported upstream (may exceed the returned window)
    pub total: u64,
    pub messages: Vec<MessageInfo>,
}
