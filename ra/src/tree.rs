//! Conversation message tree
//!
//! Messages form an append-only tree: content is immutable once created,
//! branches are never deleted, and a movable *head* pointer marks the leaf
//! whose root-to-head path is the context for the next model call.
//! Backtracking moves the head to an ancestor and marks the abandoned
//! branch superseded, so trajectories keep a full audit trail of every
//! path the agent explored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Identifier of a message within one tree (index order = creation order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub usize);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    /// Standing guidance injected at run start and on backtrack
    Instructor,
    Assistant,
    /// Result of executing a tool call, fed back to the model
    #[serde(rename = "tool-observation")]
    Observation,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::System => "system",
            Role::User => "user",
            Role::Instructor => "instructor",
            Role::Assistant => "assistant",
            Role::Observation => "tool-observation",
        };
        f.write_str(s)
    }
}

/// Tool call extracted from an assistant message, kept for the trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub name: String,
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

/// A single message in the conversation tree
///
/// `content` and `tool_call` never change after creation. `children` and
/// `superseded` are structural audit metadata maintained by the tree.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCallRecord>,
    pub parent: Option<MessageId>,
    pub children: Vec<MessageId>,
    /// Loop step during which this message was created (0 for seed messages)
    pub step: u32,
    pub timestamp: DateTime<Utc>,
    /// True once a backtrack abandoned the branch containing this message
    pub superseded: bool,
}

/// Errors from tree operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("unknown parent message: {0}")]
    UnknownParent(MessageId),

    #[error("unknown message: {0}")]
    UnknownMessage(MessageId),

    #[error("tree already has a root")]
    RootExists,
}

/// Append-only message tree with a movable head
#[derive(Debug, Default)]
pub struct ConversationTree {
    messages: Vec<Message>,
    head: Option<MessageId>,
}

impl ConversationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message under `parent` and move the head to it
    ///
    /// `parent` may be `None` only for the first (root) message. Fails with
    /// [`TreeError::UnknownParent`] if the parent is not in the tree.
    pub fn append(
        &mut self,
        parent: Option<MessageId>,
        role: Role,
        content: impl Into<String>,
        tool_call: Option<ToolCallRecord>,
        step: u32,
    ) -> Result<MessageId, TreeError> {
        match parent {
            None if !self.messages.is_empty() => return Err(TreeError::RootExists),
            Some(p) if p.0 >= self.messages.len() => return Err(TreeError::UnknownParent(p)),
            _ => {}
        }
        Ok(self.insert(parent, role, content.into(), tool_call, step))
    }

    /// Append a message under the current head and move the head to it
    ///
    /// On an empty tree this creates the root.
    pub fn push(
        &mut self,
        role: Role,
        content: impl Into<String>,
        tool_call: Option<ToolCallRecord>,
        step: u32,
    ) -> MessageId {
        let parent = self.head;
        self.insert(parent, role, content.into(), tool_call, step)
    }

    fn insert(
        &mut self,
        parent: Option<MessageId>,
        role: Role,
        content: String,
        tool_call: Option<ToolCallRecord>,
        step: u32,
    ) -> MessageId {
        let id = MessageId(self.messages.len());
        debug!(%id, %role, ?parent, step, "tree: appending message");
        self.messages.push(Message {
            id,
            role,
            content,
            tool_call,
            parent,
            children: Vec::new(),
            step,
            timestamp: Utc::now(),
            superseded: false,
        });
        if let Some(p) = parent {
            self.messages[p.0].children.push(id);
        }
        self.head = Some(id);
        id
    }

    /// Current head (the leaf used to build the next prompt)
    pub fn head(&self) -> Option<MessageId> {
        self.head
    }

    /// Root message id, if the tree is non-empty
    pub fn root(&self) -> Option<MessageId> {
        self.messages.first().map(|m| m.id)
    }

    /// Move the head to an existing message (backtracking)
    ///
    /// Nodes on the old head path that are not on the new head path - and
    /// everything below them - are marked superseded. Moving the head to a
    /// descendant of itself supersedes nothing, so repeated calls with the
    /// same target leave the tree shape unchanged.
    pub fn set_head(&mut self, id: MessageId) -> Result<(), TreeError> {
        if id.0 >= self.messages.len() {
            return Err(TreeError::UnknownMessage(id));
        }

        let old_path = self.head.map(|h| self.path_ids(h)).unwrap_or_default();
        let new_path: std::collections::HashSet<MessageId> = self.path_ids(id).into_iter().collect();

        for abandoned in old_path.into_iter().filter(|n| !new_path.contains(n)) {
            self.supersede_subtree(abandoned);
        }

        debug!(%id, "tree: head moved");
        self.head = Some(id);
        Ok(())
    }

    fn supersede_subtree(&mut self, id: MessageId) {
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            if !self.messages[node.0].superseded {
                self.messages[node.0].superseded = true;
                stack.extend(self.messages[node.0].children.iter().copied());
            }
        }
    }

    /// Ordered messages from the root to `id`
    pub fn path(&self, id: MessageId) -> Result<Vec<&Message>, TreeError> {
        if id.0 >= self.messages.len() {
            return Err(TreeError::UnknownMessage(id));
        }
        Ok(self.path_ids(id).into_iter().map(|i| &self.messages[i.0]).collect())
    }

    /// Ordered messages from the root to the current head (empty if no head)
    pub fn head_path(&self) -> Vec<&Message> {
        match self.head {
            Some(h) => self.path_ids(h).into_iter().map(|i| &self.messages[i.0]).collect(),
            None => Vec::new(),
        }
    }

    fn path_ids(&self, id: MessageId) -> Vec<MessageId> {
        let mut ids = Vec::new();
        let mut cursor = Some(id);
        while let Some(c) = cursor {
            ids.push(c);
            cursor = self.messages[c.0].parent;
        }
        ids.reverse();
        ids
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.get(id.0)
    }

    pub fn contains(&self, id: MessageId) -> bool {
        id.0 < self.messages.len()
    }

    /// All messages in creation order, including superseded branches
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
