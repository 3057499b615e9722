//! # Vote Module
//!
//! Tri-state vote (NONE / UP / DOWN) cho mỗi cặp (target, voter).
//! Mọi tổ hợp (state hiện tại, input) đều có state kết quả xác định,
//! nên state machine không có nhánh lỗi.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Loại nội dung có thể vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Post,
    Comment,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Post => "post",
            TargetKind::Comment => "comment",
        }
    }
}

impl FromStr for TargetKind {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_lowercase().as_str() {
            "post" => Ok(TargetKind::Post),
            "comment" => Ok(TargetKind::Comment),
            _ => Err(CoreError::unknown("vote target", s)),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hướng vote. Không có row nghĩa là "chưa vote".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoteType {
    Up,
    Down,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteType::Up => "UP",
            VoteType::Down => "DOWN",
        }
    }
}

impl FromStr for VoteType {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_uppercase().as_str() {
            "UP" => Ok(VoteType::Up),
            "DOWN" => Ok(VoteType::Down),
            _ => Err(CoreError::unknown("vote type", s)),
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Điểm Aura mà author nhận được cho mỗi hướng vote.
///
/// `down` là giá trị âm (ví dụ -2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotePoints {
    pub up: i64,
    pub down: i64,
}

impl VotePoints {
    pub const POST: VotePoints = VotePoints { up: 5, down: -2 };
    pub const COMMENT: VotePoints = VotePoints { up: 3, down: -1 };

    pub fn for_kind(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Post => Self::POST,
            TargetKind::Comment => Self::COMMENT,
        }
    }

    /// Giá trị của một state; NONE = 0
    pub fn value(&self, state: Option<VoteType>) -> i64 {
        match state {
            Some(VoteType::Up) => self.up,
            Some(VoteType::Down) => self.down,
            None => 0,
        }
    }
}

/// Result of applying one vote input to the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTransition {
    pub previous: Option<VoteType>,
    pub next: Option<VoteType>,
    /// Net Aura change for the target's author
    pub aura_delta: i64,
    pub upvotes_delta: i64,
    pub downvotes_delta: i64,
}

impl VoteTransition {
    /// Resolve `input` against `current`.
    ///
    /// - `None` input clears the vote.
    /// - Input equal to the current state toggles it off.
    /// - Any other input becomes the new state.
    pub fn resolve(
        current: Option<VoteType>,
        input: Option<VoteType>,
        points: VotePoints,
    ) -> Self {
        let next = match (current, input) {
            (_, None) => None,
            (Some(cur), Some(inp)) if cur == inp => None,
            (_, Some(inp)) => Some(inp),
        };

        let count = |state: Option<VoteType>, side: VoteType| i64::from(state == Some(side));

        Self {
            previous: current,
            next,
            aura_delta: points.value(next) - points.value(current),
            upvotes_delta: count(next, VoteType::Up) - count(current, VoteType::Up),
            downvotes_delta: count(next, VoteType::Down) - count(current, VoteType::Down),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.previous == self.next
    }

    pub fn is_toggle_off(&self) -> bool {
        self.previous.is_some() && self.next.is_none()
    }
}
