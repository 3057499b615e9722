//! # Bounty Module
//!
//! Bounty fields gắn trên một question: số Cipher đã escrow lúc tạo,
//! cờ đã trả, và answer đang được chấp nhận.

use serde::{Deserialize, Serialize};

/// Bounty state embedded on a question-type post.
///
/// `is_bounty_paid` only ever moves false -> true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyState {
    pub bounty_amount: i64,
    pub is_bounty_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_answer_id: Option<String>,
}

/// What an accept call has to do, decided from the state before it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptDecision {
    /// The answer is already the accepted one; nothing changes
    pub already_accepted: bool,
    /// Cipher to move to the answer author (0 if none)
    pub payout: i64,
    /// Answer author gets the fixed Aura bonus and a notification
    pub rewards_answerer: bool,
}

impl BountyState {
    pub fn new(bounty_amount: i64) -> Self {
        Self {
            bounty_amount,
            ..Self::default()
        }
    }

    pub fn has_bounty(&self) -> bool {
        self.bounty_amount > 0
    }

    pub fn decide_accept(
        &self,
        answer_id: &str,
        question_author: &str,
        answer_author: &str,
    ) -> AcceptDecision {
        if self.accepted_answer_id.as_deref() == Some(answer_id) {
            return AcceptDecision {
                already_accepted: true,
                payout: 0,
                rewards_answerer: false,
            };
        }

        let self_accept = question_author == answer_author;
        let payout = if self.has_bounty() && !self.is_bounty_paid && !self_accept {
            self.bounty_amount
        } else {
            0
        };

        AcceptDecision {
            already_accepted: false,
            payout,
            rewards_answerer: !self_accept,
        }
    }

    /// Apply a completed accept.
    pub fn accept(&mut self, answer_id: &str, decision: AcceptDecision) {
        self.accepted_answer_id = Some(answer_id.to_string());
        if decision.payout > 0 {
            self.is_bounty_paid = true;
        }
    }

    /// Un-accept chỉ xóa `accepted_answer_id`; Cipher, Aura và cờ paid giữ nguyên.
    pub fn unaccept(&mut self) {
        self.accepted_answer_id = None;
    }
}
