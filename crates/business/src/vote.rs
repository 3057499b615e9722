//! Vote Engine - UP/DOWN/NONE votes trên posts và comments
//!
//! Transaction: lock target, đọc vote hiện tại, ghi vote mới, cập nhật
//! counters. Aura cho author được ghi sau commit; lỗi Aura chỉ được log.

use crate::aura::AuraService;
use crate::context::EconomyContext;
use crate::error::{BusinessError, BusinessResult};
use repbank_core::{AuraReason, TargetKind, VoteTransition, VoteType};
use repbank_persistence::VoteRepo;
use serde::Serialize;
use tracing::{debug, warn};

/// Kết quả một lần vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteOutcome {
    pub kind: TargetKind,
    pub target_id: String,
    pub voter_id: String,
    pub author_id: String,
    pub transition: VoteTransition,
    /// Voter là author: vote được ghi, không có Aura
    pub self_vote: bool,
    /// Aura delta đã được ghi vào ledger
    pub aura_applied: bool,
}

impl VoteOutcome {
    /// Trạng thái vote sau lần gọi này
    pub fn state(&self) -> Option<VoteType> {
        self.transition.next
    }
}

fn aura_reason(kind: TargetKind) -> AuraReason {
    match kind {
        TargetKind::Post => AuraReason::PostVote,
        TargetKind::Comment => AuraReason::CommentVote,
    }
}

/// Vote Engine
pub struct VoteEngine<'a> {
    ctx: &'a EconomyContext,
}

impl<'a> VoteEngine<'a> {
    pub fn new(ctx: &'a EconomyContext) -> Self {
        Self { ctx }
    }

    /// Áp dụng vote input (`None` = xóa vote).
    ///
    /// Input trùng với vote hiện tại sẽ toggle về NONE.
    pub async fn vote(
        &self,
        kind: TargetKind,
        target_id: &str,
        voter_id: &str,
        input: Option<VoteType>,
    ) -> BusinessResult<VoteOutcome> {
        let points = self.ctx.config().points_for(kind);

        let mut tx = self.ctx.pool().begin().await?;

        if !VoteRepo::lock_target(&mut *tx, kind, target_id).await? {
            return Err(BusinessError::TargetNotFound {
                kind,
                id: target_id.to_string(),
            });
        }
        let author_id = VoteRepo::target_author(&mut *tx, kind, target_id)
            .await?
            .ok_or_else(|| BusinessError::TargetNotFound {
                kind,
                id: target_id.to_string(),
            })?;

        let current = VoteRepo::get(&mut *tx, kind, target_id, voter_id).await?;
        let transition = VoteTransition::resolve(current, input, points);

        if !transition.is_noop() {
            match transition.next {
                Some(vote_type) => {
                    VoteRepo::upsert(&mut *tx, kind, target_id, voter_id, vote_type).await?
                }
                None => VoteRepo::delete(&mut *tx, kind, target_id, voter_id).await?,
            }
            VoteRepo::adjust_counts(
                &mut *tx,
                kind,
                target_id,
                transition.upvotes_delta,
                transition.downvotes_delta,
            )
            .await?;
        }

        tx.commit().await?;

        debug!(
            %kind,
            target_id,
            voter_id,
            previous = ?transition.previous,
            next = ?transition.next,
            "Vote recorded"
        );

        let self_vote = voter_id == author_id;
        let mut aura_applied = false;
        if !self_vote && transition.aura_delta != 0 {
            match AuraService::new(self.ctx)
                .apply_delta(&author_id, transition.aura_delta, aura_reason(kind), Some(target_id))
                .await
            {
                Ok(entry) => aura_applied = entry.is_some(),
                Err(e) => warn!(
                    %kind,
                    target_id,
                    author_id = %author_id,
                    delta = transition.aura_delta,
                    error = %e,
                    "Vote Aura update failed"
                ),
            }
        }

        Ok(VoteOutcome {
            kind,
            target_id: target_id.to_string(),
            voter_id: voter_id.to_string(),
            author_id,
            transition,
            self_vote,
            aura_applied,
        })
    }

    /// Vote hiện tại của user trên target
    pub async fn current_vote(
        &self,
        kind: TargetKind,
        target_id: &str,
        voter_id: &str,
    ) -> BusinessResult<Option<VoteType>> {
        Ok(VoteRepo::get(self.ctx.pool(), kind, target_id, voter_id).await?)
    }
}
