//! Bounty Escrow - Cipher bounties trên questions
//!
//! Bounty bị trừ khỏi asker khi tạo question và trả cho answerer đúng một lần,
//! ở lần accept đầu tiên. Un-accept không hoàn tiền.

use crate::aura::AuraService;
use crate::cipher::CipherService;
use crate::context::EconomyContext;
use crate::error::{BusinessError, BusinessResult};
use repbank_core::{
    AcceptDecision, AuraReason, BountyState, CipherReason, Notification, NotificationKind,
};
use repbank_persistence::{CommentRepo, PostRepo, PostRow, PostType};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

/// Input cho `create_question`
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub id: String,
    pub title: String,
    pub bounty_amount: i64,
}

impl NewQuestion {
    pub fn new(id: &str, title: &str, bounty_amount: i64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            bounty_amount,
        }
    }
}

/// Kết quả accept answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptOutcome {
    pub question_id: String,
    pub answer_id: String,
    pub answer_author: String,
    /// Cipher đã chuyển cho answerer trong lần gọi này
    pub payout: i64,
    /// Aura bonus đã ghi cho answerer trong lần gọi này
    pub aura_awarded: i64,
    /// Answer đã được accept từ trước; không có gì thay đổi
    pub already_accepted: bool,
    pub bounty: BountyState,
}

/// Bounty Escrow service
pub struct BountyEscrow<'a> {
    ctx: &'a EconomyContext,
}

impl<'a> BountyEscrow<'a> {
    pub fn new(ctx: &'a EconomyContext) -> Self {
        Self { ctx }
    }

    /// Tạo question; bounty > 0 được trừ khỏi author trong cùng transaction.
    ///
    /// Không đủ Cipher thì question không được tạo.
    pub async fn create_question(
        &self,
        author_id: &str,
        question: NewQuestion,
    ) -> BusinessResult<PostRow> {
        if question.bounty_amount < 0 {
            return Err(BusinessError::InvalidAmount(format!(
                "Bounty must not be negative: {}",
                question.bounty_amount
            )));
        }

        let row = PostRow::new(&question.id, author_id, PostType::Question, &question.title)
            .with_bounty(question.bounty_amount);

        let mut tx = self.ctx.pool().begin().await?;
        if question.bounty_amount > 0 {
            CipherService::spend_in(
                &mut tx,
                author_id,
                question.bounty_amount,
                CipherReason::BountyCreated,
                Some(&question.id),
            )
            .await?;
        }
        PostRepo::insert(&mut *tx, &row).await?;
        tx.commit().await?;

        info!(
            question_id = %row.id,
            author_id,
            bounty = row.bounty_amount,
            "Question created"
        );
        Ok(row)
    }

    /// Question author chấp nhận một answer (top-level comment của question).
    pub async fn accept_answer(
        &self,
        question_id: &str,
        answer_id: &str,
        actor_id: &str,
    ) -> BusinessResult<AcceptOutcome> {
        let question = self.load_question(question_id, actor_id).await?;

        let answer = CommentRepo::get_by_id(self.ctx.pool(), answer_id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Answer", answer_id))?;
        if answer.post_id != question.id {
            return Err(BusinessError::unauthorized(
                "answer does not belong to this question",
            ));
        }
        if !answer.is_top_level() {
            return Err(BusinessError::unauthorized(
                "only top-level comments can be accepted as answers",
            ));
        }

        let mut tx = self.ctx.pool().begin().await?;
        if !PostRepo::lock(&mut *tx, question_id).await? {
            return Err(BusinessError::not_found("Question", question_id));
        }
        // Re-read under the write lock
        let mut bounty = PostRepo::get_by_id(&mut *tx, question_id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Question", question_id))?
            .bounty();

        let decision = bounty.decide_accept(answer_id, &question.author_id, &answer.author_id);

        if decision.already_accepted {
            tx.commit().await?;
            return Ok(AcceptOutcome {
                question_id: question_id.to_string(),
                answer_id: answer_id.to_string(),
                answer_author: answer.author_id,
                payout: 0,
                aura_awarded: 0,
                already_accepted: true,
                bounty,
            });
        }

        PostRepo::set_accepted_answer(&mut *tx, question_id, Some(answer_id)).await?;

        let mut payout = 0;
        if decision.payout > 0 && PostRepo::mark_bounty_paid(&mut *tx, question_id).await? {
            CipherService::award_in(
                &mut tx,
                &answer.author_id,
                decision.payout,
                CipherReason::AnswerAccepted,
                Some(question_id),
            )
            .await?;
            payout = decision.payout;
        }
        tx.commit().await?;

        bounty.accept(answer_id, AcceptDecision { payout, ..decision });

        let aura_awarded = if decision.rewards_answerer {
            match self.award_accept_bonus(&answer.author_id, answer_id).await {
                Ok(awarded) => awarded,
                Err(e) => {
                    warn!(question_id, answer_id, error = %e, "Answer accepted Aura failed");
                    0
                }
            }
        } else {
            0
        };

        info!(
            question_id,
            answer_id,
            answer_author = %answer.author_id,
            payout,
            aura_awarded,
            "Answer accepted"
        );

        if decision.rewards_answerer {
            self.ctx.notifications().dispatch(
                Notification::new(
                    &answer.author_id,
                    NotificationKind::AnswerAccepted,
                    format!("Your answer to \"{}\" was accepted", question.title),
                )
                .with_action_url(format!("/posts/{question_id}#comment-{answer_id}"))
                .with_data(json!({
                    "question_id": question_id,
                    "answer_id": answer_id,
                    "bounty": payout,
                    "aura": aura_awarded,
                })),
            );
        }

        Ok(AcceptOutcome {
            question_id: question_id.to_string(),
            answer_id: answer_id.to_string(),
            answer_author: answer.author_id,
            payout,
            aura_awarded,
            already_accepted: false,
            bounty,
        })
    }

    /// Bỏ accept. Không hoàn bounty, không thu hồi Aura; cờ paid giữ nguyên.
    pub async fn unaccept_answer(
        &self,
        question_id: &str,
        actor_id: &str,
    ) -> BusinessResult<BountyState> {
        self.load_question(question_id, actor_id).await?;

        let mut tx = self.ctx.pool().begin().await?;
        if !PostRepo::lock(&mut *tx, question_id).await? {
            return Err(BusinessError::not_found("Question", question_id));
        }
        let mut bounty = PostRepo::get_by_id(&mut *tx, question_id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Question", question_id))?
            .bounty();

        PostRepo::set_accepted_answer(&mut *tx, question_id, None).await?;
        tx.commit().await?;
        bounty.unaccept();

        info!(question_id, actor_id, "Answer unaccepted");
        Ok(bounty)
    }

    /// Bounty state hiện tại của question
    pub async fn bounty_state(&self, question_id: &str) -> BusinessResult<BountyState> {
        let question = PostRepo::get_by_id(self.ctx.pool(), question_id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Question", question_id))?;
        Ok(question.bounty())
    }

    /// Aura bonus cho answerer, tối đa một lần cho mỗi answer
    async fn award_accept_bonus(&self, answer_author: &str, answer_id: &str) -> BusinessResult<i64> {
        let bonus = self.ctx.config().answer_accepted_aura;
        if bonus <= 0 {
            return Ok(0);
        }
        let entry = AuraService::new(self.ctx)
            .award_once(answer_author, bonus, AuraReason::AnswerAccepted, answer_id)
            .await?;
        Ok(entry.map_or(0, |e| e.amount))
    }

    /// Load question và kiểm tra actor là author
    async fn load_question(&self, question_id: &str, actor_id: &str) -> BusinessResult<PostRow> {
        let question = PostRepo::get_by_id(self.ctx.pool(), question_id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Question", question_id))?;

        if !question.is_question() {
            return Err(BusinessError::unauthorized("post is not a question"));
        }
        if question.author_id != actor_id {
            return Err(BusinessError::unauthorized(
                "only the question author can accept or unaccept an answer",
            ));
        }
        Ok(question)
    }
}
