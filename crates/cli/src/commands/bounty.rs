//! Question, accept, and unaccept commands

use anyhow::Result;
use repbank_business::{BountyEscrow, EconomyContext, NewQuestion};

use crate::QuestionAction;

pub async fn handle_question(ctx: &EconomyContext, action: QuestionAction) -> Result<()> {
    let escrow = BountyEscrow::new(ctx);

    match action {
        QuestionAction::Create {
            question_id,
            author_id,
            title,
            bounty,
        } => {
            let row = escrow
                .create_question(&author_id, NewQuestion::new(&question_id, &title, bounty))
                .await?;
            println!("✅ Question {} created by {}", row.id, row.author_id);
            if row.bounty_amount > 0 {
                println!("   Bounty: {} Cipher held", row.bounty_amount);
            }
        }

        QuestionAction::Show { question_id } => {
            let state = escrow.bounty_state(&question_id).await?;
            println!("❓ Question {}", question_id);
            println!("   Bounty:   {}", state.bounty_amount);
            println!("   Paid:     {}", state.is_bounty_paid);
            println!(
                "   Accepted: {}",
                state.accepted_answer_id.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}

pub async fn accept(
    ctx: &EconomyContext,
    question_id: &str,
    answer_id: &str,
    actor_id: &str,
) -> Result<()> {
    let outcome = BountyEscrow::new(ctx)
        .accept_answer(question_id, answer_id, actor_id)
        .await?;

    if outcome.already_accepted {
        println!("ℹ️  Answer {} is already accepted", outcome.answer_id);
        return Ok(());
    }

    println!("✅ Answer {} accepted", outcome.answer_id);
    println!("   Answerer: {}", outcome.answer_author);
    println!("   Bounty:   {} Cipher", outcome.payout);
    println!("   Aura:     +{}", outcome.aura_awarded);
    Ok(())
}

pub async fn unaccept(ctx: &EconomyContext, question_id: &str, actor_id: &str) -> Result<()> {
    let state = BountyEscrow::new(ctx)
        .unaccept_answer(question_id, actor_id)
        .await?;
    println!("✅ Accepted answer cleared on {}", question_id);
    println!("   Bounty paid: {} (not refunded)", state.is_bounty_paid);
    Ok(())
}
