//! Vote command

use anyhow::Result;
use repbank_business::{EconomyContext, VoteEngine};

use crate::{TargetKindArg, VoteArg};

pub async fn cast(
    ctx: &EconomyContext,
    kind: TargetKindArg,
    target_id: &str,
    voter_id: &str,
    direction: VoteArg,
) -> Result<()> {
    let outcome = VoteEngine::new(ctx)
        .vote(kind.to_core_type(), target_id, voter_id, direction.to_core_type())
        .await?;

    let state = |v: Option<repbank_core::VoteType>| v.map_or("NONE", |v| v.as_str());

    println!("🗳️  Vote on {} {}", outcome.kind, outcome.target_id);
    println!(
        "   {} -> {}",
        state(outcome.transition.previous),
        state(outcome.transition.next)
    );
    if outcome.self_vote {
        println!("   Self-vote: no Aura change");
    } else if outcome.aura_applied {
        println!(
            "   Aura {:+} to {}",
            outcome.transition.aura_delta, outcome.author_id
        );
    } else if outcome.transition.aura_delta != 0 {
        println!("   ⚠️  Aura update for {} failed (see log)", outcome.author_id);
    }

    Ok(())
}
