//! Aura commands: award, balance, history

use anyhow::Result;
use repbank_business::{AuraService, EconomyContext};

use super::format_time;
use crate::AuraAction;

pub async fn handle(ctx: &EconomyContext, action: AuraAction) -> Result<()> {
    let service = AuraService::new(ctx);

    match action {
        AuraAction::Award {
            user_id,
            amount,
            reason,
            source,
        } => {
            let reason = reason.to_core_type();
            match service
                .award(&user_id, amount, reason, source.as_deref())
                .await?
            {
                Some(entry) => {
                    println!("✅ Aura awarded");
                    println!("   Entry:  {}", entry.id);
                    println!("   User:   {}", entry.user_id);
                    println!("   Amount: +{} ({})", entry.amount, entry.reason);
                }
                None => println!("⚠️  Nothing recorded (amount must be positive)"),
            }
            println!("   Total:  {}", service.get_points(&user_id).await?);
        }

        AuraAction::Balance { user_id } => {
            let points = service.get_points(&user_id).await?;
            println!("✨ Aura for {}: {}", user_id, points);
        }

        AuraAction::History {
            user_id,
            limit,
            offset,
        } => {
            let entries = service.get_history(&user_id, limit, offset).await?;
            println!("📜 Aura history for {} ({} entries)", user_id, entries.len());
            for entry in entries {
                println!(
                    "   {}  {:>+6}  {:<22} {}",
                    format_time(entry.created_at),
                    entry.amount,
                    entry.reason,
                    entry.source_id.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}
