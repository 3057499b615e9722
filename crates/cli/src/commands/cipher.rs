//! Cipher commands: award, spend, balance, history, audit

use anyhow::{bail, Result};
use repbank_business::{CipherService, EconomyContext};

use super::format_time;
use crate::CipherAction;

pub async fn handle(ctx: &EconomyContext, action: CipherAction) -> Result<()> {
    let service = CipherService::new(ctx);

    match action {
        CipherAction::Award {
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
                    println!("✅ Cipher awarded");
                    println!("   Entry:   {}", entry.id);
                    println!("   Amount:  +{} ({})", entry.amount, entry.reason);
                }
                None => println!("⚠️  Duplicate award ignored (same user, reason and source)"),
            }
            println!("   Balance: {}", service.get_balance(&user_id).await?);
        }

        CipherAction::Spend {
            user_id,
            amount,
            reason,
            source,
        } => {
            let entry = service
                .spend(&user_id, amount, reason.to_core_type(), source.as_deref())
                .await?;
            println!("✅ Cipher spent");
            println!("   Entry:   {}", entry.id);
            println!("   Amount:  {} ({})", entry.amount, entry.reason);
            println!("   Balance: {}", service.get_balance(&user_id).await?);
        }

        CipherAction::Balance { user_id } => {
            let balance = service.get_balance(&user_id).await?;
            println!("💰 Cipher for {}: {}", user_id, balance);
        }

        CipherAction::History {
            user_id,
            limit,
            offset,
        } => {
            let entries = service.get_history(&user_id, limit, offset).await?;
            println!("📜 Cipher history for {} ({} entries)", user_id, entries.len());
            for entry in entries {
                println!(
                    "   {}  {:>+6}  {:<16} {}",
                    format_time(entry.created_at),
                    entry.amount,
                    entry.reason,
                    entry.source_id.as_deref().unwrap_or("-")
                );
            }
        }

        CipherAction::Audit { user } => {
            let checks = match user {
                Some(user_id) => vec![service.verify_projection(&user_id).await?],
                None => service.audit_all().await?,
            };

            println!("🔍 Cipher projection audit ({} users)", checks.len());
            let mut drift = 0;
            for check in &checks {
                let mark = if check.is_consistent() { "✅" } else { "❌" };
                println!(
                    "   {} {:<20} projected {:>8}  ledger {:>8}",
                    mark, check.user_id, check.projected, check.ledger_sum
                );
                if !check.is_consistent() {
                    drift += 1;
                }
            }

            if drift > 0 {
                bail!("{drift} account(s) out of sync with the ledger");
            }
        }
    }

    Ok(())
}
