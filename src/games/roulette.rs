//! Roulette settlement
//!
//! Stakes go to the house account. Winnings come out of a coin-flip vault
//! through the cross-game transfer hook, so the house never has to fund a
//! separate roulette bankroll.

use crate::common::types::{AccountId, Amount, AssetType};
use crate::errors::{WagerError, WagerResult};
use crate::events::{GameEvent, RouletteEvent};
use crate::games::odds;
use crate::games::processor::SettlementEngine;
use crate::games::settlement::TransferBatch;
use crate::ledger::{Debit, TransferInstruction};

impl SettlementEngine {
    /// Settle a roulette spin over `chosen_numbers`.
    ///
    /// The payout is fixed before the wheel is drawn. Every number must be on
    /// the wheel; duplicates are accepted and only dilute the payout.
    pub fn play_roulette(
        &self,
        player: &AccountId,
        amount: Amount,
        chosen_numbers: &[u64],
        vault_owner: &AccountId,
        asset: &AssetType,
    ) -> WagerResult<RouletteEvent> {
        let result = self.settle_roulette(player, amount, chosen_numbers, vault_owner, asset);
        self.observe("roulette", result)
    }

    fn settle_roulette(
        &self,
        player: &AccountId,
        amount: Amount,
        chosen_numbers: &[u64],
        vault_owner: &AccountId,
        asset: &AssetType,
    ) -> WagerResult<RouletteEvent> {
        let roulette = &self.config.roulette;
        let chosen = chosen_numbers.len();
        if chosen > roulette.max_choices {
            return Err(WagerError::TooManyChoices {
                count: chosen,
                max: roulette.max_choices,
            });
        }

        if let Some(&number) = chosen_numbers.iter().find(|n| **n >= roulette.wheel_size) {
            return Err(WagerError::NumberOffWheel {
                number,
                wheel_size: roulette.wheel_size,
            });
        }

        let payout = odds::roulette_payout(amount, roulette.payout_numerator, chosen)?;
        if *asset == self.config.primary_asset() && payout > roulette.max_payout {
            return Err(WagerError::PayoutExceedsMaximum {
                payout,
                maximum: roulette.max_payout,
            });
        }

        if !self.vaults.contains(vault_owner) {
            return Err(WagerError::VaultNotFound {
                namespace: self.vaults.namespace(),
                owner: vault_owner.clone(),
            });
        }
        self.ensure_funds(player, asset, amount)?;

        let draw = self.draw(roulette.wheel_size)?;
        let drawn_number = draw.value;
        let is_won = chosen_numbers.iter().any(|number| *number == drawn_number);

        let mut batch = TransferBatch::new();
        batch.stage(
            TransferInstruction::new(
                Debit::holder(player.clone()),
                self.config.house_account(),
                asset.clone(),
                amount,
            )
            .opening_recipient(),
        );
        if is_won {
            self.vaults.transfer(&mut batch, payout, vault_owner, player, asset)?;
        }

        let event = RouletteEvent {
            player: player.clone(),
            is_won,
            asset_name: asset.name().to_string(),
            amount_bet: amount,
            chosen_numbers: chosen_numbers.to_vec(),
            drawn_number,
        };
        self.commit(
            batch,
            GameEvent::Roulette(event.clone()),
            draw.proof_ref,
            amount,
            0,
            is_won.then_some(payout),
        )?;
        Ok(event)
    }
}
