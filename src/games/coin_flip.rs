//! Coin-flip settlement
//!
//! The player wins when the draw from `[0, 2)` is 1. The stake debit carries
//! the fee; the payout is a multiple of the pre-fee stake.

use crate::common::types::{AccountId, Amount, AssetType};
use crate::errors::{WagerError, WagerResult};
use crate::events::{FlipEvent, FlipEventTyped, GameEvent};
use crate::games::odds;
use crate::games::processor::SettlementEngine;
use crate::games::settlement::{Obligations, TransferBatch};
use crate::ledger::{Debit, TransferInstruction};
use crate::vault::{Namespace, VaultRegistry};

const FLIP_SIDES: u64 = 2;
const WINNING_SIDE: u64 = 1;

/// Where the fee goes
#[derive(Debug, Clone, PartialEq, Eq)]
enum FeeRouting {
    /// Fee rides along with the stake into the vault
    Bundled { fee_bps: u64 },
    /// Vault receives stake plus fee and the receiver gets the fee again
    Split { fee_bps: u64, receiver: AccountId },
}

struct FlipWager<'a> {
    player: &'a AccountId,
    amount: Amount,
    vault_owner: &'a AccountId,
    asset: &'a AssetType,
    max_bet: Option<Amount>,
    fees: FeeRouting,
}

impl SettlementEngine {
    /// Single-asset coin flip on the primary asset
    pub fn play(&self, player: &AccountId, amount: Amount, vault_owner: &AccountId) -> WagerResult<FlipEvent> {
        let asset = self.config.primary_asset();
        let wager = FlipWager {
            player,
            amount,
            vault_owner,
            asset: &asset,
            max_bet: Some(self.config.flip.max_bet),
            fees: FeeRouting::Bundled {
                fee_bps: self.config.flip.fee_bps,
            },
        };

        let result = self.settle_flip(&self.vaults, wager, |is_won| {
            GameEvent::Flip(FlipEvent {
                player: player.clone(),
                is_won,
                amount_bet: amount,
            })
        });
        self.observe("coin_flip", result).map(|is_won| FlipEvent {
            player: player.clone(),
            is_won,
            amount_bet: amount,
        })
    }

    /// Coin flip on any asset the vault holds. The stake cap comes from the
    /// per-asset bet limits; unlisted assets are uncapped.
    pub fn play_multi_asset(
        &self,
        player: &AccountId,
        amount: Amount,
        vault_owner: &AccountId,
        asset: &AssetType,
    ) -> WagerResult<FlipEventTyped> {
        let wager = FlipWager {
            player,
            amount,
            vault_owner,
            asset,
            max_bet: self.config.bet_limits.limit_for(asset),
            fees: FeeRouting::Bundled {
                fee_bps: self.config.flip.fee_bps,
            },
        };

        let result = self.settle_flip(&self.vaults, wager, |is_won| {
            GameEvent::FlipTyped(typed_event(player, is_won, asset, amount))
        });
        self.observe("coin_flip_multi_asset", result)
            .map(|is_won| typed_event(player, is_won, asset, amount))
    }

    /// Coin flip against a delegate vault with the fee split out to the
    /// configured fee receiver
    pub fn play_delegate(
        &self,
        player: &AccountId,
        amount: Amount,
        vault_owner: &AccountId,
        asset: &AssetType,
    ) -> WagerResult<FlipEventTyped> {
        let wager = FlipWager {
            player,
            amount,
            vault_owner,
            asset,
            max_bet: self.config.bet_limits.limit_for(asset),
            fees: FeeRouting::Split {
                fee_bps: self.config.delegate.fee_bps,
                receiver: self.config.fee_receiver(),
            },
        };

        let result = self.settle_flip(&self.delegate_vaults, wager, |is_won| {
            GameEvent::FlipTyped(typed_event(player, is_won, asset, amount))
        });
        self.observe("coin_flip_delegate", result)
            .map(|is_won| typed_event(player, is_won, asset, amount))
    }

    fn settle_flip<N: Namespace>(
        &self,
        registry: &VaultRegistry<N>,
        wager: FlipWager<'_>,
        event: impl FnOnce(bool) -> GameEvent,
    ) -> WagerResult<bool> {
        if let Some(maximum) = wager.max_bet {
            if wager.amount >= maximum {
                return Err(WagerError::BetExceedsMaximum {
                    amount: wager.amount,
                    maximum,
                });
            }
        }

        let obligations = flip_obligations(wager.amount, &wager.fees, self.config.flip.payout_multiplier)?;

        let mut batch = TransferBatch::new();
        let lease = registry.lease(wager.vault_owner)?;
        let custody = lease.custody_account().clone();
        batch.hold(lease);

        self.ensure_funds(wager.player, wager.asset, obligations.player_debit()?)?;

        let draw = self.draw(FLIP_SIDES)?;
        let is_won = draw.value == WINNING_SIDE;

        batch.stage(
            TransferInstruction::new(
                Debit::holder(wager.player.clone()),
                custody,
                wager.asset.clone(),
                obligations.stake_debit,
            )
            .opening_custody(),
        );
        if let FeeRouting::Split { receiver, .. } = wager.fees {
            batch.stage(
                TransferInstruction::new(
                    Debit::holder(wager.player.clone()),
                    receiver,
                    wager.asset.clone(),
                    obligations.fee_debit,
                )
                .opening_recipient(),
            );
        }
        if is_won {
            registry.transfer(&mut batch, obligations.payout, wager.vault_owner, wager.player, wager.asset)?;
        }

        let fee = obligations.stake_debit - wager.amount + obligations.fee_debit;
        let payout = is_won.then_some(obligations.payout);
        self.commit(batch, event(is_won), draw.proof_ref, wager.amount, fee, payout)?;
        Ok(is_won)
    }
}

fn flip_obligations(amount: Amount, fees: &FeeRouting, multiplier: u64) -> WagerResult<Obligations> {
    let (stake_debit, fee_debit) = match fees {
        FeeRouting::Bundled { fee_bps } => (odds::amount_with_fee(amount, *fee_bps)?, 0),
        FeeRouting::Split { fee_bps, .. } => (
            odds::amount_with_fee(amount, *fee_bps)?,
            odds::fee_portion(amount, *fee_bps)?,
        ),
    };

    Ok(Obligations {
        stake_debit,
        fee_debit,
        payout: odds::flip_payout(amount, multiplier)?,
    })
}

fn typed_event(player: &AccountId, is_won: bool, asset: &AssetType, amount: Amount) -> FlipEventTyped {
    FlipEventTyped {
        player: player.clone(),
        is_won,
        asset_name: asset.name().to_string(),
        amount_bet: amount,
    }
}
