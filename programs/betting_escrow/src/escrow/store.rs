//! In-memory ledger
//!
//! An explicit store of events and stakes keyed the same way the program
//! keys its accounts: events by id, stakes by `(event_id, participant,
//! side)`. Each instance is independent; nothing is global.
//!
//! Every operation runs against copies and writes back only on success,
//! except `resolve_event`, which keeps `AwaitingResolution` when the oracle
//! fails.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use super::ledger::{ParticipantEntry, PoolBalances};
use super::resolution::{resolve, OutcomeOracle, ResolutionStatus};
use super::settlement::settle;
use crate::errors::EscrowError;
use crate::state::{PredictionEvent, Side, Stake};

pub type StakeKey = (u64, Pubkey, Side);

pub struct Ledger<O> {
    oracle: O,
    collateral_mint: Pubkey,
    events: BTreeMap<u64, PredictionEvent>,
    stakes: BTreeMap<StakeKey, Stake>,
}

impl<O: OutcomeOracle> Ledger<O> {
    pub fn new(collateral_mint: Pubkey, oracle: O) -> Self {
        Self {
            oracle,
            collateral_mint,
            events: BTreeMap::new(),
            stakes: BTreeMap::new(),
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn event(&self, event_id: u64) -> Result<&PredictionEvent> {
        Ok(self
            .events
            .get(&event_id)
            .ok_or(EscrowError::UnknownEvent)?)
    }

    pub fn stake(&self, event_id: u64, participant: Pubkey, side: Side) -> Option<&Stake> {
        self.stakes.get(&(event_id, participant, side))
    }

    pub fn create_event(
        &mut self,
        id: u64,
        creator: Pubkey,
        deadline: i64,
        now: i64,
    ) -> Result<&PredictionEvent> {
        require!(!self.events.contains_key(&id), EscrowError::DuplicateEvent);
        let event = PredictionEvent::open(id, creator, self.collateral_mint, deadline, now, 0)?;
        Ok(&*self.events.entry(id).or_insert(event))
    }

    pub fn place_stake(
        &mut self,
        event_id: u64,
        participant: Pubkey,
        side: Side,
        amount: u64,
        now: i64,
    ) -> Result<&Stake> {
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or(EscrowError::UnknownEvent)?;

        let key = (event_id, participant, side);
        let mut stake = self.stakes.get(&key).cloned().unwrap_or_default();
        event.record_stake(&mut stake, participant, side, amount, now)?;

        self.stakes.insert(key, stake);
        Ok(&self.stakes[&key])
    }

    pub fn get_pool(&self, event_id: u64) -> Result<PoolBalances> {
        Ok(self.event(event_id)?.pool())
    }

    /// Snapshot of the event's stakes; clone the iterator to walk it again
    pub fn get_participants(
        &self,
        event_id: u64,
    ) -> Result<impl Iterator<Item = ParticipantEntry> + Clone + '_> {
        self.event(event_id)?;

        let first = (event_id, Pubkey::default(), Side::Yes);
        let last = (event_id, Pubkey::new_from_array([u8::MAX; 32]), Side::No);
        Ok(self
            .stakes
            .range(first..=last)
            .map(|(_, stake)| ParticipantEntry::from(stake)))
    }

    pub fn resolve_event(&mut self, event_id: u64, now: i64) -> Result<ResolutionStatus> {
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or(EscrowError::UnknownEvent)?;
        resolve(event, &self.oracle, now)
    }

    pub fn claim(&mut self, event_id: u64, participant: Pubkey) -> Result<u64> {
        let event = self
            .events
            .get_mut(&event_id)
            .ok_or(EscrowError::UnknownEvent)?;

        let mut held: Vec<Stake> = [Side::Yes, Side::No]
            .into_iter()
            .filter_map(|side| self.stakes.get(&(event_id, participant, side)).cloned())
            .collect();
        let mut refs: Vec<&mut Stake> = held.iter_mut().collect();
        let paid = settle(event, &participant, &mut refs)?;

        for stake in held {
            self.stakes.insert((event_id, participant, stake.side), stake);
        }
        Ok(paid)
    }

    pub fn outcome(&self, event_id: u64) -> Result<bool> {
        self.event(event_id)?.outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escrow::resolution::tests::ScriptedOracle;
    use crate::state::EventState;

    const NOW: i64 = 1_700_000_000;
    const HOUR: i64 = 3_600;

    fn ledger(oracle: ScriptedOracle) -> Ledger<ScriptedOracle> {
        Ledger::new(Pubkey::new_unique(), oracle)
    }

    #[test]
    fn test_unknown_event_everywhere() {
        let mut book = ledger(ScriptedOracle::default());
        let who = Pubkey::new_unique();
        let unknown: Error = EscrowError::UnknownEvent.into();

        assert_eq!(book.place_stake(4, who, Side::Yes, 1, NOW).unwrap_err(), unknown);
        assert_eq!(book.get_pool(4).unwrap_err(), unknown);
        assert!(book.get_participants(4).is_err());
        assert_eq!(book.resolve_event(4, NOW).unwrap_err(), unknown);
        assert_eq!(book.claim(4, who).unwrap_err(), unknown);
        assert_eq!(book.outcome(4).unwrap_err(), unknown);
    }

    #[test]
    fn test_duplicate_event() {
        let mut book = ledger(ScriptedOracle::default());
        book.create_event(1, Pubkey::new_unique(), NOW + HOUR, NOW).unwrap();

        let err = book
            .create_event(1, Pubkey::new_unique(), NOW + 2 * HOUR, NOW)
            .unwrap_err();
        assert_eq!(err, EscrowError::DuplicateEvent.into());
        assert_eq!(book.event(1).unwrap().deadline, NOW + HOUR);
    }

    #[test]
    fn test_winner_scenario() {
        let (alice, bob) = (Pubkey::new_unique(), Pubkey::new_unique());
        let mut book = ledger(ScriptedOracle::answering(true));
        book.create_event(1, alice, NOW + HOUR, NOW).unwrap();

        book.place_stake(1, alice, Side::Yes, 100, NOW + 1).unwrap();
        book.place_stake(1, bob, Side::No, 300, NOW + 2).unwrap();
        assert_eq!(book.get_pool(1).unwrap(), PoolBalances { pool_yes: 100, pool_no: 300 });

        let status = book.resolve_event(1, NOW + HOUR).unwrap();
        assert_eq!(status, ResolutionStatus::Resolved { outcome: true });
        assert!(book.outcome(1).unwrap());

        assert_eq!(book.claim(1, alice).unwrap(), 400);
        assert_eq!(book.claim(1, bob).unwrap_err(), EscrowError::NothingToClaim.into());
        assert_eq!(book.claim(1, alice).unwrap_err(), EscrowError::NothingToClaim.into());
        assert!(book.stake(1, alice, Side::Yes).unwrap().claimed);
    }

    #[test]
    fn test_lonely_staker_is_refunded() {
        let alice = Pubkey::new_unique();
        let mut book = ledger(ScriptedOracle::answering(false));
        book.create_event(2, alice, NOW + HOUR, NOW).unwrap();
        book.place_stake(2, alice, Side::Yes, 50, NOW).unwrap();

        assert_eq!(book.resolve_event(2, NOW + HOUR).unwrap(), ResolutionStatus::Refunded);
        assert_eq!(book.oracle().calls(), 0);
        assert_eq!(book.claim(2, alice).unwrap(), 50);
        assert_eq!(book.event(2).unwrap().paid_out, 50);
    }

    #[test]
    fn test_late_stake_leaves_pool_unchanged() {
        let alice = Pubkey::new_unique();
        let mut book = ledger(ScriptedOracle::default());
        book.create_event(3, alice, NOW + HOUR, NOW).unwrap();
        book.place_stake(3, alice, Side::No, 5, NOW).unwrap();

        let err = book
            .place_stake(3, Pubkey::new_unique(), Side::Yes, 10, NOW + HOUR)
            .unwrap_err();
        assert_eq!(err, EscrowError::EventClosed.into());
        assert_eq!(book.get_pool(3).unwrap(), PoolBalances { pool_yes: 0, pool_no: 5 });
        assert_eq!(book.get_participants(3).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_stake_creates_no_record() {
        let alice = Pubkey::new_unique();
        let mut book = ledger(ScriptedOracle::default());
        book.create_event(3, alice, NOW + HOUR, NOW).unwrap();

        assert!(book.place_stake(3, alice, Side::Yes, 0, NOW).is_err());
        assert!(book.stake(3, alice, Side::Yes).is_none());
        assert_eq!(book.event(3).unwrap().stake_count, 0);
    }

    #[test]
    fn test_participants_snapshot_is_restartable() {
        let (alice, bob) = (Pubkey::new_unique(), Pubkey::new_unique());
        let mut book = ledger(ScriptedOracle::default());
        book.create_event(5, alice, NOW + HOUR, NOW).unwrap();
        book.create_event(6, alice, NOW + HOUR, NOW).unwrap();
        book.place_stake(5, alice, Side::Yes, 10, NOW).unwrap();
        book.place_stake(5, alice, Side::No, 4, NOW).unwrap();
        book.place_stake(5, bob, Side::No, 7, NOW).unwrap();
        book.place_stake(5, bob, Side::No, 3, NOW).unwrap();
        book.place_stake(6, bob, Side::Yes, 99, NOW).unwrap();

        let rows = book.get_participants(5).unwrap();
        let first: Vec<ParticipantEntry> = rows.clone().collect();
        let second: Vec<ParticipantEntry> = rows.collect();

        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(first.iter().map(|r| r.amount).sum::<u64>(), 24);
        assert!(first
            .iter()
            .any(|r| r.participant == bob && !r.side && r.amount == 10));
    }

    #[test]
    fn test_oracle_outage_then_retry() {
        let (alice, bob) = (Pubkey::new_unique(), Pubkey::new_unique());
        let oracle = ScriptedOracle::default();
        oracle.push(Err(EscrowError::OracleTimeout));
        oracle.push(Ok(false));
        let mut book = ledger(oracle);

        book.create_event(8, alice, NOW + HOUR, NOW).unwrap();
        book.place_stake(8, alice, Side::Yes, 60, NOW).unwrap();
        book.place_stake(8, bob, Side::No, 40, NOW).unwrap();

        let err = book.resolve_event(8, NOW + HOUR).unwrap_err();
        assert_eq!(err, EscrowError::OracleTimeout.into());
        assert_eq!(book.event(8).unwrap().state, EventState::AwaitingResolution);
        assert_eq!(book.claim(8, bob).unwrap_err(), EscrowError::NotResolved.into());
        assert_eq!(
            book.place_stake(8, bob, Side::No, 1, NOW + 1).unwrap_err(),
            EscrowError::EventClosed.into()
        );

        assert_eq!(
            book.resolve_event(8, NOW + HOUR + 30).unwrap(),
            ResolutionStatus::Resolved { outcome: false }
        );
        assert_eq!(book.claim(8, bob).unwrap(), 100);
        assert_eq!(book.claim(8, alice).unwrap_err(), EscrowError::NothingToClaim.into());
    }

    #[test]
    fn test_many_events_total_payout_bounded() {
        let people: Vec<Pubkey> = (0..6).map(|_| Pubkey::new_unique()).collect();
        let oracle = ScriptedOracle::default();
        for id in 0..5u64 {
            oracle.push(Ok(id % 2 == 0));
        }
        let mut book = ledger(oracle);

        for id in 0..5u64 {
            book.create_event(id, people[0], NOW + HOUR, NOW).unwrap();
            for (i, who) in people.iter().enumerate() {
                let side = Side::from((i as u64 + id) % 3 != 0);
                book.place_stake(id, *who, side, 1 + (i as u64 * 13 + id * 7) % 29, NOW)
                    .unwrap();
            }
            book.resolve_event(id, NOW + HOUR).unwrap();

            let total = book.get_pool(id).unwrap().total().unwrap();
            let paid: u64 = people
                .iter()
                .filter_map(|who| book.claim(id, *who).ok())
                .sum();
            assert!(paid <= total);
            assert_eq!(book.event(id).unwrap().paid_out, paid);
        }
    }
}
