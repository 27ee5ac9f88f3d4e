use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use spacetruckers_game::constants::SHIP_PRICE;
use spacetruckers_game::fleet::transit_days;
use spacetruckers_game::{Contract, ContractId, GameState};

/// Dispatch interface for automated play.
pub trait DispatchPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Open contracts to attempt, in the order they should be tried.
    fn pick_contracts(&mut self, state: &GameState) -> Vec<ContractId>;

    /// Whether to buy another ship before dispatching today.
    fn wants_ship(&self, _state: &GameState) -> bool {
        false
    }
}

/// Built-in autopilot strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Greedy,
    Cautious,
    Random,
}

impl Strategy {
    pub const ALL: [Self; 3] = [Self::Greedy, Self::Cautious, Self::Random];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Cautious => "cautious",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn DispatchPolicy> {
        match self {
            Self::Greedy => Box::new(GreedyPolicy),
            Self::Cautious => Box::new(CautiousPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "cautious" => Ok(Self::Cautious),
            "random" => Ok(Self::Random),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

fn ids<'a>(contracts: impl IntoIterator<Item = &'a Contract>) -> Vec<ContractId> {
    contracts.into_iter().map(|c| c.id.clone()).collect()
}

/// Highest payout first; expands the fleet whenever it is fully booked.
struct GreedyPolicy;

impl DispatchPolicy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "Greedy"
    }

    fn pick_contracts(&mut self, state: &GameState) -> Vec<ContractId> {
        let mut offers: Vec<&Contract> = state.contracts.iter().collect();
        offers.sort_by(|a, b| b.payout.cmp(&a.payout));
        ids(offers)
    }

    fn wants_ship(&self, state: &GameState) -> bool {
        state.credits >= SHIP_PRICE * 3 && state.fleet.iter().all(|v| v.is_busy())
    }
}

/// Only contracts whose ETA lands on or before the deadline, soonest first.
struct CautiousPolicy;

impl DispatchPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn pick_contracts(&mut self, state: &GameState) -> Vec<ContractId> {
        let mut offers: Vec<&Contract> = state
            .contracts
            .iter()
            .filter(|c| state.day + transit_days(c, state.reputation) <= c.deadline_day)
            .collect();
        offers.sort_by_key(|c| c.deadline_day);
        ids(offers)
    }
}

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl DispatchPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_contracts(&mut self, state: &GameState) -> Vec<ContractId> {
        let mut offers = ids(&state.contracts);
        offers.shuffle(&mut self.rng);
        offers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacetruckers_game::Route;

    fn offer(seq: u64, payout: i64, distance: u32, deadline_day: u32) -> Contract {
        Contract {
            id: ContractId::from_sequence(seq),
            route: Route {
                origin: "Terra".into(),
                destination: "Europa".into(),
            },
            distance,
            weight: 10,
            deadline_day,
            payout,
            penalty: payout / 2,
        }
    }

    fn state_with(offers: Vec<Contract>) -> GameState {
        let mut state = GameState::default();
        state.contracts = offers;
        state
    }

    #[test]
    fn strategies_parse_case_insensitively() {
        assert_eq!("Greedy".parse::<Strategy>(), Ok(Strategy::Greedy));
        assert_eq!(" random ".parse::<Strategy>(), Ok(Strategy::Random));
        assert!("yolo".parse::<Strategy>().is_err());
    }

    #[test]
    fn greedy_orders_by_payout() {
        let state = state_with(vec![offer(1, 300, 40, 9), offer(2, 900, 40, 9)]);
        let picks = Strategy::Greedy.create_policy(0).pick_contracts(&state);
        assert_eq!(picks[0].as_str(), "CT-000002");
    }

    #[test]
    fn cautious_skips_contracts_that_cannot_arrive_in_time() {
        // 200 distance -> 7 days; deadline day 4 is out of reach from day 1.
        let state = state_with(vec![offer(1, 900, 200, 4), offer(2, 300, 30, 3)]);
        let picks = Strategy::Cautious.create_policy(0).pick_contracts(&state);
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].as_str(), "CT-000002");
    }

    #[test]
    fn random_policy_is_reproducible_per_seed() {
        let offers = (1..=5).map(|seq| offer(seq, 100, 40, 9)).collect();
        let state = state_with(offers);
        let a = Strategy::Random.create_policy(9).pick_contracts(&state);
        let b = Strategy::Random.create_policy(9).pick_contracts(&state);
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
    }
}
