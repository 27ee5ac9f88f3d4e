//! Fleet roster and the assignment engine.
//!
//! Validation always happens before mutation: a rejected action leaves the
//! roster, the contract pool, and the credit balance exactly as they were.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    FUEL_PER_DISTANCE, FUEL_PER_WEIGHT, MIN_FLEET_SIZE, REPAIR_COST_PER_HP,
    REPUTATION_FAST_TRACK_THRESHOLD, SHIP_CAPACITY_MAX, SHIP_CAPACITY_MIN, SHIP_FUEL_MAX,
    SHIP_HP_MAX, SHIP_NAME_BASE, SHIP_PRICE, SHIP_RESALE_PRICE, TRAVEL_DISTANCE_PER_DAY,
};
use crate::contracts::{Contract, ContractId};
use crate::error::ValidationFailure;
use crate::journal::{LogEvent, LogSink};
use crate::numbers::{ceil_f64_to_u32, clamp_i64_to_u32};
use crate::rng::UniformSource;
use crate::state::GameState;

/// Roster-unique vehicle identifier. Never reused after a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(pub u32);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cosmetic hull identifier, opaque to the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Skin(pub String);

impl Default for Skin {
    fn default() -> Self {
        Self("falcon".to_string())
    }
}

impl fmt::Display for Skin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub name: String,
    pub fuel: u32,
    pub fuel_max: u32,
    pub hp: u32,
    pub hp_max: u32,
    /// Maximum cargo tonnage.
    pub capacity: u32,
    /// Days until arrival; zero means idle.
    #[serde(default)]
    pub busy_days: u32,
    #[serde(default)]
    pub skin: Skin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_contract: Option<Contract>,
}

impl Vehicle {
    /// A factory-fresh vehicle with full tanks and hull.
    #[must_use]
    pub fn new(id: VehicleId, capacity: u32, skin: Skin) -> Self {
        Self {
            id,
            name: Self::name_for(id),
            fuel: SHIP_FUEL_MAX,
            fuel_max: SHIP_FUEL_MAX,
            hp: SHIP_HP_MAX,
            hp_max: SHIP_HP_MAX,
            capacity,
            busy_days: 0,
            skin,
            active_contract: None,
        }
    }

    #[must_use]
    pub fn name_for(id: VehicleId) -> String {
        format!("ST-{}", SHIP_NAME_BASE.saturating_add(id.0))
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy_days > 0
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !self.is_busy()
    }

    #[must_use]
    pub const fn fuel_deficit(&self) -> u32 {
        self.fuel_max.saturating_sub(self.fuel)
    }

    #[must_use]
    pub const fn hp_deficit(&self) -> u32 {
        self.hp_max.saturating_sub(self.hp)
    }

    /// Apply hull damage, clamping at zero. Returns the damage actually taken.
    pub const fn apply_damage(&mut self, amount: u32) -> u32 {
        let taken = if amount > self.hp { self.hp } else { amount };
        self.hp -= taken;
        taken
    }

    /// Add fuel, clamping to the tank size.
    pub const fn add_fuel(&mut self, amount: u32) {
        self.fuel = self.fuel.saturating_add(amount);
        if self.fuel > self.fuel_max {
            self.fuel = self.fuel_max;
        }
    }

    /// Whether the bounds `0 ≤ fuel ≤ fuel_max` and `0 ≤ hp ≤ hp_max` hold.
    #[must_use]
    pub const fn within_bounds(&self) -> bool {
        self.fuel <= self.fuel_max && self.hp <= self.hp_max
    }
}

/// Fuel a contract burns: `ceil(distance*0.4 + weight*0.2)`.
#[must_use]
pub fn fuel_needed(contract: &Contract) -> u32 {
    ceil_f64_to_u32(
        f64::from(contract.distance) * FUEL_PER_DISTANCE
            + f64::from(contract.weight) * FUEL_PER_WEIGHT,
    )
}

/// Transit days for a contract, one day faster for reputable companies.
#[must_use]
pub fn transit_days(contract: &Contract, reputation: u32) -> u32 {
    let base = ceil_f64_to_u32(f64::from(contract.distance) / TRAVEL_DISTANCE_PER_DAY);
    let fast_track = u32::from(reputation >= REPUTATION_FAST_TRACK_THRESHOLD);
    base.saturating_sub(fast_track).max(1)
}

/// Successful assignment details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub vehicle: VehicleId,
    pub contract: ContractId,
    pub fuel_used: u32,
    pub eta_days: u32,
}

/// Bind an open contract to the first idle vehicle that can carry it.
///
/// # Errors
///
/// Returns [`ValidationFailure::UnknownContract`] when the contract is not in
/// the open pool, [`ValidationFailure::NoEligibleVehicle`] when no idle vehicle
/// has the capacity, and [`ValidationFailure::InsufficientFuel`] when the
/// selected vehicle cannot make the trip. Nothing is mutated on error.
pub fn assign_contract(
    state: &mut GameState,
    contract_id: &ContractId,
    log: &mut dyn LogSink,
) -> Result<Departure, ValidationFailure> {
    let result = try_assign(state, contract_id);
    match &result {
        Ok(departure) => {
            if let Some(vehicle) = state.vehicle(departure.vehicle)
                && let Some(contract) = vehicle.active_contract.as_ref()
            {
                log.record(
                    state.day,
                    LogEvent::Departure {
                        vehicle: vehicle.name.clone(),
                        origin: contract.route.origin.clone(),
                        destination: contract.route.destination.clone(),
                        eta_days: departure.eta_days,
                    },
                );
            }
        }
        Err(failure) => log.record(state.day, LogEvent::Rejected(failure.clone())),
    }
    result
}

fn try_assign(
    state: &mut GameState,
    contract_id: &ContractId,
) -> Result<Departure, ValidationFailure> {
    let pool_idx = state
        .contracts
        .iter()
        .position(|contract| &contract.id == contract_id)
        .ok_or_else(|| ValidationFailure::UnknownContract(contract_id.clone()))?;
    let weight = state.contracts[pool_idx].weight;
    let vehicle_idx = state
        .fleet
        .iter()
        .position(|vehicle| vehicle.is_idle() && vehicle.capacity >= weight)
        .ok_or(ValidationFailure::NoEligibleVehicle { weight })?;

    let needed = fuel_needed(&state.contracts[pool_idx]);
    let vehicle = &state.fleet[vehicle_idx];
    if vehicle.fuel < needed {
        return Err(ValidationFailure::InsufficientFuel {
            vehicle: vehicle.name.clone(),
            needed,
            available: vehicle.fuel,
        });
    }

    let eta_days = transit_days(&state.contracts[pool_idx], state.reputation);
    let contract = state.contracts.remove(pool_idx);
    let vehicle = &mut state.fleet[vehicle_idx];
    vehicle.fuel -= needed;
    vehicle.busy_days = eta_days;
    let departure = Departure {
        vehicle: vehicle.id,
        contract: contract.id.clone(),
        fuel_used: needed,
        eta_days,
    };
    vehicle.active_contract = Some(contract);
    Ok(departure)
}

/// Buy a new vehicle for the fixed ship price.
///
/// # Errors
///
/// Returns [`ValidationFailure::InsufficientFunds`] when credits fall short of
/// the price; credits and roster are untouched.
pub fn purchase_vehicle<R: UniformSource + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    skin: Skin,
    log: &mut dyn LogSink,
) -> Result<VehicleId, ValidationFailure> {
    if state.credits < SHIP_PRICE {
        let failure = ValidationFailure::InsufficientFunds {
            price: SHIP_PRICE,
            credits: state.credits,
        };
        log.record(state.day, LogEvent::Rejected(failure.clone()));
        return Err(failure);
    }
    state.credits -= SHIP_PRICE;
    let capacity = clamp_i64_to_u32(rng.roll_range(SHIP_CAPACITY_MIN, SHIP_CAPACITY_MAX));
    let id = state.issue_vehicle_id();
    let vehicle = Vehicle::new(id, capacity, skin);
    log.record(
        state.day,
        LogEvent::ShipPurchased {
            vehicle: vehicle.name.clone(),
            capacity,
        },
    );
    state.fleet.push(vehicle);
    Ok(id)
}

/// Sell the last vehicle in roster order for the fixed resale price.
///
/// A vehicle sold mid-delivery takes its contract with it; the contract is
/// neither paid nor penalised.
///
/// # Errors
///
/// Returns [`ValidationFailure::MinimumFleetSize`] when selling would leave
/// the company without a vehicle.
pub fn sell_vehicle(state: &mut GameState, log: &mut dyn LogSink) -> Result<i64, ValidationFailure> {
    if state.fleet.len() <= MIN_FLEET_SIZE {
        let failure = ValidationFailure::MinimumFleetSize;
        log.record(state.day, LogEvent::Rejected(failure.clone()));
        return Err(failure);
    }
    let Some(sold) = state.fleet.pop() else {
        return Err(ValidationFailure::MinimumFleetSize);
    };
    state.credits += SHIP_RESALE_PRICE;
    log.record(
        state.day,
        LogEvent::ShipSold {
            vehicle: sold.name,
            price: SHIP_RESALE_PRICE,
        },
    );
    Ok(SHIP_RESALE_PRICE)
}

/// Top up every tank as far as current credits allow at the market price.
/// Never borrows. Returns the total spent.
pub fn refuel_all(state: &mut GameState, log: &mut dyn LogSink) -> i64 {
    let price = state.fuel_price.max(1);
    let mut spent = 0_i64;
    for vehicle in &mut state.fleet {
        let affordable = if state.credits > 0 {
            state.credits / price
        } else {
            0
        };
        let units = i64::from(vehicle.fuel_deficit()).min(affordable);
        if units > 0 {
            vehicle.add_fuel(clamp_i64_to_u32(units));
            let cost = units * price;
            state.credits -= cost;
            spent += cost;
        }
    }
    log.record(state.day, LogEvent::Refueled { spent });
    spent
}

/// Fully repair each damaged vehicle whose repair the company can afford.
/// Vehicles that cannot be paid for are skipped entirely. Returns the total spent.
pub fn repair_all(state: &mut GameState, log: &mut dyn LogSink) -> i64 {
    let mut spent = 0_i64;
    for vehicle in &mut state.fleet {
        let missing = vehicle.hp_deficit();
        let cost = i64::from(missing) * REPAIR_COST_PER_HP;
        if missing > 0 && state.credits >= cost {
            vehicle.hp = vehicle.hp_max;
            state.credits -= cost;
            spent += cost;
        }
    }
    log.record(state.day, LogEvent::Repaired { spent });
    spent
}

/// Change one vehicle's cosmetic skin.
///
/// # Errors
///
/// Returns [`ValidationFailure::UnknownVehicle`] when no such vehicle exists.
pub fn set_skin(
    state: &mut GameState,
    vehicle_id: VehicleId,
    skin: Skin,
    log: &mut dyn LogSink,
) -> Result<(), ValidationFailure> {
    let day = state.day;
    let Some(vehicle) = state.vehicle_mut(vehicle_id) else {
        let failure = ValidationFailure::UnknownVehicle(vehicle_id);
        log.record(day, LogEvent::Rejected(failure.clone()));
        return Err(failure);
    };
    vehicle.skin = skin;
    let event = LogEvent::SkinChanged {
        vehicle: vehicle.name.clone(),
        skin: vehicle.skin.to_string(),
    };
    log.record(day, event);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Journal;
    use crate::map::Route;
    use crate::rng::ScriptedUniform;

    fn contract(id: u64, distance: u32, weight: u32) -> Contract {
        Contract {
            id: ContractId::from_sequence(id),
            route: Route {
                origin: "Terra".into(),
                destination: "Mars".into(),
            },
            distance,
            weight,
            deadline_day: 5,
            payout: 1_000,
            penalty: 500,
        }
    }

    fn state_with_pool(pool: Vec<Contract>) -> GameState {
        let mut state = GameState::default();
        state.contracts = pool;
        state
    }

    #[test]
    fn fuel_and_transit_formulas() {
        let ct = contract(1, 100, 20);
        // ceil(40 + 4) = 44
        assert_eq!(fuel_needed(&ct), 44);
        // ceil(100/30) = 4
        assert_eq!(transit_days(&ct, 0), 4);
        assert_eq!(transit_days(&ct, 5), 3);
        let short = contract(2, 20, 5);
        assert_eq!(transit_days(&short, 9), 1);
        // ceil(8 + 1) = 9
        assert_eq!(fuel_needed(&short), 9);
    }

    #[test]
    fn assign_binds_contract_and_burns_fuel() {
        let mut state = state_with_pool(vec![contract(1, 100, 20)]);
        let mut journal = Journal::new();
        let departure = assign_contract(&mut state, &ContractId::from_sequence(1), &mut journal)
            .expect("assignment succeeds");
        assert_eq!(departure.eta_days, 4);
        assert!(state.contracts.is_empty());
        let ship = &state.fleet[0];
        assert_eq!(ship.fuel, 56);
        assert_eq!(ship.busy_days, 4);
        assert_eq!(
            ship.active_contract.as_ref().map(|c| c.id.clone()),
            Some(ContractId::from_sequence(1))
        );
        assert!(matches!(
            journal.last().map(|e| &e.event),
            Some(LogEvent::Departure { eta_days: 4, .. })
        ));
    }

    #[test]
    fn reputable_company_departs_a_day_faster() {
        let mut state = state_with_pool(vec![contract(1, 100, 20), contract(2, 100, 20)]);
        state.fleet.push(Vehicle::new(VehicleId(2), 30, Skin::default()));
        let mut journal = Journal::new();

        state.reputation = 4;
        let slow = assign_contract(&mut state, &ContractId::from_sequence(1), &mut journal)
            .expect("first vehicle departs");
        assert_eq!(slow.eta_days, 4);

        state.reputation = 5;
        let fast = assign_contract(&mut state, &ContractId::from_sequence(2), &mut journal)
            .expect("second vehicle departs");
        assert_eq!(fast.vehicle, VehicleId(2));
        assert_eq!(fast.eta_days, 3);
        assert_eq!(state.fleet[1].busy_days, 3);
        assert!(matches!(
            journal.last().map(|e| &e.event),
            Some(LogEvent::Departure { eta_days: 3, .. })
        ));
    }

    #[test]
    fn insufficient_fuel_leaves_everything_untouched() {
        let mut state = state_with_pool(vec![contract(1, 220, 30)]);
        state.fleet[0].fuel = 10;
        let before = state.clone();
        let mut journal = Journal::new();
        let err = assign_contract(&mut state, &ContractId::from_sequence(1), &mut journal)
            .expect_err("not enough fuel");
        assert!(matches!(err, ValidationFailure::InsufficientFuel { needed: 94, .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn busy_vehicles_are_skipped() {
        let mut state = state_with_pool(vec![contract(1, 40, 10), contract(2, 40, 10)]);
        let mut journal = Journal::new();
        assign_contract(&mut state, &ContractId::from_sequence(1), &mut journal).unwrap();
        let err = assign_contract(&mut state, &ContractId::from_sequence(2), &mut journal)
            .expect_err("only vehicle is busy");
        assert_eq!(err, ValidationFailure::NoEligibleVehicle { weight: 10 });
        assert_eq!(state.contracts.len(), 1);
    }

    #[test]
    fn unknown_contract_is_rejected() {
        let mut state = state_with_pool(Vec::new());
        let mut journal = Journal::new();
        let err = assign_contract(&mut state, &ContractId::from_sequence(42), &mut journal)
            .expect_err("missing contract");
        assert!(matches!(err, ValidationFailure::UnknownContract(_)));
    }

    #[test]
    fn purchase_and_sell_cycle() {
        let mut state = GameState::default();
        let mut journal = Journal::new();
        let mut rng = ScriptedUniform::constant(0.999);
        let id = purchase_vehicle(&mut state, &mut rng, Skin("nova".into()), &mut journal)
            .expect("affordable");
        assert_eq!(state.credits, 3_000);
        let bought = state.vehicle(id).expect("in roster");
        assert_eq!(bought.capacity, 45);
        assert_eq!(bought.name, "ST-102");
        assert_eq!((bought.fuel, bought.hp), (100, 100));

        let credited = sell_vehicle(&mut state, &mut journal).expect("fleet of two");
        assert_eq!(credited, 1_200);
        assert_eq!(state.credits, 4_200);
        assert_eq!(state.fleet.len(), 1);
        assert_eq!(
            sell_vehicle(&mut state, &mut journal),
            Err(ValidationFailure::MinimumFleetSize)
        );
        assert_eq!(state.credits, 4_200);

        // Ids are never reused after a sale.
        let next = purchase_vehicle(&mut state, &mut rng, Skin::default(), &mut journal).unwrap();
        assert_eq!(next, VehicleId(3));
    }

    #[test]
    fn purchase_without_funds_is_rejected() {
        let mut state = GameState::default();
        state.credits = 1_999;
        let mut journal = Journal::new();
        let mut rng = ScriptedUniform::constant(0.5);
        let err = purchase_vehicle(&mut state, &mut rng, Skin::default(), &mut journal)
            .expect_err("too poor");
        assert_eq!(
            err,
            ValidationFailure::InsufficientFunds {
                price: 2_000,
                credits: 1_999
            }
        );
        assert_eq!(state.fleet.len(), 1);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn refuel_stops_at_what_credits_afford() {
        let mut state = GameState::default();
        state.fleet[0].fuel = 50;
        state.fuel_price = 4;
        state.credits = 103;
        let mut journal = Journal::new();
        let spent = refuel_all(&mut state, &mut journal);
        assert_eq!(spent, 100);
        assert_eq!(state.fleet[0].fuel, 75);
        assert_eq!(state.credits, 3);

        state.credits = -40;
        assert_eq!(refuel_all(&mut state, &mut journal), 0);
        assert_eq!(state.credits, -40);
    }

    #[test]
    fn repair_is_all_or_nothing_per_vehicle() {
        let mut state = GameState::default();
        let mut rng = ScriptedUniform::constant(0.0);
        let mut journal = Journal::new();
        purchase_vehicle(&mut state, &mut rng, Skin::default(), &mut journal).unwrap();
        state.fleet[0].hp = 40; // 300 cr
        state.fleet[1].hp = 90; // 50 cr
        state.credits = 200;
        let spent = repair_all(&mut state, &mut journal);
        assert_eq!(spent, 50);
        assert_eq!(state.fleet[0].hp, 40);
        assert_eq!(state.fleet[1].hp, 100);
        assert_eq!(state.credits, 150);
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut ship = Vehicle::new(VehicleId(1), 30, Skin::default());
        ship.hp = 7;
        assert_eq!(ship.apply_damage(18), 7);
        assert_eq!(ship.hp, 0);
        assert!(ship.within_bounds());
    }

    #[test]
    fn skin_changes_are_cosmetic() {
        let mut state = GameState::default();
        let mut journal = Journal::new();
        set_skin(&mut state, VehicleId(1), Skin("hauler".into()), &mut journal).unwrap();
        assert_eq!(state.fleet[0].skin, Skin("hauler".into()));
        assert_eq!(
            set_skin(&mut state, VehicleId(9), Skin::default(), &mut journal),
            Err(ValidationFailure::UnknownVehicle(VehicleId(9)))
        );
    }
}
