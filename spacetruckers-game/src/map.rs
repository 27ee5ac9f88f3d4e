//! Static star map registry.
//!
//! Coordinates exist only for the view layer; the simulation treats a
//! location as an identity and never derives distance from geometry.
use serde::{Deserialize, Serialize};

use crate::rng::UniformSource;
use crate::fleet::Vehicle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub name: &'static str,
    pub x: i32,
    pub y: i32,
}

pub const LOCATIONS: [Location; 10] = [
    Location { name: "Terra", x: 40, y: 200 },
    Location { name: "Luna", x: 80, y: 180 },
    Location { name: "Mars", x: 120, y: 220 },
    Location { name: "Ganymede", x: 160, y: 120 },
    Location { name: "Europa", x: 220, y: 140 },
    Location { name: "Titan", x: 260, y: 220 },
    Location { name: "Ceres", x: 200, y: 260 },
    Location { name: "Vesta", x: 140, y: 260 },
    Location { name: "Kepler-22b", x: 260, y: 80 },
    Location { name: "Proxima-b", x: 60, y: 80 },
];

/// Look up a location by its exact name.
#[must_use]
pub fn location(name: &str) -> Option<&'static Location> {
    LOCATIONS.iter().find(|loc| loc.name == name)
}

/// Ordered origin/destination pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub origin: String,
    pub destination: String,
}

/// Draw a uniformly random origin, then a destination distinct from it.
pub fn random_route<R: UniformSource + ?Sized>(rng: &mut R) -> Route {
    let origin_idx = rng.pick_index(LOCATIONS.len()).unwrap_or(0);
    let others: Vec<&Location> = LOCATIONS
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != origin_idx)
        .map(|(_, loc)| loc)
        .collect();
    let dest_idx = rng.pick_index(others.len()).unwrap_or(0);
    Route {
        origin: LOCATIONS[origin_idx].name.to_string(),
        destination: others[dest_idx].name.to_string(),
    }
}

/// Line segment between two known locations, used to draw active routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteLine {
    pub from: Location,
    pub to: Location,
}

/// Segments for every vehicle currently carrying a contract. Routes that
/// reference unknown locations (e.g. from a hand-edited save) are skipped.
#[must_use]
pub fn active_routes(fleet: &[Vehicle]) -> Vec<RouteLine> {
    fleet
        .iter()
        .filter(|vehicle| vehicle.is_busy())
        .filter_map(|vehicle| vehicle.active_contract.as_ref())
        .filter_map(|contract| {
            let from = location(&contract.route.origin)?;
            let to = location(&contract.route.destination)?;
            Some(RouteLine {
                from: *from,
                to: *to,
            })
        })
        .collect()
}
