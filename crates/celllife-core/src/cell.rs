//! Cell states and their per-step transition rules.

use serde::{Deserialize, Serialize};

/// Stamina every freshly born normal cell starts with
pub const FULL_STAMINA: f64 = 100.0;

/// A normal cell whose stamina falls to this value or below dies
pub const STAMINA_DEATH_THRESHOLD: f64 = 1.0;

/// Tag of a cell variant, without any payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Dead,
    Normal,
    Mutated,
}

/// State of a single grid cell.
///
/// Transitions never modify a cell in place; [`Cell::next_stage`] always
/// hands back the value the cell takes on in the following step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Dead,
    Normal { stamina: f64 },
    Mutated,
}

impl Cell {
    /// A newly born normal cell at full stamina
    pub fn normal() -> Self {
        Cell::Normal {
            stamina: FULL_STAMINA,
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Dead => CellKind::Dead,
            Cell::Normal { .. } => CellKind::Normal,
            Cell::Mutated => CellKind::Mutated,
        }
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Cell::Normal { .. })
    }

    pub fn is_mutated(&self) -> bool {
        matches!(self, Cell::Mutated)
    }

    /// Normal and mutated cells are both alive
    pub fn is_alive(&self) -> bool {
        !matches!(self, Cell::Dead)
    }

    pub fn stamina(&self) -> Option<f64> {
        match self {
            Cell::Normal { stamina } => Some(*stamina),
            _ => None,
        }
    }

    /// Stamina as a fraction, where 1.0 is full. Only normal cells have one.
    pub fn percent_stamina(&self) -> Option<f64> {
        self.stamina().map(|stamina| stamina / FULL_STAMINA)
    }

    /// Compute the state of this cell for the next step, given how many of
    /// its neighbours are normal and how many are mutated.
    ///
    /// Rules are checked top to bottom and the first match wins.
    pub fn next_stage(&self, normal_neighbours: u32, mutated_neighbours: u32) -> Cell {
        match *self {
            Cell::Dead => {
                if normal_neighbours == 3 {
                    Cell::normal()
                } else if mutated_neighbours == 2 {
                    Cell::Mutated
                } else {
                    Cell::Dead
                }
            }

            Cell::Normal { stamina } => {
                // Decay is applied before either survival check and the
                // surviving cell keeps exactly this value.
                let stamina = decay_stamina(stamina, normal_neighbours, mutated_neighbours);

                if stamina <= STAMINA_DEATH_THRESHOLD {
                    Cell::Dead
                } else if normal_neighbours == 2 || normal_neighbours == 3 {
                    Cell::Normal { stamina }
                } else {
                    Cell::Dead
                }
            }

            Cell::Mutated => {
                if normal_neighbours >= 2 {
                    Cell::normal()
                } else if (2..=4).contains(&mutated_neighbours) {
                    Cell::Mutated
                } else {
                    Cell::Dead
                }
            }
        }
    }
}

/// `stamina * 3 * n / (8 + 2 * m)`; the denominator is never below 8.
fn decay_stamina(stamina: f64, normal_neighbours: u32, mutated_neighbours: u32) -> f64 {
    (stamina * 3.0 * normal_neighbours as f64) / (8.0 + 2.0 * mutated_neighbours as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_cell_born_with_three_normal_neighbours() {
        for mutated in 0..=5 {
            assert_eq!(Cell::Dead.next_stage(3, mutated), Cell::normal());
        }
    }

    #[test]
    fn test_dead_cell_mutates_with_two_mutated_neighbours() {
        assert_eq!(Cell::Dead.next_stage(0, 2), Cell::Mutated);
        assert_eq!(Cell::Dead.next_stage(4, 2), Cell::Mutated);
    }

    #[test]
    fn test_dead_cell_stays_dead() {
        for normal in 0..=8 {
            for mutated in 0..=8 - normal {
                if normal == 3 || mutated == 2 {
                    continue;
                }
                assert_eq!(Cell::Dead.next_stage(normal, mutated), Cell::Dead);
            }
        }
    }

    #[test]
    fn test_normal_cell_survives_with_boosted_stamina() {
        let next = Cell::normal().next_stage(3, 0);
        assert_eq!(next, Cell::Normal { stamina: 112.5 });
    }

    #[test]
    fn test_normal_cell_stamina_with_mutated_neighbours() {
        // 100 * 3 * 2 / (8 + 2 * 2) = 50
        let next = Cell::normal().next_stage(2, 2);
        assert_eq!(next.stamina(), Some(50.0));
    }

    #[test]
    fn test_normal_cell_dies_from_lonely_neighbourhood() {
        // 3 * 3 * 1 / 8 = 1.125 clears the stamina threshold, but one
        // normal neighbour is still not enough to survive.
        let cell = Cell::Normal { stamina: 3.0 };
        assert_eq!(cell.next_stage(1, 0), Cell::Dead);
    }

    #[test]
    fn test_normal_cell_dies_from_exhaustion() {
        let cell = Cell::Normal { stamina: 10.0 };
        assert_eq!(cell.next_stage(0, 0), Cell::Dead);

        // 1.0 * 3 * 3 / 8 = 1.125 survives, 0.8 * 3 * 3 / 8 = 0.9 does not
        assert!(Cell::Normal { stamina: 1.0 }.next_stage(3, 0).is_normal());
        assert_eq!(Cell::Normal { stamina: 0.8 }.next_stage(3, 0), Cell::Dead);
    }

    #[test]
    fn test_normal_cell_next_stage_leaves_original_untouched() {
        let cell = Cell::Normal { stamina: 40.0 };
        let _ = cell.next_stage(2, 0);
        assert_eq!(cell.stamina(), Some(40.0));
    }

    #[test]
    fn test_normal_cell_overcrowded() {
        assert_eq!(Cell::normal().next_stage(4, 0), Cell::Dead);
    }

    #[test]
    fn test_mutated_cell_reverts_to_normal() {
        for mutated in 0..=6 {
            assert_eq!(Cell::Mutated.next_stage(2, mutated), Cell::normal());
        }
        assert_eq!(Cell::Mutated.next_stage(5, 0), Cell::normal());
    }

    #[test]
    fn test_mutated_cell_persists_among_mutated() {
        assert_eq!(Cell::Mutated.next_stage(0, 3), Cell::Mutated);
        assert_eq!(Cell::Mutated.next_stage(1, 2), Cell::Mutated);
        assert_eq!(Cell::Mutated.next_stage(1, 4), Cell::Mutated);
    }

    #[test]
    fn test_mutated_cell_dies() {
        assert_eq!(Cell::Mutated.next_stage(0, 5), Cell::Dead);
        assert_eq!(Cell::Mutated.next_stage(1, 1), Cell::Dead);
        assert_eq!(Cell::Mutated.next_stage(0, 0), Cell::Dead);
    }

    #[test]
    fn test_percent_stamina() {
        assert_eq!(Cell::normal().percent_stamina(), Some(1.0));
        assert_eq!(Cell::Normal { stamina: 25.0 }.percent_stamina(), Some(0.25));
        assert_eq!(Cell::Dead.percent_stamina(), None);
        assert_eq!(Cell::Mutated.percent_stamina(), None);
    }

    #[test]
    fn test_cell_kind() {
        assert_eq!(Cell::Dead.kind(), CellKind::Dead);
        assert_eq!(Cell::normal().kind(), CellKind::Normal);
        assert_eq!(Cell::Mutated.kind(), CellKind::Mutated);
        assert!(Cell::Mutated.is_alive());
        assert!(!Cell::Dead.is_alive());
    }

    #[test]
    fn test_cell_serialization() {
        let json = serde_json::to_string(&Cell::Normal { stamina: 42.0 }).unwrap();
        assert_eq!(json, r#"{"kind":"normal","stamina":42.0}"#);
        let cell: Cell = serde_json::from_str(r#"{"kind":"mutated"}"#).unwrap();
        assert_eq!(cell, Cell::Mutated);
    }
}
