//! Plug-type resistance box.

use crate::error::{LabError, Result};

/// Plug values of the bench resistance box, in the order they sit on the lid.
pub const STANDARD_PLUGS: [f64; 4] = [5.0, 2.0, 2.0, 1.0];

/// One brass plug and the coil it shorts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plug {
    /// Coil resistance in ohms.
    pub value: f64,
    /// A removed plug puts its coil into the circuit.
    pub removed: bool,
}

/// A resistance box whose resistance is the sum of the coils whose plugs are
/// out.
#[derive(Debug, Clone, PartialEq)]
pub struct ResistanceBox {
    plugs: Vec<Plug>,
}

impl Default for ResistanceBox {
    fn default() -> Self {
        Self::new(&STANDARD_PLUGS)
    }
}

impl ResistanceBox {
    /// Create a box with every plug in (0 Ω).
    pub fn new(values: &[f64]) -> Self {
        Self {
            plugs: values
                .iter()
                .map(|&value| Plug {
                    value,
                    removed: false,
                })
                .collect(),
        }
    }

    /// Create a standard box with plugs pulled to approximate `resistance`.
    pub fn for_resistance(resistance: f64) -> Self {
        let mut rbox = Self::default();
        rbox.set_resistance(resistance);
        rbox
    }

    /// Current resistance in ohms.
    pub fn resistance(&self) -> f64 {
        self.plugs
            .iter()
            .filter(|p| p.removed)
            .map(|p| p.value)
            .sum()
    }

    /// Largest resistance the box can supply.
    pub fn max_resistance(&self) -> f64 {
        self.plugs.iter().map(|p| p.value).sum()
    }

    /// Pull plugs greedily, largest first in lid order, so the box reads the
    /// largest value not exceeding `resistance`. Returns that value.
    pub fn set_resistance(&mut self, resistance: f64) -> f64 {
        let mut remaining = resistance;
        for plug in &mut self.plugs {
            plug.removed = remaining >= plug.value;
            if plug.removed {
                remaining -= plug.value;
            }
        }
        self.resistance()
    }

    /// Pull or insert one plug. Returns the new box resistance.
    pub fn toggle(&mut self, index: usize) -> Result<f64> {
        let count = self.plugs.len();
        let plug = self
            .plugs
            .get_mut(index)
            .ok_or(LabError::PlugIndexOutOfRange { index, count })?;
        plug.removed = !plug.removed;
        Ok(self.resistance())
    }

    /// All plugs in lid order.
    pub fn plugs(&self) -> &[Plug] {
        &self.plugs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_box_is_shorted() {
        let rbox = ResistanceBox::default();
        assert_eq!(rbox.resistance(), 0.0);
        assert_eq!(rbox.max_resistance(), 10.0);
    }

    #[test]
    fn test_greedy_layout() {
        let rbox = ResistanceBox::for_resistance(10.0);
        assert!(rbox.plugs().iter().all(|p| p.removed));

        let rbox = ResistanceBox::for_resistance(4.0);
        let removed: Vec<bool> = rbox.plugs().iter().map(|p| p.removed).collect();
        assert_eq!(removed, vec![false, true, true, false]);
        assert_eq!(rbox.resistance(), 4.0);

        // 3.5 Ω is not representable; the box settles on 3 Ω
        assert_eq!(ResistanceBox::for_resistance(3.5).resistance(), 3.0);
    }

    #[test]
    fn test_toggle() {
        let mut rbox = ResistanceBox::default();
        assert_eq!(rbox.toggle(0).unwrap(), 5.0);
        assert_eq!(rbox.toggle(3).unwrap(), 6.0);
        assert_eq!(rbox.toggle(0).unwrap(), 1.0);
        assert_eq!(
            rbox.toggle(4),
            Err(LabError::PlugIndexOutOfRange { index: 4, count: 4 })
        );
    }
}
