use crate::util::{mirrored, shifted};

pub mod dos_util;
pub mod pdos_util;

/**
Plot-ready density of states.
# Fields:
* energy: Vec<f64> - E - E_F in eV
* dos: (Vec<f64>, Option<Vec<f64>>) - spin 1 is always present, spin 2 only
    for spin-polarised data
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Dos {
    energy: Vec<f64>,
    dos: (Vec<f64>, Option<Vec<f64>>),
}

impl Dos {
    pub fn new(energy: Vec<f64>, dos: (Vec<f64>, Option<Vec<f64>>)) -> Self {
        Self { energy, dos }
    }

    /// Build from absolute energies, shifting by the Fermi level.
    pub fn relative_to_fermi(
        energy: &[f64],
        e_fermi: f64,
        dos: (Vec<f64>, Option<Vec<f64>>),
    ) -> Self {
        Self::new(shifted(energy, e_fermi), dos)
    }

    pub fn energy(&self) -> &[f64] {
        self.energy.as_ref()
    }

    pub fn spin_up(&self) -> &[f64] {
        self.dos.0.as_ref()
    }

    pub fn spin_down(&self) -> Option<&[f64]> {
        self.dos.1.as_deref()
    }

    pub fn num_spins(&self) -> u8 {
        if self.dos.1.is_some() {
            2
        } else {
            1
        }
    }

    /// Spin-down drawn below the axis.
    pub fn spin_down_mirrored(&self) -> Option<Vec<f64>> {
        self.spin_down().map(mirrored)
    }

    pub fn up_points(&self) -> Vec<(f64, f64)> {
        self.energy
            .iter()
            .copied()
            .zip(self.dos.0.iter().copied())
            .collect()
    }

    pub fn down_points_mirrored(&self) -> Option<Vec<(f64, f64)>> {
        self.spin_down_mirrored()
            .map(|down| self.energy.iter().copied().zip(down).collect())
    }

    /// Largest |DOS| inside the energy window, for axis limits.
    pub fn peak_in_window(&self, window: (f64, f64)) -> f64 {
        let down = self.dos.1.as_deref().unwrap_or(&[]);
        self.energy
            .iter()
            .enumerate()
            .filter(|(_, e)| **e >= window.0 && **e <= window.1)
            .map(|(i, _)| {
                let up = self.dos.0[i].abs();
                down.get(i).map_or(up, |d| up.max(d.abs()))
            })
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod test {
    use super::Dos;

    #[test]
    fn test_relative_to_fermi() {
        let dos = Dos::relative_to_fermi(
            &[14.0, 15.0, 16.0],
            15.0,
            (vec![1.0, 2.0, 3.0], Some(vec![0.5, 4.0, 0.25])),
        );
        assert_eq!(dos.energy(), &[-1.0, 0.0, 1.0]);
        assert_eq!(dos.num_spins(), 2);
        assert_eq!(dos.spin_down_mirrored(), Some(vec![-0.5, -4.0, -0.25]));
        assert_eq!(
            dos.down_points_mirrored().unwrap()[1],
            (0.0, -4.0)
        );
        assert_eq!(dos.peak_in_window((-1.0, 1.0)), 4.0);
        assert_eq!(dos.peak_in_window((0.5, 1.0)), 3.0);
        assert_eq!(dos.peak_in_window((5.0, 6.0)), 0.0);
    }

    #[test]
    fn test_unpolarised() {
        let dos = Dos::new(vec![0.0, 1.0], (vec![1.0, 2.0], None));
        assert_eq!(dos.num_spins(), 1);
        assert!(dos.spin_down_mirrored().is_none());
        assert_eq!(dos.up_points(), vec![(0.0, 1.0), (1.0, 2.0)]);
    }
}
