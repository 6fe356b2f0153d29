//! Virtual-to-physical qubit bindings.

use serde::{Deserialize, Serialize};

use lccfq_ir::QubitId;

use crate::error::{CompileError, CompileResult};

/// A bijection between virtual qubits `0..num_virtual` and a subset of the
/// physical qubits `0..num_physical`.
///
/// Both directions are kept as dense tables so lookups are O(1). The only
/// mutation after construction is [`swap_physical`](Self::swap_physical),
/// which updates both tables together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    virt_to_phys: Vec<u32>,
    phys_to_virt: Vec<Option<QubitId>>,
}

impl Mapping {
    /// Virtual qubit `i` on physical qubit `i`.
    pub fn identity(num_virtual: u32, num_physical: u32) -> CompileResult<Self> {
        Self::from_assignment((0..num_virtual).collect(), num_physical)
    }

    /// Build from `assignment[v] = physical qubit of virtual v`.
    pub fn from_assignment(assignment: Vec<u32>, num_physical: u32) -> CompileResult<Self> {
        let mut phys_to_virt = vec![None; num_physical as usize];
        for (v, &p) in assignment.iter().enumerate() {
            let slot = phys_to_virt.get_mut(p as usize).ok_or_else(|| {
                CompileError::InvalidMapping(format!(
                    "physical qubit {p} outside 0..{num_physical}"
                ))
            })?;
            if let Some(other) = slot {
                return Err(CompileError::InvalidMapping(format!(
                    "physical qubit {p} bound to both {other} and q{v}"
                )));
            }
            *slot = Some(QubitId(v as u32));
        }
        Ok(Self {
            virt_to_phys: assignment,
            phys_to_virt,
        })
    }

    /// Physical qubit bound to `virt`.
    #[inline]
    pub fn physical(&self, virt: QubitId) -> Option<u32> {
        self.virt_to_phys.get(virt.0 as usize).copied()
    }

    /// Virtual qubit bound to `phys`, if any.
    #[inline]
    pub fn virtual_at(&self, phys: u32) -> Option<QubitId> {
        self.phys_to_virt.get(phys as usize).copied().flatten()
    }

    /// Exchange the bindings of two physical qubits.
    ///
    /// Works when either side is unoccupied; the virtual qubit simply moves.
    pub fn swap_physical(&mut self, p1: u32, p2: u32) {
        let (i1, i2) = (p1 as usize, p2 as usize);
        if i1 >= self.phys_to_virt.len() || i2 >= self.phys_to_virt.len() {
            return;
        }
        self.phys_to_virt.swap(i1, i2);
        if let Some(v) = self.phys_to_virt[i1] {
            self.virt_to_phys[v.0 as usize] = p1;
        }
        if let Some(v) = self.phys_to_virt[i2] {
            self.virt_to_phys[v.0 as usize] = p2;
        }
    }

    /// Number of virtual qubits.
    pub fn num_virtual(&self) -> u32 {
        self.virt_to_phys.len() as u32
    }

    /// Number of physical qubits.
    pub fn num_physical(&self) -> u32 {
        self.phys_to_virt.len() as u32
    }

    /// `(virtual, physical)` pairs in virtual order.
    pub fn iter(&self) -> impl Iterator<Item = (QubitId, u32)> + '_ {
        self.virt_to_phys
            .iter()
            .enumerate()
            .map(|(v, &p)| (QubitId(v as u32), p))
    }

    /// Check that the two tables are mutually inverse.
    pub fn is_bijective(&self) -> bool {
        let forward = self.iter().all(|(v, p)| self.virtual_at(p) == Some(v));
        let occupied = self.phys_to_virt.iter().flatten().count();
        forward && occupied == self.virt_to_phys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let m = Mapping::identity(2, 4).unwrap();
        assert_eq!(m.physical(QubitId(1)), Some(1));
        assert_eq!(m.virtual_at(3), None);
        assert!(m.is_bijective());
    }

    #[test]
    fn test_identity_too_small() {
        assert!(Mapping::identity(3, 2).is_err());
    }

    #[test]
    fn test_from_assignment_rejects_collision() {
        let err = Mapping::from_assignment(vec![1, 1], 3).unwrap_err();
        assert!(matches!(err, CompileError::InvalidMapping(_)));
    }

    #[test]
    fn test_swap_occupied() {
        let mut m = Mapping::from_assignment(vec![2, 0], 3).unwrap();
        m.swap_physical(0, 2);
        assert_eq!(m.physical(QubitId(0)), Some(0));
        assert_eq!(m.physical(QubitId(1)), Some(2));
        assert!(m.is_bijective());
    }

    #[test]
    fn test_swap_into_free_slot() {
        let mut m = Mapping::identity(1, 3).unwrap();
        m.swap_physical(0, 1);
        assert_eq!(m.physical(QubitId(0)), Some(1));
        assert_eq!(m.virtual_at(0), None);
        assert_eq!(m.virtual_at(1), Some(QubitId(0)));
        assert!(m.is_bijective());
    }
}
