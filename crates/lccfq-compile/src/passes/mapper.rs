//! Initial placement of virtual qubits onto physical qubits.

use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use lccfq_ir::{Circuit, QubitId};

use crate::error::{CompileError, CompileResult};
use crate::mapping::Mapping;
use crate::pass::Pass;
use crate::pipeline::Stage;
use crate::property::PropertySet;
use crate::topology::Topology;

/// Strategy that chooses the initial [`Mapping`].
///
/// Policies only decide *where* qubits go; the [`Mapper`] checks capacity
/// beforehand and bijectivity afterwards.
pub trait PlacementPolicy: Send + Sync {
    /// Name used in configuration and logs.
    fn name(&self) -> &str;

    /// Place every virtual qubit of `circuit` on a distinct physical qubit.
    fn place(&self, circuit: &Circuit, topology: &Topology) -> CompileResult<Mapping>;
}

/// Virtual qubit *i* on physical qubit *i*.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPlacement;

impl PlacementPolicy for IdentityPlacement {
    fn name(&self) -> &str {
        "identity"
    }

    fn place(&self, circuit: &Circuit, topology: &Topology) -> CompileResult<Mapping> {
        Mapping::identity(circuit.num_qubits(), topology.num_qubits())
    }
}

/// Greedy placement by interaction frequency.
///
/// The virtual qubit taking part in the most two-qubit instructions goes to
/// the best-connected physical qubit. Each following virtual qubit, in order
/// of decreasing interaction count, takes the free physical qubit that
/// minimizes the interaction-weighted distance to its already placed
/// partners. Ties go to the lowest index.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionPlacement;

impl PlacementPolicy for InteractionPlacement {
    fn name(&self) -> &str {
        "interaction"
    }

    fn place(&self, circuit: &Circuit, topology: &Topology) -> CompileResult<Mapping> {
        let nv = circuit.num_qubits() as usize;
        let np = topology.num_qubits();

        let mut weights: FxHashMap<(u32, u32), u64> = FxHashMap::default();
        let mut totals = vec![0_u64; nv];
        for inst in circuit.instructions() {
            if let Some((a, b)) = inst.qubit_pair() {
                if a.0 as usize >= nv || b.0 as usize >= nv {
                    continue;
                }
                *weights.entry((a.0.min(b.0), a.0.max(b.0))).or_default() += 1;
                totals[a.0 as usize] += 1;
                totals[b.0 as usize] += 1;
            }
        }
        let weight = |a: usize, b: usize| {
            let (a, b) = (a.min(b) as u32, a.max(b) as u32);
            weights.get(&(a, b)).copied().unwrap_or(0)
        };

        let mut order: Vec<usize> = (0..nv).collect();
        order.sort_by(|&a, &b| totals[b].cmp(&totals[a]).then(a.cmp(&b)));

        // Unreachable pairs cost more than any real path.
        let unreachable = u64::from(np) + 1;
        let mut assignment: Vec<Option<u32>> = vec![None; nv];
        let mut used = vec![false; np as usize];

        for (rank, &v) in order.iter().enumerate() {
            let free = (0..np).filter(|&p| !used[p as usize]);
            let chosen = if rank == 0 {
                free.max_by(|&a, &b| topology.degree(a).cmp(&topology.degree(b)).then(b.cmp(&a)))
            } else {
                free.min_by_key(|&p| {
                    let cost: u64 = assignment
                        .iter()
                        .enumerate()
                        .filter_map(|(u, phys)| phys.map(|q| (u, q)))
                        .map(|(u, q)| {
                            let d = topology.distance(p, q).map_or(unreachable, u64::from);
                            weight(v, u) * d
                        })
                        .sum();
                    (cost, p)
                })
            };
            let p = chosen.ok_or(CompileError::InsufficientQubits {
                required: circuit.num_qubits(),
                available: np,
            })?;
            used[p as usize] = true;
            assignment[v] = Some(p);
        }

        let assignment = assignment
            .into_iter()
            .enumerate()
            .map(|(v, p)| p.ok_or(CompileError::UnmappedQubit(QubitId(v as u32))))
            .collect::<CompileResult<Vec<_>>>()?;
        Mapping::from_assignment(assignment, np)
    }
}

/// Look up a built-in placement policy by name.
pub fn placement_by_name(name: &str) -> CompileResult<Box<dyn PlacementPolicy>> {
    match name {
        "identity" | "trivial" => Ok(Box::new(IdentityPlacement)),
        "interaction" | "greedy" => Ok(Box::new(InteractionPlacement)),
        other => Err(CompileError::UnknownPlacement(other.to_string())),
    }
}

/// The mapping stage.
///
/// Produces the initial [`Mapping`]; the circuit itself passes through
/// untouched.
pub struct Mapper {
    policy: Box<dyn PlacementPolicy>,
}

impl Mapper {
    /// A mapper using the given policy.
    pub fn new(policy: impl PlacementPolicy + 'static) -> Self {
        Self {
            policy: Box::new(policy),
        }
    }

    /// A mapper using an already boxed policy.
    pub fn with_policy(policy: Box<dyn PlacementPolicy>) -> Self {
        Self { policy }
    }

    /// Name of the active policy.
    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    /// Compute the initial mapping of `circuit` onto `topology`.
    ///
    /// The circuit is validated first, so policies only see in-range operands.
    pub fn map(&self, circuit: &Circuit, topology: &Topology) -> CompileResult<Mapping> {
        circuit.validate()?;
        if circuit.num_qubits() > topology.num_qubits() {
            return Err(CompileError::InsufficientQubits {
                required: circuit.num_qubits(),
                available: topology.num_qubits(),
            });
        }
        let mapping = self.policy.place(circuit, topology)?;
        if mapping.num_virtual() != circuit.num_qubits() || !mapping.is_bijective() {
            return Err(CompileError::InvalidMapping(format!(
                "policy '{}' did not produce a bijection over {} virtual qubits",
                self.policy.name(),
                circuit.num_qubits()
            )));
        }
        Ok(mapping)
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new(IdentityPlacement)
    }
}

impl Pass for Mapper {
    fn name(&self) -> &str {
        "Mapper"
    }

    fn stage(&self) -> Stage {
        Stage::Mapped
    }

    #[instrument(skip_all, fields(policy = self.policy.name()))]
    fn run(&self, circuit: &Circuit, properties: &mut PropertySet) -> CompileResult<Circuit> {
        let topology = properties
            .topology
            .clone()
            .ok_or(CompileError::MissingProperty("topology"))?;
        let mapping = self.map(circuit, &topology)?;
        debug!(
            "Placed {} virtual qubits on {} physical qubits",
            mapping.num_virtual(),
            mapping.num_physical()
        );
        properties.initial_mapping = Some(mapping.clone());
        properties.mapping = Some(mapping);
        Ok(circuit.clone())
    }
}
