//! Exchange insertion for connectivity constraints.

use tracing::{debug, instrument};

use lccfq_ir::{Circuit, Instruction, QubitId};

use crate::error::{CompileError, CompileResult};
use crate::mapping::Mapping;
use crate::pass::Pass;
use crate::pipeline::Stage;
use crate::property::PropertySet;
use crate::topology::Topology;

/// The swap-insertion stage.
///
/// Walks the circuit in program order. Each two-qubit instruction whose
/// operands are not adjacent under the current mapping is preceded by one
/// `swap` per edge of the shortest path between them, except the last edge.
/// Every inserted swap updates the mapping before the next instruction is
/// considered.
///
/// The routed circuit is expressed over physical qubits: each instruction's
/// operands are resolved through the mapping as it stands when the
/// instruction is emitted, and the register grows to the topology size.
#[derive(Debug, Clone, Copy, Default)]
pub struct Router;

impl Router {
    /// Route `circuit`, updating `mapping` in place.
    ///
    /// Returns the routed circuit and the number of inserted swaps.
    pub fn route(
        &self,
        circuit: &Circuit,
        mapping: &mut Mapping,
        topology: &Topology,
    ) -> CompileResult<(Circuit, usize)> {
        let mut routed = Vec::with_capacity(circuit.len());
        let mut swaps = 0;

        for (position, inst) in circuit.instructions().iter().enumerate() {
            if let Some((a, b)) = inst.qubit_pair() {
                let pa = resolve(mapping, a)?;
                let pb = resolve(mapping, b)?;
                if !topology.is_adjacent(pa, pb) {
                    let path =
                        topology
                            .shortest_path(pa, pb)
                            .ok_or(CompileError::UnroutablePath {
                                position,
                                opcode: inst.opcode,
                                from: pa,
                                to: pb,
                            })?;
                    for edge in path[..path.len() - 1].windows(2) {
                        let (p1, p2) = (edge[0], edge[1]);
                        debug!("Inserting swap on ({}, {}) before #{}", p1, p2, position);
                        routed.push(Instruction::swap(QubitId(p1), QubitId(p2)));
                        mapping.swap_physical(p1, p2);
                        swaps += 1;
                    }
                }
            }

            let mut missing = None;
            let bound = inst.map_qubits(|q| match mapping.physical(q) {
                Some(p) => QubitId(p),
                None => {
                    missing.get_or_insert(q);
                    q
                }
            });
            if let Some(q) = missing {
                return Err(CompileError::UnmappedQubit(q));
            }
            routed.push(bound);
        }

        Ok((
            circuit.with_instructions(topology.num_qubits(), routed),
            swaps,
        ))
    }
}

fn resolve(mapping: &Mapping, virt: QubitId) -> CompileResult<u32> {
    mapping
        .physical(virt)
        .ok_or(CompileError::UnmappedQubit(virt))
}

impl Pass for Router {
    fn name(&self) -> &str {
        "Router"
    }

    fn stage(&self) -> Stage {
        Stage::Swapped
    }

    #[instrument(skip_all)]
    fn run(&self, circuit: &Circuit, properties: &mut PropertySet) -> CompileResult<Circuit> {
        let topology = properties
            .topology
            .clone()
            .ok_or(CompileError::MissingProperty("topology"))?;
        let mapping = properties
            .mapping
            .as_mut()
            .ok_or(CompileError::MissingProperty("mapping"))?;
        let (routed, swaps) = self.route(circuit, mapping, &topology)?;
        debug!("Router inserted {} swaps", swaps);
        properties.swaps_inserted += swaps;
        Ok(routed)
    }
}
