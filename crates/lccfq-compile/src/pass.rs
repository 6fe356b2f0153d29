//! Pass trait for pipeline stages.

use lccfq_ir::Circuit;

use crate::error::CompileResult;
use crate::pipeline::Stage;
use crate::property::PropertySet;

/// One stage transition of the compilation pipeline.
///
/// A pass reads the circuit produced by the previous stage and returns a new
/// circuit; it never mutates its input. Side results such as the qubit
/// mapping go into the [`PropertySet`].
pub trait Pass: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// The stage reached once this pass has run.
    fn stage(&self) -> Stage;

    /// Run the pass.
    fn run(&self, circuit: &Circuit, properties: &mut PropertySet) -> CompileResult<Circuit>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rename;

    impl Pass for Rename {
        fn name(&self) -> &'static str {
            "rename"
        }

        fn stage(&self) -> Stage {
            Stage::Expanded
        }

        fn run(&self, circuit: &Circuit, _properties: &mut PropertySet) -> CompileResult<Circuit> {
            Ok(circuit.with_instructions(circuit.num_qubits(), vec![]))
        }
    }

    #[test]
    fn test_pass_does_not_touch_input() {
        let circuit = Circuit::bell().unwrap();
        let out = Rename.run(&circuit, &mut PropertySet::new()).unwrap();
        assert_eq!(circuit.len(), 3);
        assert!(out.is_empty());
        assert_eq!(Rename.stage(), Stage::Expanded);
    }
}
