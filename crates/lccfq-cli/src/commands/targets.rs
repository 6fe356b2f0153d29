//! Targets command implementation.

use console::style;

use lccfq_compile::ArchitectureRegistry;

/// List every registered architecture with its native unitaries.
pub fn execute() {
    let registry = ArchitectureRegistry::with_builtins();
    println!("{} Available architectures:\n", style("LCCFQ").cyan().bold());

    for name in registry.available_architectures() {
        let Ok(target) = registry.create(&name) else {
            continue;
        };
        let gates: Vec<&str> = target.native_opcodes().iter().map(|op| op.name()).collect();
        println!("  {} {}", style("●").green(), style(&name).bold());
        if target.name() != name {
            println!("    Alias of: {}", target.name());
        }
        println!("    Gates: {}", gates.join(", "));
    }
}
