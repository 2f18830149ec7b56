//! List supported digest algorithms.

use hashpal_digest::registry;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("Hash algorithms:");
    for entry in registry::entries() {
        println!(
            "  {:8} digest {:2} bytes, block {:3} bytes",
            entry.name(),
            entry.output_size,
            entry.block_size
        );
    }
    Ok(())
}
