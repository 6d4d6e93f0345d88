//! annsweep binary entry point

fn main() -> anyhow::Result<()> {
    annsweep_cli::run()
}
