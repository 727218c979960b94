use anyhow::Result;

fn main() -> Result<()> {
    winter_cli::main_entry()
}
