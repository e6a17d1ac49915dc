use anyhow::Result;

fn main() -> Result<()> {
    canvas_cli::main_entry()
}
