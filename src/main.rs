fn main() -> anyhow::Result<()> {
    // Set up logging; RUST_LOG=debug shows placement geometry
    env_logger::init();

    // Run the bracelet designer
    bracelet_designer::run_cli()
}
