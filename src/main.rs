fn main() -> anyhow::Result<()> {
    genbridge::run()?;
    Ok(())
}
