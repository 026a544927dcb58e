use super::Target;

pub fn run(target: &Target, yes: bool) -> anyhow::Result<()> {
    let (cfg, mut log) = target.open_log()?;
    if !yes {
        anyhow::bail!("refusing to erase {} without --yes", cfg.namespace);
    }
    log.reset()?;
    println!("Event log {} erased.", cfg.namespace);
    Ok(())
}
