mod packs;

use std::path::PathBuf;

use packs::PackTarget;

const USAGE: &str = "\
Usage: cargo xtask <command> [--root <dir>]

Commands:
  build-tables       Build packs/starsign-tables.db from packs/tables/*.json
  build-conditions   Build packs/starsign-conditions.db from packs/json/*.json
  build-packs        Build both";

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let command = args.next();
    let root = parse_root(args)?;

    match command.as_deref() {
        Some("build-tables") => build(&root, &[PackTarget::Tables]),
        Some("build-conditions") => build(&root, &[PackTarget::Conditions]),
        Some("build-packs") => build(&root, &[PackTarget::Tables, PackTarget::Conditions]),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}\n\n{USAGE}"),
        None => anyhow::bail!("{USAGE}"),
    }
}

fn parse_root(mut args: impl Iterator<Item = String>) -> anyhow::Result<PathBuf> {
    let mut root = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--root" => {
                let dir = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--root needs a directory"))?;
                root = Some(PathBuf::from(dir));
            }
            other => anyhow::bail!("Unexpected argument: {other}\n\n{USAGE}"),
        }
    }
    match root {
        Some(root) => Ok(root),
        None => Ok(std::env::current_dir()?),
    }
}

fn build(root: &std::path::Path, targets: &[PackTarget]) -> anyhow::Result<()> {
    for target in targets {
        let report = packs::build(root, *target)?;
        for (id, name) in &report.records {
            println!("  {name} ({id})");
        }
        println!(
            "Built {} {}(s) into {}",
            report.records.len(),
            report.target.label(),
            report.output.display()
        );
    }
    Ok(())
}
