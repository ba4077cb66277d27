//! `cgtbuild modules` command

use anyhow::Result;

use cgtbuild::builder::KnownModule;

pub fn execute() -> Result<()> {
    for module in KnownModule::ALL {
        let location = if module.is_in_tree() {
            format!("in-tree ({})", module.module()?.subtree().display())
        } else {
            "external".to_string()
        };
        println!(
            "{:<14} {:<24} {}",
            module.name(),
            location,
            module.lib_names().join(" ")
        );
    }

    Ok(())
}
