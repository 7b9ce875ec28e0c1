//! Classes command - list the case classes the portal knows.

use clap::Args;
use console::style;

use judex_core::CASE_CLASSES;

/// Arguments for the classes command.
#[derive(Args)]
pub struct ClassesArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ClassesArgs) -> anyhow::Result<()> {
    if args.json {
        let classes: Vec<serde_json::Value> = CASE_CLASSES
            .iter()
            .map(|(code, description)| serde_json::json!({ "code": code, "description": description }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&classes)?);
        return Ok(());
    }

    println!("{}", style("Case classes").bold());
    for (code, description) in CASE_CLASSES.iter() {
        println!("  {:<6} {}", style(code).cyan(), description);
    }

    Ok(())
}
