use anyhow::{Context, Result};

use super::{fs, load_config, resolve_format};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::InspectArgs) -> Result<()> {
    let format = resolve_format(&args.input, args.format)?;
    let config = load_config(args.config.as_deref())?;
    let text = fs::read_text(&args.input)?;

    let parsed = format.parse(&text, &config)
        .with_context(|| format!("[inspect] Failed to parse {} as {}", args.input.display(), format))?;

    println!("[inspect] {} ({}): {} features in {} layers", args.input.display(), format, parsed.feature_count(), parsed.layers.len());
    for (idx, layer) in parsed.layers.iter().enumerate() {
        let mut counts = std::collections::BTreeMap::new();
        for feature in &layer.features {
            *counts.entry(feature.geometry_type().to_str()).or_insert(0usize) += 1;
        }
        let name = layer.name.as_deref().unwrap_or("(unnamed)");
        let summary = counts.iter().map(|(ty, n)| format!("{ty}={n}")).collect::<Vec<_>>().join(" ");
        println!("[inspect] layer {} {}: {}", idx + 1, name, summary);
    }

    if !parsed.issues.is_empty() {
        println!("[inspect] {} items skipped", parsed.issues.len());
        let shown = if cli.verbose > 0 { parsed.issues.len() } else { 5 };
        for issue in parsed.issues.iter().take(shown) {
            println!("[inspect]   {}", issue);
        }
    }
    Ok(())
}
