use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use geoimport::{ImportDirective, ImportTarget, MapSession, run_import};

use super::{fs, load_config, resolve_format};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::ImportArgs) -> Result<()> {
    let format = resolve_format(&args.input, args.format)?;
    let config = load_config(args.config.as_deref())?;
    let out_path: PathBuf = args.output.clone().unwrap_or("./map.umap".into());
    fs::assert_not_stdout(&out_path)?;

    let mut session = match &args.session {
        Some(path) => load_session(path)?,
        None => MapSession::new(),
    };

    let target = match args.layer {
        Some(id) if args.replace => ImportTarget::replace(id),
        Some(id) => ImportTarget::append_to(id),
        None => ImportTarget::NewLayer,
    };
    let mut directive = ImportDirective::new(format, fs::read_text(&args.input)?).with_target(target);
    directive.layer_name = args.name.clone();

    println!("[import] importing {} as {}", args.input.display(), format);
    let outcome = run_import(&directive, &mut session, &config);

    if cli.verbose > 0 {
        for error in &outcome.errors {
            eprintln!("[import] {}", error);
        }
    }
    if let Some(alert) = outcome.alert() {
        eprintln!("[import] {}: {}", alert.level.to_str(), alert.message);
    }
    if !outcome.is_success() {
        println!("[import] nothing imported; {} left unchanged", out_path.display());
        return Ok(());
    }

    for id in &outcome.created_layers {
        if let Some(layer) = session.layers().get(*id) {
            println!("[import] created layer {} \"{}\" ({} features)", id, layer.name(), layer.len());
        }
    }
    println!("[import] {} features added", outcome.features_added);

    println!("[import] writing session to {}", out_path.display());
    fs::write_atomic(&out_path, session.to_native_string().as_bytes(), args.force)?;
    Ok(())
}

fn load_session(path: &Path) -> Result<MapSession> {
    let text = fs::read_text(path)?;
    let session = MapSession::from_native(&text)
        .with_context(|| format!("[import] Failed to load session {}", path.display()))?;
    log::debug!("[import] loaded {} layers from {}", session.layers().len(), path.display());
    Ok(session)
}
