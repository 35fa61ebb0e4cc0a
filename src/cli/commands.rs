//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::render;
use crate::cli::args::{Cli, Commands, LayoutArgs, OutputArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{OutputFormat, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{InfraError, InfraResult};
use crate::tree_traits::TreeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `rxtree --help`".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { template } => cmd_config(cli, *template),
        Commands::Tree { postfix } => cmd_tree(load(cli)?, postfix),
        Commands::Infix { postfix } => cmd_infix(load(cli)?, postfix),
        Commands::Layout {
            postfix,
            layout,
            output,
        } => cmd_layout(effective(cli, layout, output)?, postfix, output),
        Commands::File {
            path,
            layout,
            output,
        } => cmd_file(effective(cli, layout, output)?, path, output),
    }
}

fn load(cli: &Cli) -> CliResult<Settings> {
    Ok(Settings::load(cli.config.as_deref())?)
}

/// Loaded settings with command-line overrides applied.
fn effective(cli: &Cli, layout: &LayoutArgs, output: &OutputArgs) -> CliResult<Settings> {
    let settings = output.apply(layout.apply(load(cli)?));
    debug!(?settings, "effective settings");
    Ok(settings)
}

fn cmd_config(cli: &Cli, template: bool) -> CliResult<()> {
    if template {
        output::info(&Settings::template());
    } else {
        output::info(&load(cli)?.to_toml()?);
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_tree(settings: Settings, postfix: &str) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let tree = container.visualize.tree(postfix)?;
    output::info(tree.to_tree_string().trim_end());
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_infix(settings: Settings, postfix: &str) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let tree = container.visualize.tree(postfix)?;
    output::info(&tree);
    Ok(())
}

#[instrument(skip(settings, args))]
fn cmd_layout(settings: Settings, postfix: &str, args: &OutputArgs) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let vis = container.visualize.visualize(postfix)?;
    let out = container.settings.output;
    let text = render(&vis, out.format, out.precision)?;
    emit(&container, args.output.as_deref(), &text)
}

#[instrument(skip(settings, args))]
fn cmd_file(settings: Settings, path: &Path, args: &OutputArgs) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let format = container.settings.output.format;
    let precision = container.settings.output.precision;
    let to_file = args.output.is_some();
    // Tree and coords are read by people; dot and json stay machine-readable
    let annotate = matches!(format, OutputFormat::Tree | OutputFormat::Coords);

    let mut collected = String::new();
    let result = container.batch.process(path, |line, vis| {
        let text = render(vis, format, precision)?;
        if to_file {
            if annotate {
                collected.push_str(&format!("# line {}: {}\n", line, vis.postfix));
            }
            collected.push_str(text.trim_end());
            collected.push('\n');
        } else {
            if annotate {
                output::header(&format!("line {}: {}", line, vis.postfix));
                output::detail(&format!("infix: {}", vis.tree));
            }
            output::info(text.trim_end());
            if annotate {
                output::separator();
            }
        }
        Ok(())
    });

    // Whatever was rendered before a failing line is still written out
    if let Some(out) = args.output.as_deref() {
        if !collected.is_empty() {
            write_file(&container, out, &collected)?;
        }
    }
    let processed = result?;
    output::action("Processed", &format!("{} expressions", processed));
    Ok(())
}

fn emit(container: &ServiceContainer, out: Option<&Path>, text: &str) -> CliResult<()> {
    match out {
        Some(path) => Ok(write_file(container, path, text)?),
        None => {
            output::info(text.trim_end());
            Ok(())
        }
    }
}

fn write_file(container: &ServiceContainer, path: &Path, text: &str) -> InfraResult<()> {
    container
        .fs
        .write(path, text)
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::action("Wrote", &path.display());
    Ok(())
}
