//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::config::{OutputFormat, Settings};

/// Build syntax trees from postfix regular expressions and lay them out for drawing
#[derive(Parser, Debug)]
#[command(name = "rxtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the syntax tree of a postfix expression
    Tree {
        /// Postfix expression, e.g. "ab.c|"
        #[arg(allow_hyphen_values = true)]
        postfix: String,
    },

    /// Lay out a postfix expression and print the result
    Layout {
        /// Postfix expression, e.g. "ab.c|"
        #[arg(allow_hyphen_values = true)]
        postfix: String,

        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Lay out every expression of a file, one postfix expression per line
    File {
        /// Expression file
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the parenthesised infix form of a postfix expression
    Infix {
        /// Postfix expression
        #[arg(allow_hyphen_values = true)]
        postfix: String,
    },

    /// Show effective settings
    Config {
        /// Print a commented config template instead
        #[arg(long)]
        template: bool,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Layout geometry overrides.
#[derive(Args, Debug, Default, Clone)]
pub struct LayoutArgs {
    /// Horizontal span of the tree
    #[arg(long)]
    pub width: Option<f64>,

    /// Distance between depth levels
    #[arg(long)]
    pub vertical_gap: Option<f64>,

    /// y coordinate of the root
    #[arg(long, allow_negative_numbers = true)]
    pub start_y: Option<f64>,

    /// x coordinate of the root
    #[arg(long, allow_negative_numbers = true)]
    pub center_x: Option<f64>,
}

/// Output overrides.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Decimal places for coordinates
    #[arg(long)]
    pub precision: Option<usize>,

    /// Write to file instead of stdout
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

impl LayoutArgs {
    /// Flags win over loaded settings.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        let layout = &mut settings.layout;
        if let Some(v) = self.width {
            layout.width = v;
        }
        if let Some(v) = self.vertical_gap {
            layout.vertical_gap = v;
        }
        if let Some(v) = self.start_y {
            layout.start_y = v;
        }
        if let Some(v) = self.center_x {
            layout.center_x = v;
        }
        settings
    }
}

impl OutputArgs {
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(format) = self.format {
            settings.output.format = format;
        }
        if let Some(precision) = self.precision {
            settings.output.precision = precision;
        }
        settings
    }
}
