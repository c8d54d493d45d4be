use clap::Parser;
use std::path::PathBuf;

use docfill::InsertMode;

#[derive(Parser, Debug)]
#[command(
    name = "docfill",
    version,
    about = "Fill {{tag}} placeholders in docx/xlsx templates"
)]
pub struct CliArgs {
    /// Input spreadsheets (.xlsx, .xlsm, .xlsb, .xls, .ods or .csv); repeat the flag or separate with commas
    #[arg(short, long, num_args = 1.., value_delimiter = ',')]
    pub input: Vec<PathBuf>,

    /// Insert mode per input file: p (placeholder), l (list) or t (table)
    #[arg(short = 'm', long = "inputmode", value_enum, num_args = 1.., value_delimiter = ',')]
    pub input_mode: Vec<InsertMode>,

    /// Logical name per input file, used as the tag prefix ({{name.column}})
    #[arg(short = 'n', long = "inputname", num_args = 1.., value_delimiter = ',')]
    pub input_name: Vec<String>,

    /// Template file (.docx or .xlsx)
    #[arg(short, long)]
    pub template: PathBuf,

    /// Output file; a .docx extension renders a document, anything else a workbook
    #[arg(short, long)]
    pub output: PathBuf,

    /// Placeholder names, paired in order with --variables; repeat or separate with commas
    #[arg(short, long, num_args = 1.., value_delimiter = ',')]
    pub placeholder: Vec<String>,

    /// Values for the placeholders given with --placeholder; repeat or separate with commas
    #[arg(short, long, num_args = 1.., value_delimiter = ',')]
    pub variables: Vec<String>,

    /// Enable logging to stderr (level overridable with RUST_LOG)
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Print the merged tag mapping as JSON before rendering
    #[arg(long, default_value_t = false)]
    pub dump_tags: bool,
}
