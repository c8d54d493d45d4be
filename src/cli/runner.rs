use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use docfill::api::{build_tags, render_to_path};
use docfill::{ExitCode, FillParams};

use super::args::CliArgs;
use super::errors::AppError;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn fill(args: CliArgs) -> Result<(), AppError> {
    let params = FillParams::from_parts(
        args.template,
        args.output,
        args.input,
        args.input_mode,
        args.input_name,
        args.placeholder,
        args.variables,
    )?;
    info!("Template: {:?}", params.template);
    info!("Output: {:?}", params.output);

    let tags = build_tags(&params)?;
    if args.dump_tags {
        println!("{}", tags.to_json()?);
    }
    render_to_path(&params.template, &params.output, &tags)?;
    println!("Output file: {} successfully created", params.output.display());
    Ok(())
}

/// Run one fill and report the outcome on stdout; returns the process exit code.
pub fn run(args: CliArgs) -> ExitCode {
    if args.log {
        init_logging();
    }

    match fill(args) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            let code = e.exit_code();
            error!("Fill failed ({:?}): {}", code, e);
            println!("Error: {e}");
            code
        }
    }
}
