use clap::{Parser, Subcommand};

mod cmd;
mod money;
mod tax;

#[derive(Parser, Debug)]
#[command(name = "itaxc", version, author)]
#[command(about = "Indian Income Tax Calculator: new regime FY24-25 vs FY25-26")]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare tax liability under FY25-26 and FY24-25 slabs
    Calc(cmd::calc::CalcCommand),
    /// Generate the plain text income tax report
    Report(cmd::report::ReportCommand),
    /// Compare liability for many salaries from a CSV or JSON file
    Batch(cmd::batch::BatchCommand),
    /// Show the new regime slab tables
    Slabs(cmd::slabs::SlabsCommand),
    /// Print the batch input format
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    log::debug!("{:?}", opts);

    match opts.command {
        Command::Calc(calc) => calc.exec(),
        Command::Report(report) => report.exec(),
        Command::Batch(batch) => batch.exec(),
        Command::Slabs(slabs) => slabs.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
