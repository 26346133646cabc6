use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use opsboard::api::HttpOpsSource;
use opsboard::config::Config;
use opsboard::dashboard::Dashboard;
use opsboard::dates::{self, DateRange};
use opsboard::logging::{log, obj, v_str, Domain, Level};
use opsboard::query::FilterForm;
use opsboard::view;

#[derive(Parser, Debug)]
#[command(name = "opsboard", about = "Production order dashboard client")]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = "OPS_API_BASE")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// Start date, dd/mm/yyyy (default: first day of this month)
    #[arg(long)]
    start: Option<String>,
    /// End date, dd/mm/yyyy (default: today)
    #[arg(long)]
    end: Option<String>,
}

impl RangeArgs {
    fn resolve(&self) -> DateRange {
        let default = dates::default_range(dates::today());
        DateRange::new(
            self.start.clone().unwrap_or(default.start),
            self.end.clone().unwrap_or(default.end),
        )
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, rank and summarize production orders
    Report {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, default_value = "")]
        subespecie: String,
        #[arg(long, default_value = "")]
        id_produto: String,
        #[arg(long, default_value = "")]
        cod_op: String,
        /// Exclude production-line orders
        #[arg(long)]
        no_line: bool,
        /// Exclude made-to-order orders
        #[arg(long)]
        no_custom_order: bool,
        /// Print the view model as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the sub-species available for a date range
    Subspecies {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Print the detail URL of an order
    Link { cod_op: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = Config::from_env();
    if let Some(base) = cli.api_base {
        cfg = cfg.with_api_base(base);
    }
    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[("api_base", v_str(&cfg.api_base))]),
    );

    match cli.command {
        Command::Report {
            range,
            subespecie,
            id_produto,
            cod_op,
            no_line,
            no_custom_order,
            json,
        } => {
            let form = FilterForm {
                range: range.resolve(),
                sub_species: subespecie,
                product_id: id_produto,
                op_code: cod_op,
                line: !no_line,
                custom_order: !no_custom_order,
            };
            let dashboard = Dashboard::new(HttpOpsSource::new(&cfg));
            if let Err(err) = dashboard.submit(&form).await {
                eprintln!("{}", err);
                std::process::exit(2);
            }
            let vm = dashboard.view();
            if json {
                println!("{}", serde_json::to_string_pretty(&vm)?);
            } else {
                print!("{}", view::text::render(&vm));
            }
        }
        Command::Subspecies { range } => {
            let dashboard = Dashboard::new(HttpOpsSource::new(&cfg));
            let range = range.resolve();
            if let Err(err) = dashboard.reload_subspecies(&range).await {
                eprintln!("{}", err);
            }
            for option in dashboard.subspecies_options() {
                println!("{}", json!({ "value": option.value, "label": option.label }));
            }
        }
        Command::Link { cod_op } => {
            println!("{}", cfg.detail_url(&cod_op));
        }
    }
    Ok(())
}
